//! Local stand-in for the hosted events mock API.

pub mod config;
pub mod routes;
pub mod seed;
pub mod store;

pub use routes::build_router;
pub use store::EventStore;
