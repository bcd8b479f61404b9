//! Sample data served when the mock API starts with `seed = true`.

use shared::domain::{Attendee, AttendeeId, Event, EventId, TicketPrice};

use crate::store::EventStore;

const EVENTS: &[(&str, &str, &str, &str, u64)] = &[
    ("Tech Conference 2023", "2023-11-04T09:00:00.000Z", "Moscone Center", "199.99", 420),
    ("Marketing Summit", "2023-12-01T10:30:00.000Z", "Javits Center", "149", 310),
    ("Rust Meetup", "2024-01-18T18:00:00.000Z", "Hall B", "0", 58),
    ("Design Systems Day", "2024-02-09T09:30:00.000Z", "The Lighthouse", "75.5", 120),
    ("Cloud Native Forum", "2024-03-14T08:45:00.000Z", "ExCeL London", "310", 980),
    ("Data Science Workshop", "2024-03-28T13:00:00.000Z", "Room 204", "45", 35),
    ("Startup Pitch Night", "2024-04-11T19:00:00.000Z", "Warehouse 9", "15", 210),
    ("Product Leaders Retreat", "2024-05-02T09:00:00.000Z", "Lakeside Lodge", "1200", 40),
    ("Open Source Sprint", "2024-05-23T10:00:00.000Z", "Library Annex", "0", 64),
    ("Security Bootcamp", "2024-06-06T08:00:00.000Z", "Cyber Hub", "499", 88),
    ("UX Research Meetup", "2024-06-20T18:30:00.000Z", "Studio 5", "10", 47),
    ("AI Ethics Panel", "2024-07-11T17:00:00.000Z", "City Hall Auditorium", "25", 305),
    ("Mobile Dev Summit", "2024-08-15T09:00:00.000Z", "Convention Center", "220", 640),
    ("Blockchain Basics", "2024-09-05T14:00:00.000Z", "Co-Lab Space", "TBD", 0),
    ("DevOps Days", "2024-09-26T09:00:00.000Z", "Harbor Pavilion", "180", 510),
    ("Women in Tech Brunch", "2024-10-10T11:00:00.000Z", "Garden Terrace", "35", 150),
    ("Game Jam Weekend", "2024-10-25T17:00:00.000Z", "Pixel Loft", "20", 96),
    ("Fintech Forum", "2024-11-14T09:00:00.000Z", "Stock Exchange Hall", "350", 275),
    ("Accessibility Summit", "2024-12-05T10:00:00.000Z", "Civic Center", "60", 130),
    ("New Year Hackathon", "2025-01-10T09:00:00.000Z", "Innovation Lab", "0", 180),
    ("Embedded Systems Expo", "2025-02-20T09:30:00.000Z", "Expo Hall C", "95", 260),
    ("Frontend Friday", "2025-03-07T18:00:00.000Z", "Rooftop Bar", "12.5", 70),
    ("Data Privacy Roundtable", "2025-03-27T15:00:00.000Z", "Boardroom 3", "85", 22),
    ("Spring Career Fair", "2025-04-17T10:00:00.000Z", "University Gym", "0", 890),
];

const ATTENDEES: &[(&str, &str, &str)] = &[
    ("1", "Alice Johnson", "VIP"),
    ("1", "Bob Smith", "General"),
    ("1", "Alicia Gomez", "General"),
    ("2", "Charlie Brown", "VIP"),
    ("2", "Diana Prince", "General"),
    ("2", "Ali Hassan", "Student"),
    ("3", "Ferris Crab", "General"),
    ("4", "Grace Hopper", "Speaker"),
    ("5", "Alan Turing", "Speaker"),
    ("5", "Hannah Lee", "General"),
    ("7", "Ivan Petrov", "General"),
    ("10", "Julia Roberts", "VIP"),
];

pub fn events() -> Vec<Event> {
    EVENTS
        .iter()
        .enumerate()
        .map(|(index, (name, date, venue, price, sold))| Event {
            id: EventId::new((index + 1).to_string()),
            name: (*name).to_string(),
            date: (*date).to_string(),
            venue: Some((*venue).to_string()),
            ticket_price: Some(TicketPrice::Text((*price).to_string())),
            tickets_sold: *sold,
            icon: None,
            description: None,
            created_at: Some((*date).to_string()),
        })
        .collect()
}

pub fn attendees() -> Vec<Attendee> {
    ATTENDEES
        .iter()
        .enumerate()
        .map(|(index, (event_id, name, ticket))| Attendee {
            id: AttendeeId::new((index + 1).to_string()),
            name: (*name).to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            ticket_type: Some((*ticket).to_string()),
            event_id: Some(EventId::new(*event_id)),
        })
        .collect()
}

pub fn store() -> EventStore {
    EventStore::new(events(), attendees())
}
