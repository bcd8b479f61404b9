use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    AddEventWizard, AttendeeSearchController, ClientSettings, EventCard, EventListView,
    EventRepository, FetchOutcome, HttpEventRepository, ScrollMetrics, SearchStatus, SortField,
    SubmitOutcome, Theme, ThemeContext,
};
use shared::{
    domain::{AttendeeId, EventId},
    protocol::NewEvent,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::{resolve, settings_path, CliOverrides};

#[derive(Parser, Debug)]
#[command(name = "events", about = "Browse and manage events from the events API")]
struct Cli {
    /// Base URL of the events API.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    theme: Option<Theme>,
    #[arg(long, global = true)]
    page_size: Option<u32>,
    /// Settings file to read instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Event table with optional sorting and expanded attendee rows.
    List(ListArgs),
    /// Every event on the first page as a card.
    Cards,
    Attendees {
        event_id: String,
    },
    /// Search attendees by name, optionally opening the event of one result.
    Search {
        query: String,
        #[arg(long)]
        select: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        venue: String,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        #[arg(long, default_value = "")]
        description: String,
        /// Submit after printing the review instead of stopping there.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Pages to load; ignored with --all.
    #[arg(long, default_value_t = 1)]
    pages: u32,
    #[arg(long)]
    all: bool,
    /// date, price or sold
    #[arg(long)]
    sort: Option<SortField>,
    #[arg(long, requires = "sort")]
    desc: bool,
    /// Event ids whose attendees are shown under the row.
    #[arg(long)]
    expand: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let cli = Cli::parse();

    let path = settings_path(cli.config.as_deref());
    let settings = resolve(
        path.as_deref(),
        CliOverrides {
            api_url: cli.api_url,
            page_size: cli.page_size,
            theme: cli.theme,
        },
        |key| std::env::var(key).ok(),
    );
    debug!(?path, api_url = %settings.api_url, "settings resolved");

    let repo: Arc<dyn EventRepository> = Arc::new(
        HttpEventRepository::from_settings(&settings).context("failed to set up the events API client")?,
    );
    let theme = ThemeContext::new(settings.theme);

    match cli.command {
        Command::List(args) => list(repo, &settings, theme, args).await,
        Command::Cards => cards(repo, &settings, theme).await,
        Command::Attendees { event_id } => attendees(repo, &event_id).await,
        Command::Search { query, select } => search(repo, &settings, theme, &query, select).await,
        Command::Add {
            name,
            date,
            venue,
            price,
            description,
            yes,
        } => {
            let draft = NewEvent {
                event_name: name,
                event_date: date,
                event_venue: venue,
                ticket_price: price,
                description,
            };
            add(repo, theme, draft, yes).await
        }
    }
}

async fn list(
    repo: Arc<dyn EventRepository>,
    settings: &ClientSettings,
    theme: ThemeContext,
    args: ListArgs,
) -> Result<()> {
    let view = EventListView::new(repo, settings);
    let bottom = ScrollMetrics::at_bottom(1_000.0, 200.0);

    let mut outcome = view.mount().await;
    let mut loaded = 1;
    while matches!(outcome, FetchOutcome::Appended(_)) && (args.all || loaded < args.pages) {
        outcome = view.on_scroll(bottom).await;
        loaded += 1;
    }
    if outcome == FetchOutcome::Failed {
        bail!(view.status_line().await);
    }

    if let Some(field) = args.sort {
        view.sort_by(field).await;
        if args.desc {
            view.sort_by(field).await;
        }
    }
    for id in args.expand {
        view.toggle_attendees(&EventId::new(id)).await;
    }

    println!("{}", view.render_table(theme.frame()).await);
    Ok(())
}

async fn cards(repo: Arc<dyn EventRepository>, settings: &ClientSettings, theme: ThemeContext) -> Result<()> {
    let events = repo
        .list_events(1, settings.page_size)
        .await
        .context("failed to load events")?;
    if events.is_empty() {
        println!("No events.");
    }
    for event in &events {
        println!("{}", EventCard::from(event).render(theme.frame()));
    }
    Ok(())
}

async fn attendees(repo: Arc<dyn EventRepository>, event_id: &str) -> Result<()> {
    let event_id = EventId::new(event_id);
    let attendees = repo
        .list_attendees(&event_id)
        .await
        .with_context(|| format!("failed to load attendees of event {event_id}"))?;
    if attendees.is_empty() {
        println!("No attendees");
    }
    for attendee in attendees {
        println!("{}\t{}\t{}", attendee.id, attendee.name, attendee.email);
    }
    Ok(())
}

async fn search(
    repo: Arc<dyn EventRepository>,
    settings: &ClientSettings,
    theme: ThemeContext,
    query: &str,
    select: Option<String>,
) -> Result<()> {
    let controller = AttendeeSearchController::from_settings(repo, settings)
        .with_selection_handler(|event| info!(event_id = %event.id, "opening event"));

    // Fed one keystroke at a time; only the last prefix survives the debounce.
    let mut typed = String::new();
    for ch in query.chars() {
        typed.push(ch);
        controller.on_query_changed(&typed).await;
    }

    let wait = settings.debounce() + settings.request_timeout() + Duration::from_secs(1);
    let snapshot = tokio::time::timeout(wait, async {
        loop {
            let snapshot = controller.snapshot().await;
            if !matches!(snapshot.status, SearchStatus::Debouncing | SearchStatus::Searching) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .context("attendee search did not finish")?;

    match snapshot.status {
        SearchStatus::Idle => {
            println!(
                "Type at least {} characters to search.",
                settings.min_query_len
            );
            return Ok(());
        }
        SearchStatus::Failed => bail!(snapshot.error.unwrap_or_else(|| "Search failed.".into())),
        _ => {}
    }

    if snapshot.results.is_empty() {
        println!("No attendees match '{}'.", snapshot.query);
    }
    for attendee in &snapshot.results {
        let event = attendee
            .event_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".into());
        println!("{}\t{}\t{}\tevent {}", attendee.id, attendee.name, attendee.email, event);
    }

    if let Some(id) = select {
        let Some(event) = controller.select(&AttendeeId::new(id)).await else {
            let error = controller.snapshot().await.error;
            bail!(error.unwrap_or_else(|| "Could not open the event.".into()));
        };
        println!("{}", EventCard::from(&event).render(theme.frame()));
    }
    Ok(())
}

async fn add(repo: Arc<dyn EventRepository>, theme: ThemeContext, draft: NewEvent, submit: bool) -> Result<()> {
    let mut wizard = AddEventWizard::new(repo);
    wizard.set_draft(draft);
    wizard.submit().await?;

    println!("{}", wizard.step().label());
    for line in wizard.review_lines() {
        println!("  {line}");
    }
    if !submit {
        println!("Re-run with --yes to submit.");
        return Ok(());
    }

    match wizard.submit().await {
        Ok(SubmitOutcome::Created(event)) => {
            println!("Event added successfully!");
            println!("{}", EventCard::from(&event).render(theme.frame()));
            Ok(())
        }
        Ok(SubmitOutcome::Advanced) => bail!("the add-event form did not reach review"),
        Err(_) => bail!(wizard
            .error()
            .unwrap_or("Failed to save event.")
            .to_string()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse_sort_fields_and_theme() {
        let cli = Cli::try_parse_from([
            "events", "--theme", "dark", "list", "--sort", "price", "--desc", "--expand", "42",
        ])
        .expect("parse");
        assert_eq!(cli.theme, Some(Theme::Dark));
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.sort, Some(SortField::TicketPrice));
        assert!(args.desc);
        assert_eq!(args.expand, vec!["42".to_string()]);
        assert_eq!(args.pages, 1);
    }

    #[test]
    fn desc_without_sort_is_rejected() {
        assert!(Cli::try_parse_from(["events", "list", "--desc"]).is_err());
    }
}
