use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::{
    domain::{DateBucket, MatchKind, StatusTab, TicketRecord},
    records,
};
use sweepstakes::{ConfigWizard, LogNotifier, SweepstakesConfig};
use ticket_catalog::CatalogQueryEngine;
use tracing::warn;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query the ticket catalog the way the profile page does.
    Tickets {
        /// Status tab: all, active or finished.
        #[arg(long, default_value = "all")]
        tab: String,
        /// Free-text search over ticket ids (debounced).
        #[arg(long)]
        search: Option<String>,
        /// Date bucket key: all, 7-days, last-month or previous.
        #[arg(long)]
        bucket: Option<String>,
        /// JSON array of ticket records; defaults to the built-in sample set.
        #[arg(long)]
        tickets_file: Option<PathBuf>,
        /// Print the full view as JSON instead of one line per ticket.
        #[arg(long)]
        json: bool,
    },
    /// Run a sweepstakes configuration wizard session end to end.
    ConfigureSweepstakes {
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long)]
        draw_date: Option<NaiveDate>,
        #[arg(long)]
        ticket_price: Option<f64>,
        #[arg(long)]
        main_prize: Option<f64>,
        #[arg(long)]
        secondary_prize: Option<f64>,
        #[arg(long)]
        protocol_fee: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match cli.command {
        Command::Tickets {
            tab,
            search,
            bucket,
            tickets_file,
            json,
        } => run_tickets(tab, search, bucket, tickets_file, json).await,
        Command::ConfigureSweepstakes {
            start_date,
            end_date,
            draw_date,
            ticket_price,
            main_prize,
            secondary_prize,
            protocol_fee,
        } => {
            run_configure_sweepstakes(SweepstakesConfig {
                start_date,
                end_date,
                draw_date,
                ticket_price,
                main_prize,
                secondary_prize,
                protocol_fee,
            })
            .await
        }
    }
}

async fn run_tickets(
    tab: String,
    search: Option<String>,
    bucket: Option<String>,
    tickets_file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let settings = load_settings();

    let records = match tickets_file.or_else(|| settings.tickets_path.clone().map(PathBuf::from)) {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read tickets file '{}'", path.display()))?;
            records::parse_records(&raw)?
        }
        None => records::sample_records(),
    };

    let engine = CatalogQueryEngine::with_search_debounce(
        records,
        Duration::from_millis(settings.search_debounce_ms),
    );

    engine.set_tab(parse_tab(&tab)).await;

    if let Some(key) = bucket {
        let parsed = DateBucket::from_key(&key);
        if parsed == DateBucket::All && key != "all" {
            warn!(key = %key, "unknown date bucket key, treating as 'all'");
        }
        engine.set_date_bucket(parsed).await;
    }

    // The search is applied last so it wins over the bucket, like typing
    // after picking a bucket does in the UI.
    if let Some(query) = search {
        let mut rx = engine.subscribe_events();
        let wait = !query.is_empty();
        engine.set_search_query(query).await;
        if wait {
            // The result is only meaningful once the debounce committed.
            let _ = rx.recv().await;
        }
    }

    let view = engine.visible_results().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    for record in &view.records {
        print_record(record);
    }
    match view.match_kind {
        MatchKind::Default => println!("{} ticket(s)", view.records.len()),
        MatchKind::FilteredNonempty => {
            println!("{} ticket(s) matched the filter", view.records.len())
        }
        MatchKind::FilteredEmpty => println!("Ticket number not found"),
    }

    Ok(())
}

fn parse_tab(tab: &str) -> StatusTab {
    match tab {
        "active" => StatusTab::Active,
        "finished" => StatusTab::Finished,
        "all" => StatusTab::All,
        other => {
            warn!(tab = %other, "unknown tab, showing all tickets");
            StatusTab::All
        }
    }
}

fn print_record(record: &TicketRecord) {
    let extra = match (&record.win_amount, record.days_left) {
        (Some(win), _) => format!("won {win}"),
        (None, Some(days)) => format!("{days} day(s) left"),
        (None, None) => String::new(),
    };
    println!(
        "{}  {:?}  draw {}  {}  {}",
        record.id, record.status, record.draw_date, record.draw_amount, extra
    );
}

async fn run_configure_sweepstakes(patch: SweepstakesConfig) -> Result<()> {
    let mut wizard = ConfigWizard::new(LogNotifier);

    wizard.open();
    wizard.update(patch);
    wizard.next();

    println!(
        "step {}: reviewing {}",
        wizard.step().number(),
        serde_json::to_string(wizard.data())?
    );

    wizard.confirm().await;
    println!("confirmed; modal open: {}", wizard.is_modal_open());

    Ok(())
}
