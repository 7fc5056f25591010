//! TechTrack CLI - track progress through a catalog of learning topics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use techtrack_core::{
    Date, NewTechnology, Technology, TechnologyFilter, TechnologyId, TechnologyPatch,
    TechnologyStatus,
};
use techtrack_progress::{deadline, LoadOrigin, ProgressStore, SeededRandom};
use techtrack_storage::JsonFileStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "techtrack")]
#[command(about = "Track progress through learning topics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding persisted data
    #[arg(short, long, default_value = ".techtrack")]
    data_dir: std::path::PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List technologies
    List {
        /// Only this status (not-started, in-progress, completed)
        #[arg(long)]
        status: Option<TechnologyStatus>,
        /// Case-insensitive search in title and description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one technology
    Show {
        /// Technology ID
        id: TechnologyId,
    },
    /// Add a technology
    Add {
        /// Title
        title: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Initial status
        #[arg(long)]
        status: Option<TechnologyStatus>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<Date>,
        /// Notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Set a status directly
    SetStatus {
        /// Technology ID
        id: TechnologyId,
        /// New status
        status: TechnologyStatus,
    },
    /// Advance a status one step
    Cycle {
        /// Technology ID
        id: TechnologyId,
    },
    /// Replace notes
    Notes {
        /// Technology ID
        id: TechnologyId,
        /// Note text
        text: String,
    },
    /// Set a deadline, or clear it when omitted
    Deadline {
        /// Technology ID
        id: TechnologyId,
        /// Deadline (YYYY-MM-DD)
        date: Option<Date>,
    },
    /// Edit several fields at once
    Edit {
        /// Technology ID
        id: TechnologyId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TechnologyStatus>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<Date>,
        #[arg(long)]
        clear_deadline: bool,
    },
    /// Set one status on several technologies
    Bulk {
        /// New status
        status: TechnologyStatus,
        /// Technology IDs
        #[arg(required = true)]
        ids: Vec<TechnologyId>,
    },
    /// Mark everything completed
    CompleteAll,
    /// Reset everything to not-started
    Reset,
    /// Start a random not-started technology
    Random {
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show progress
    Progress,
    /// Show overdue and upcoming deadlines
    Deadlines {
        /// Days ahead to include
        #[arg(long, default_value = "7")]
        within: u32,
    },
    /// Export the collection as JSON
    Export {
        /// Output file; stdout when omitted
        path: Option<std::path::PathBuf>,
    },
    /// Replace the collection from a JSON export
    Import {
        /// Input file
        path: std::path::PathBuf,
    },
    /// Replace the collection with the starter catalog
    RestoreSeed,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let storage = JsonFileStore::new(&cli.data_dir)
        .await
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;
    let mut store = ProgressStore::open(storage).await;
    if let LoadOrigin::Seeded(reason) = store.origin() {
        info!(?reason, "starting from the seed catalog");
    }

    match cli.command {
        Commands::List { status, search } => {
            let filter = TechnologyFilter {
                status: status.into(),
                search,
            };
            let found = store.filter(&filter);

            println!("Technologies ({})", found.len());
            for tech in &found {
                println!("  {}", format_row(tech));
            }
        }
        Commands::Show { id } => {
            let Some(tech) = store.get(id) else {
                println!("Technology {} not found", id);
                return Ok(());
            };

            println!("Technology: {}", tech.id);
            println!("  Title: {}", tech.title);
            println!("  Description: {}", tech.description);
            println!("  Status: {}", format_status(tech.status));
            println!("  Notes: {}", tech.notes);
            match tech.deadline {
                Some(date) => println!("  Deadline: {}", date),
                None => println!("  Deadline: -"),
            }
        }
        Commands::Add { title, description, status, deadline, notes } => {
            let tech = store
                .add_technology(NewTechnology {
                    title,
                    description,
                    status,
                    notes,
                    deadline,
                })
                .await?;
            println!("Added technology: {} - {}", tech.id, tech.title);
        }
        Commands::SetStatus { id, status } => {
            report(id, store.update_status(id, status).await);
        }
        Commands::Cycle { id } => {
            if store.cycle_status(id).await {
                if let Some(tech) = store.get(id) {
                    println!("{} is now {}", tech.title, format_status(tech.status));
                }
            } else {
                println!("Technology {} not found", id);
            }
        }
        Commands::Notes { id, text } => {
            report(id, store.update_notes(id, text).await);
        }
        Commands::Deadline { id, date } => {
            report(id, store.update_deadline(id, date).await);
        }
        Commands::Edit { id, title, description, status, notes, deadline, clear_deadline } => {
            let patch = TechnologyPatch {
                title,
                description,
                status,
                notes,
                deadline: if clear_deadline { Some(None) } else { deadline.map(Some) },
            };
            if patch.is_empty() {
                println!("Nothing to change");
                return Ok(());
            }
            report(id, store.edit_technology(id, patch).await?);
        }
        Commands::Bulk { status, ids } => {
            let updated = store.bulk_update_status(&ids, status).await;
            println!("Updated {} of {} technologies", updated, ids.len());
        }
        Commands::CompleteAll => {
            let updated = store.mark_all_completed().await;
            println!("Marked {} technologies completed", updated);
        }
        Commands::Reset => {
            let updated = store.reset_all_statuses().await;
            println!("Reset {} technologies", updated);
        }
        Commands::Random { seed } => {
            if let Some(seed) = seed {
                store = store.with_random_source(Box::new(SeededRandom::new(seed)));
            }
            match store.random_select_next().await {
                Some(id) => {
                    if let Some(tech) = store.get(id) {
                        println!("Next up: {} - {}", tech.id, tech.title);
                    }
                }
                None => println!("Nothing left to start"),
            }
        }
        Commands::Progress => {
            let summary = store.progress();
            println!("Progress: {}% ({}/{})", summary.percent, summary.completed, summary.total);
            for (status, count) in summary.breakdown() {
                println!("  {}: {}", format_status(status), count);
            }
        }
        Commands::Deadlines { within } => {
            let today = chrono::Local::now().date_naive();

            let overdue = store.overdue(today);
            println!("Overdue ({})", overdue.len());
            for tech in overdue {
                let late = deadline::days_remaining(tech, today).unwrap_or_default().abs();
                println!("  {} ({} days late)", format_row(tech), late);
            }

            let upcoming = store.upcoming(today, within);
            println!("Due within {} days ({})", within, upcoming.len());
            for tech in upcoming {
                println!("  {}", format_row(tech));
            }
        }
        Commands::Export { path } => {
            let bytes = store.export_snapshot()?;
            match path {
                Some(path) => {
                    tokio::fs::write(&path, &bytes)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Exported {} technologies to {}", store.technologies().len(), path.display());
                }
                None => println!("{}", String::from_utf8_lossy(&bytes)),
            }
        }
        Commands::Import { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let count = store.import_snapshot(&bytes).await?;
            println!("Imported {} technologies", count);
        }
        Commands::RestoreSeed => {
            store.restore_seed().await;
            println!("Restored {} starter technologies", store.technologies().len());
        }
    }

    Ok(())
}

fn report(id: TechnologyId, applied: bool) {
    if applied {
        println!("Updated technology {}", id);
    } else {
        println!("Technology {} not found", id);
    }
}

fn format_row(tech: &Technology) -> String {
    match tech.deadline {
        Some(date) => format!("{} | {} | {} (due {})", tech.id, format_status(tech.status), tech.title, date),
        None => format!("{} | {} | {}", tech.id, format_status(tech.status), tech.title),
    }
}

fn format_status(status: TechnologyStatus) -> &'static str {
    match status {
        TechnologyStatus::NotStarted => "NOT STARTED",
        TechnologyStatus::InProgress => "IN PROGRESS",
        TechnologyStatus::Completed => "COMPLETED",
    }
}
