use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use dayline_core::{DayView, Minute};
use dayline_ingest::{normalize_day, parse_day_record, DayRecord, NormalizeOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

mod calendar;
mod config;
mod logging;
mod render;
mod state;
mod store;

use config::Config;
use store::{DaySource, LocalStore, NewBlock};

#[derive(Parser, Debug)]
#[command(
    name = "dayline",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DAYLINE_BUILD_SHA"), ")"),
    about = "Day timeline for one staff member: shift, break, appointments, blocks"
)]
struct Cli {
    /// Reject malformed HH:MM times instead of defaulting missing parts to 0
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DayArgs {
    /// Staff member id
    #[arg(long, required_unless_present = "file")]
    staff: Option<String>,

    /// Day to show (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Compose a day record JSON file directly instead of asking the store
    #[arg(long, conflicts_with_all = ["staff", "date"])]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the composed timeline for a day
    Show {
        #[command(flatten)]
        day: DayArgs,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List free slots of at least --min minutes
    Slots {
        #[command(flatten)]
        day: DayArgs,

        /// Minimum slot length in minutes (default from config.display.min_slot_minutes)
        #[arg(long)]
        min: Option<Minute>,
    },

    /// Write the day's booked segments as an ICS calendar to stdout
    ExportIcs {
        #[command(flatten)]
        day: DayArgs,
    },

    /// Copy a day record JSON file into the local store
    Import {
        path: PathBuf,
    },

    /// Create or delete blocked time
    Block {
        #[command(subcommand)]
        command: BlockCommand,
    },

    /// Manage ~/.dayline/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BlockCommand {
    /// Block out time on a day
    Add {
        #[arg(long)]
        staff: String,

        #[arg(long)]
        date: NaiveDate,

        /// HH:MM
        #[arg(long)]
        start: String,

        /// HH:MM
        #[arg(long)]
        end: String,

        #[arg(long, default_value = "Blocked")]
        reason: String,
    },

    /// Delete a block by id
    Remove {
        #[arg(long)]
        staff: String,

        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config()?;
    logging::init_logging(&cfg.log.level);
    let opts = cfg.normalize_options(cli.strict);

    match cli.command {
        Command::Show { day, json } => {
            let (record, view) = load_view(&cfg, &day, opts).await?;
            if json {
                let out = render::DayOutput::new(&record.staff_id, record.date, &view);
                println!("{}", render::render_json(&out)?);
            } else {
                print!("{}", render::render_text(&record.staff_id, record.date, &view));
            }
        }

        Command::Slots { day, min } => {
            let (_, view) = load_view(&cfg, &day, opts).await?;
            let min = min.unwrap_or(cfg.display.min_slot_minutes);
            if min <= 0 {
                bail!("--min must be positive");
            }
            print!("{}", render::render_slots(&view, min));
        }

        Command::ExportIcs { day } => {
            let (record, view) = load_view(&cfg, &day, opts).await?;
            let events = match view.timeline() {
                Some(t) => calendar::timeline_to_events(&record.staff_id, record.date, t),
                None => Vec::new(),
            };
            print!("{}", calendar::events_to_ics(&events));
        }

        Command::Import { path } => {
            let record = read_record_file(&path).await?;
            store::validate_staff_id(&record.staff_id)?;
            // Catch bad times now rather than at the next `show`.
            normalize_day(&record, opts)?;
            let stored = LocalStore::open_default()?.put_day(&record).await?;
            println!("Imported {} {} -> {}", record.staff_id, record.date, stored.display());
        }

        Command::Block { command } => match command {
            BlockCommand::Add {
                staff,
                date,
                start,
                end,
                reason,
            } => {
                let source = DaySource::from_config(&cfg)?;
                let block = NewBlock {
                    date,
                    start_time: start,
                    end_time: end,
                    reason,
                };
                let created = source.create_block(&staff, &block).await?;
                println!(
                    "Blocked {}-{} on {} ({}): {}",
                    created.start_time, created.end_time, date, created.reason, created.id
                );
            }
            BlockCommand::Remove { staff, id } => {
                let source = DaySource::from_config(&cfg)?;
                source.delete_block(&staff, &id).await?;
                println!("Removed {id}");
            }
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

async fn read_record_file(path: &Path) -> Result<DayRecord> {
    let s = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    parse_day_record(&s).with_context(|| format!("parse {}", path.display()))
}

/// Fetch (or read) the day record, normalize it and build the view.
async fn load_view(cfg: &Config, day: &DayArgs, opts: NormalizeOptions) -> Result<(DayRecord, DayView)> {
    let record = match (&day.file, &day.staff) {
        (Some(path), _) => read_record_file(path).await?,
        (None, Some(staff)) => {
            let date = day.date.unwrap_or_else(|| Local::now().date_naive());
            DaySource::from_config(cfg)?
                .fetch_day(staff, date)
                .await
                .with_context(|| format!("loading {staff} {date}"))?
        }
        (None, None) => bail!("pass --staff <id> or --file <path>"),
    };

    let normalized = normalize_day(&record, opts)?;
    debug!(
        staff_id = %normalized.staff_id,
        date = %normalized.date,
        appointments = normalized.appointments.len(),
        blocks = normalized.blocks.len(),
        "day_normalized"
    );

    let view = normalized
        .view()
        .with_context(|| format!("composing {} {}", record.staff_id, record.date))?;
    Ok((record, view))
}
