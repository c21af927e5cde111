//! TrimCoach - Personal Health Tracker
//!
//! Thin command-line shell over the ingestion and aggregation
//! pipelines. All persistence and derivation logic lives in the
//! library; this binary only parses arguments and renders results.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trimcoach::config::{self, BackendKind};
use trimcoach::dashboard::{self, DashboardModel};
use trimcoach::ingest::{self, MealEntry, WeightEntry, WorkoutEntry};
use trimcoach::records::{Alcohol, MealSlot, StreamKind, WorkoutType};
use trimcoach::storage::{self, Table};

#[derive(Parser)]
#[command(name = "trimcoach")]
#[command(author, version, about = "Personal health tracker: log daily records, watch the trend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a record to one of the streams
    Log {
        #[command(subcommand)]
        record: LogCommands,
    },
    /// Show latest values, rolling average, and recent records
    Dashboard,
    /// Show the backing files for manual backup (local backend only)
    Export,
    /// Show the configured backend and stream layout
    Info,
}

#[derive(Subcommand)]
enum LogCommands {
    /// Log weight, waist, sleep, condition, and alcohol for a day
    Weight {
        /// Calendar date the entry is for (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Body weight in kilograms
        #[arg(short, long)]
        weight_kg: f64,
        /// Waist circumference in centimeters (0 = not measured)
        #[arg(long, default_value_t = 0.0)]
        waist_cm: f64,
        /// Sleep duration in hours
        #[arg(long, default_value_t = 7.0)]
        sleep_h: f64,
        /// Subjective condition, 1-5
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
        condition: u8,
        /// Alcohol intake
        #[arg(short, long, value_enum, default_value = "none")]
        alcohol: AlcoholArg,
    },
    /// Log a meal (free-text items, paste-friendly)
    Meal {
        /// Calendar date the entry is for (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Which part of the day the meal belongs to
        #[arg(short, long, value_enum, default_value = "other")]
        slot: MealSlotArg,
        /// What was eaten (required)
        #[arg(short, long)]
        items: String,
        /// Optional note
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Log a workout
    Workout {
        /// Calendar date the entry is for (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Workout category
        #[arg(short = 't', long = "type", value_enum)]
        workout_type: WorkoutTypeArg,
        /// Duration in minutes
        #[arg(long, default_value_t = 60)]
        duration_min: u32,
        /// Optional note
        #[arg(short, long, default_value = "")]
        notes: String,
    },
}

/// CLI spelling of [`Alcohol`].
#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlcoholArg {
    None,
    Light,
    Bottle,
    Heavy,
}

impl From<AlcoholArg> for Alcohol {
    fn from(arg: AlcoholArg) -> Self {
        match arg {
            AlcoholArg::None => Alcohol::None,
            AlcoholArg::Light => Alcohol::Light,
            AlcoholArg::Bottle => Alcohol::Bottle,
            AlcoholArg::Heavy => Alcohol::Heavy,
        }
    }
}

/// CLI spelling of [`MealSlot`].
#[derive(Clone, Copy, Debug, ValueEnum)]
enum MealSlotArg {
    BeforeWork,
    AtWork,
    PreWorkout,
    PostWorkout,
    Other,
}

impl From<MealSlotArg> for MealSlot {
    fn from(arg: MealSlotArg) -> Self {
        match arg {
            MealSlotArg::BeforeWork => MealSlot::BeforeWork,
            MealSlotArg::AtWork => MealSlot::AtWork,
            MealSlotArg::PreWorkout => MealSlot::PreWorkout,
            MealSlotArg::PostWorkout => MealSlot::PostWorkout,
            MealSlotArg::Other => MealSlot::Other,
        }
    }
}

/// CLI spelling of [`WorkoutType`].
#[derive(Clone, Copy, Debug, ValueEnum)]
enum WorkoutTypeArg {
    Upper,
    Lower,
    Full,
    Cardio,
    Rest,
}

impl From<WorkoutTypeArg> for WorkoutType {
    fn from(arg: WorkoutTypeArg) -> Self {
        match arg {
            WorkoutTypeArg::Upper => WorkoutType::UpperBody,
            WorkoutTypeArg::Lower => WorkoutType::LowerBody,
            WorkoutTypeArg::Full => WorkoutType::FullBody,
            WorkoutTypeArg::Cardio => WorkoutType::Cardio,
            WorkoutTypeArg::Rest => WorkoutType::Rest,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = config::load_config().context("failed to load configuration")?;

    match cli.command {
        Commands::Log { record } => {
            let mut store = storage::open_store(&config)?;
            storage::init_streams(store.as_ref())?;

            let today = Local::now().date_naive();
            let result = match record {
                LogCommands::Weight {
                    date,
                    weight_kg,
                    waist_cm,
                    sleep_h,
                    condition,
                    alcohol,
                } => ingest::submit_weight(
                    store.as_ref(),
                    WeightEntry {
                        date: date.unwrap_or(today),
                        weight_kg,
                        waist_cm,
                        sleep_h,
                        condition,
                        alcohol: alcohol.into(),
                    },
                ),
                LogCommands::Meal {
                    date,
                    slot,
                    items,
                    notes,
                } => ingest::submit_meal(
                    store.as_ref(),
                    MealEntry {
                        date: date.unwrap_or(today),
                        meal_slot: slot.into(),
                        items,
                        notes,
                    },
                ),
                LogCommands::Workout {
                    date,
                    workout_type,
                    duration_min,
                    notes,
                } => ingest::submit_workout(
                    store.as_ref(),
                    WorkoutEntry {
                        date: date.unwrap_or(today),
                        workout_type: workout_type.into(),
                        duration_min,
                        notes,
                    },
                ),
            };

            store.close()?;
            match result {
                Ok(()) => println!("Saved."),
                Err(e) => {
                    // Surface the failure; the record was not written
                    eprintln!("Save failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Dashboard => {
            let mut store = storage::open_store(&config)?;
            storage::init_streams(store.as_ref())?;
            let model = dashboard::summarize(store.as_ref());
            store.close()?;
            render_dashboard(&model);
        }
        Commands::Export => {
            let store = storage::open_store(&config)?;
            let mut any_local = false;
            for kind in StreamKind::ALL {
                if let Some(path) = store.stream_path(kind) {
                    println!("{}: {}", kind, path.display());
                    any_local = true;
                }
            }
            if !any_local {
                println!(
                    "Remote backend: use the spreadsheet service's own download feature for backups."
                );
            }
        }
        Commands::Info => {
            println!("backend: {}", config.backend);
            if config.backend == BackendKind::Local {
                println!("data dir: {}", config.data_dir.display());
            }
            if let Some(sheets) = &config.sheets {
                println!("spreadsheet_id: {}", sheets.spreadsheet_id);
            }
            println!("streams: weight, meals, workouts");
        }
    }

    Ok(())
}

fn render_dashboard(model: &DashboardModel) {
    match &model.weight {
        Ok(Some(summary)) => {
            if let Some(latest) = &summary.latest_weight {
                println!("Latest weight:     {:.1} kg ({})", latest.value, latest.date);
            }
            if let Some(rolling) = summary.latest_rolling {
                println!("7-entry average:   {:.1} kg", rolling);
            }
            if let Some(waist) = &summary.latest_waist {
                println!("Latest waist:      {:.1} cm ({})", waist.value, waist.date);
            }

            println!("\nWeight trend:");
            for point in &summary.weight_series {
                let weight = point
                    .weight_kg
                    .map_or_else(|| "   -".to_string(), |v| format!("{:5.1}", v));
                let rolling = point
                    .rolling_mean
                    .map_or_else(|| "   -".to_string(), |v| format!("{:5.1}", v));
                println!("  {}  {} kg  avg {} kg", point.date, weight, rolling);
            }
        }
        Ok(None) => {
            println!("No weight data yet. Log an entry first: trimcoach log weight --weight-kg 75");
        }
        Err(e) => {
            eprintln!("Weight section unavailable: {}", e);
        }
    }

    println!("\nRecent meals:");
    render_table_section(&model.recent_meals);
    println!("\nRecent workouts:");
    render_table_section(&model.recent_workouts);
}

fn render_table_section(section: &Result<Table, dashboard::DashboardError>) {
    match section {
        Ok(table) if table.is_empty() => println!("  (none)"),
        Ok(table) => {
            println!("  {}", table.columns.join(" | "));
            for i in 0..table.len() {
                let cells: Vec<&str> = table.rows[i].iter().map(String::as_str).collect();
                println!("  {}", cells.join(" | "));
            }
        }
        Err(e) => eprintln!("  unavailable: {}", e),
    }
}
