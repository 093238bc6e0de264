mod config;
mod error;
mod export;
mod intake;
mod models;
mod report;
mod scheduler;
mod session;
mod stats;
mod storage;
mod tui;
mod utils;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use fd_lock::RwLock;
use config::ReminderConfig;
use models::{Period, TimeOfDay};
use report::Reporter;
use scheduler::{check_active, next_reminder, slot_status, time_until, SlotStatus};
use session::Session;
use std::fs::OpenOptions;
use storage::Storage;
use utils::{format_hm, join_medicines};

#[derive(Parser)]
#[command(name = "medtrack")]
#[command(about = "A terminal medication reminder and intake tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive reminder and logging session
    Start,
    /// Show the next upcoming reminder
    Next {
        /// Time to compute from (HH:MM), defaults to now
        #[arg(long)]
        at: Option<TimeOfDay>,
    },
    /// Show the reminder due at this minute, if any
    Check {
        /// Time to check (HH:MM), defaults to now
        #[arg(long)]
        at: Option<TimeOfDay>,
    },
    /// Show all reminder slots and their status
    Schedule {
        /// Time to compute statuses at (HH:MM), defaults to now
        #[arg(long)]
        at: Option<TimeOfDay>,
    },
    /// Change the reminder time of one period
    Set {
        /// morning, afternoon or night
        period: Period,
        /// New time (HH:MM)
        time: TimeOfDay,
    },
    /// Change reminder settings
    Config {
        /// Turn all reminders on or off
        #[arg(long)]
        enabled: Option<bool>,
        /// Turn sound alerts on or off
        #[arg(long)]
        sound: Option<bool>,
        /// Minutes either side of a slot that count as due (e.g. 0m, 5m)
        #[arg(long)]
        window: Option<String>,
        /// Snooze duration (e.g. 10m)
        #[arg(long)]
        snooze: Option<String>,
        /// Restore the default reminder times
        #[arg(long)]
        reset: bool,
    },
}

fn now_time_of_day() -> TimeOfDay {
    Local::now().time().into()
}

fn parse_minutes(value: &str, max: u16) -> Result<u16> {
    let duration = humantime::parse_duration(value)
        .map_err(|e| anyhow::anyhow!("Invalid duration '{}': {}", value, e))?;
    let mins = duration.as_secs() / 60;
    if duration.as_secs() % 60 != 0 || mins > max as u64 {
        anyhow::bail!(
            "Duration '{}' must be whole minutes, at most {} minutes",
            value,
            max
        );
    }
    Ok(mins as u16)
}

fn init_logging() -> Result<()> {
    let log_path = Storage::get_base_dir()?.join("medtrack.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    let storage = Storage::new()?;
    let mut config = storage.load()?;

    match cli.command {
        Commands::Start => {
            let base_dir = Storage::get_base_dir()?;
            let lock_path = base_dir.join("medtrack.lock");
            let lock_file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(lock_path)?;

            let mut lock = RwLock::new(lock_file);
            let _guard = lock.try_write().map_err(|_| {
                anyhow::anyhow!("Another MedTrack session is already running. Please close it before starting a new one.")
            })?;

            log::info!("Session started");
            let mut session = Session::new(config, storage, base_dir.join("exports"));

            tui::run_tui(&mut session)?;

            log::info!("Session ended with {} records", session.log.len());
            println!("\nSession ended.");
            let reporter = Reporter::new(&session.log, &session.config.profile.name);
            reporter.report()?;
        }
        Commands::Next { at } => {
            let now = at.unwrap_or_else(now_time_of_day);
            let next = next_reminder(now, &config.reminders);
            let until = time_until(now, next.slot.time);
            println!(
                "Next reminder: {} at {}{} - {}",
                next.slot.period,
                next.slot.time.format_12h(),
                if next.tomorrow { " (tomorrow)" } else { "" },
                join_medicines(&next.slot.medicines)
            );
            println!("Time until: {}", format_hm(until));
        }
        Commands::Check { at } => {
            let now = at.unwrap_or_else(now_time_of_day);
            if !config.reminders.enabled {
                println!("Reminders are disabled.");
            } else if let Some(slot) = check_active(now, &config.reminders) {
                println!(
                    "It's time for your {} medication! Please take: {}",
                    slot.period,
                    join_medicines(&slot.medicines)
                );
            } else {
                println!("No reminder due at {}.", now);
            }
        }
        Commands::Schedule { at } => {
            let now = at.unwrap_or_else(now_time_of_day);
            println!(
                "Reminders: {} | Sound: {}",
                if config.reminders.enabled { "on" } else { "off" },
                if config.reminders.sound_enabled { "on" } else { "off" }
            );
            println!("{:<11} {:<10} {:<10} Medications", "Period", "Time", "Status");
            for slot in config.reminders.slots() {
                let status = match slot_status(now, slot.time) {
                    SlotStatus::Upcoming => "Upcoming",
                    SlotStatus::Active => "ACTIVE",
                    SlotStatus::Completed => "Completed",
                };
                println!(
                    "{:<11} {:<10} {:<10} {}",
                    slot.period.name(),
                    slot.time.format_12h(),
                    status,
                    join_medicines(&slot.medicines)
                );
            }
        }
        Commands::Set { period, time } => {
            config.reminders.set_time(period, time);
            storage.save(&config)?;
            log::info!("{} reminder set to {}", period, time);
            println!("{} reminder set for {}", period, time.format_12h());
        }
        Commands::Config {
            enabled,
            sound,
            window,
            snooze,
            reset,
        } => {
            let reminders = &mut config.reminders;
            if reset {
                reminders.reset_times();
            }
            if let Some(enabled) = enabled {
                reminders.enabled = enabled;
            }
            if let Some(sound) = sound {
                reminders.sound_enabled = sound;
            }
            if let Some(window) = window {
                reminders.window_mins = parse_minutes(&window, ReminderConfig::MAX_WINDOW_MINS)?;
            }
            if let Some(snooze) = snooze {
                reminders.snooze_mins = parse_minutes(&snooze, ReminderConfig::MAX_SNOOZE_MINS)?;
            }
            storage.save(&config)?;
            log::info!("Reminder settings updated");
            println!("{}", serde_json::to_string_pretty(&config.reminders)?);
        }
    }

    Ok(())
}
