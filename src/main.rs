//! `health-diary` command-line front end

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use health_diary_lib::commands;
use health_diary_lib::settings::{default_data_dir, Settings};
use health_diary_lib::{open_app, AppState};

/// Family health diary: trackers, daily records and reports.
#[derive(Parser)]
#[command(name = "health-diary", version, about)]
struct Cli {
    /// Data directory (defaults to $HEALTH_DIARY_DATA_DIR or the local data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage family members.
    #[command(subcommand)]
    Member(MemberCommand),

    /// Manage a member's trackers.
    #[command(subcommand)]
    Tracker(TrackerCommand),

    /// Open, show and list diary days.
    #[command(subcommand)]
    Day(DayCommand),

    /// Change a value on a diary day.
    #[command(subcommand)]
    Set(SetCommand),

    /// Set or clear the note of a day.
    Note {
        member: String,
        /// Note text; omit to clear the note.
        text: Option<String>,
        /// Day as YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Report on one tracker.
    Report {
        member: String,
        tracker: String,
        /// Window length in days (defaults to the settings value).
        #[arg(long)]
        days: Option<u32>,
    },

    /// Export the whole diary as JSON.
    Export {
        /// Output file; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the whole diary with an export file.
    Import { file: PathBuf },

    /// Delete every member and record.
    Reset,

    /// Show recent log lines.
    Logs {
        #[arg(default_value_t = 50)]
        lines: usize,
        /// Print the log file location instead.
        #[arg(long)]
        path: bool,
    },
}

#[derive(Subcommand)]
enum MemberCommand {
    /// Add a member.
    Add {
        name: String,
        /// Enable the per-day note field.
        #[arg(long)]
        notes: bool,
    },
    /// Rename a member.
    Rename { old: String, new: String },
    /// Remove a member and all of their records.
    Remove { name: String },
    /// Turn the per-day note field on or off.
    Notes {
        name: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// List members.
    List,
}

#[derive(Subcommand)]
enum TrackerCommand {
    /// Add a tracker.
    Add {
        member: String,
        name: String,
        /// unlimited-number, limited-number, array-strings, array-objects,
        /// array-objects-checkbox or array-objects-sets.
        #[arg(long = "type")]
        kind: String,
        /// Template: default number, scale maximum, comma-separated names,
        /// `name:detail` pairs, or `name|sets|reps` groups separated by `;`.
        #[arg(long, default_value = "")]
        value: String,
        /// Icon, required for limited-number and array-objects-checkbox.
        #[arg(long)]
        icon: Option<String>,
    },
    /// Edit a tracker's name, template or icon.
    Edit {
        member: String,
        tracker: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a tracker and its recorded values.
    Delete { member: String, tracker: String },
    /// Toggle a tracker between active and inactive.
    Toggle { member: String, tracker: String },
    /// List a member's trackers.
    List { member: String },
}

#[derive(Subcommand)]
enum DayCommand {
    /// Create or complete a day's record.
    Open {
        member: String,
        /// YYYY-MM-DD, defaults to today.
        date: Option<String>,
    },
    /// Print a day's record.
    Show { member: String, date: Option<String> },
    /// List diary dates, newest first.
    List { member: String },
}

#[derive(Subcommand)]
enum SetCommand {
    /// Set an unlimited-number value.
    Number {
        member: String,
        tracker: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(long)]
        date: Option<String>,
    },
    /// Set a limited-number value.
    Scale {
        member: String,
        tracker: String,
        value: u32,
        #[arg(long)]
        date: Option<String>,
    },
    /// Click the n-th icon of a limited-number scale.
    Click {
        member: String,
        tracker: String,
        unit: u32,
        #[arg(long)]
        date: Option<String>,
    },
    /// Append an entry (`name` or `name:detail`) to a list tracker.
    Add {
        member: String,
        tracker: String,
        text: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Replace the entry at an index.
    Edit {
        member: String,
        tracker: String,
        index: usize,
        text: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove the entry at an index.
    Remove {
        member: String,
        tracker: String,
        index: usize,
        #[arg(long)]
        date: Option<String>,
    },
    /// Toggle a checklist item.
    Check {
        member: String,
        tracker: String,
        index: usize,
        #[arg(long)]
        date: Option<String>,
    },
    /// Record the actual reps of one set; omit the count to clear it.
    Rep {
        member: String,
        tracker: String,
        group: usize,
        rep: usize,
        actual: Option<u32>,
        #[arg(long)]
        date: Option<String>,
    },
}

fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let settings = Settings::load_or_default(&data_dir);

    if let Err(e) = rolling_logger::init_logger(settings.log_dir(), "HealthDiary") {
        eprintln!("Logging disabled: {}", e);
    }

    let assume_yes = cli.yes;
    let state = open_app(settings, |err| {
        eprintln!("{}", err);
        confirm("Stored data cannot be read. Delete it and start over?", assume_yes)
    })
    .await?;
    let _ = rolling_logger::info("Diary opened");

    if let Err(e) = run(&state, cli.command, assume_yes).await {
        let _ = rolling_logger::error(&format!("Command failed: {}", e));
        return Err(e);
    }
    Ok(())
}

async fn run(state: &AppState, command: Option<Commands>, assume_yes: bool) -> anyhow::Result<()> {
    match command {
        None => {
            for member in commands::list_members(state).await.map_err(anyhow::Error::msg)? {
                println!("{} ({} trackers)", member.name, member.trackers.len());
            }
        }
        Some(Commands::Member(cmd)) => run_member(state, cmd, assume_yes).await?,
        Some(Commands::Tracker(cmd)) => run_tracker(state, cmd, assume_yes).await?,
        Some(Commands::Day(cmd)) => run_day(state, cmd).await?,
        Some(Commands::Set(cmd)) => run_set(state, cmd).await?,
        Some(Commands::Note { member, text, date }) => {
            commands::set_note(state, member, date, text).await.map_err(anyhow::Error::msg)?;
        }
        Some(Commands::Report { member, tracker, days }) => {
            let report = commands::tracker_report(state, member, tracker, days)
                .await
                .map_err(anyhow::Error::msg)?;
            print_json(&report)?;
        }
        Some(Commands::Export { output }) => match output {
            Some(path) => {
                commands::export_to_file(state, &path).await.map_err(anyhow::Error::msg)?;
                println!("Exported to {}", path.display());
            }
            None => println!("{}", commands::export_data(state).await.map_err(anyhow::Error::msg)?),
        },
        Some(Commands::Import { file }) => {
            if !confirm("Importing replaces the whole diary. Continue?", assume_yes) {
                return Ok(());
            }
            commands::import_from_file(state, &file).await.map_err(anyhow::Error::msg)?;
            println!("Imported {}", file.display());
        }
        Some(Commands::Reset) => {
            let confirmed = confirm("Delete every member and record?", assume_yes);
            commands::reset_data(state, confirmed).await.map_err(anyhow::Error::msg)?;
        }
        Some(Commands::Logs { path: true, .. }) => match rolling_logger::log_file_path() {
            Some(file) => println!("{}", file.display()),
            None => anyhow::bail!("Logging is not initialized"),
        },
        Some(Commands::Logs { lines, .. }) => {
            for line in rolling_logger::recent_lines(lines) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

async fn run_member(state: &AppState, cmd: MemberCommand, assume_yes: bool) -> anyhow::Result<()> {
    match cmd {
        MemberCommand::Add { name, notes } => {
            let member = commands::add_member(state, name, notes).await.map_err(anyhow::Error::msg)?;
            println!("Added {}", member.name);
        }
        MemberCommand::Rename { old, new } => {
            commands::rename_member(state, old, new).await.map_err(anyhow::Error::msg)?;
        }
        MemberCommand::Remove { name } => {
            let confirmed = confirm(&format!("Remove {} and all of their records?", name), assume_yes);
            commands::remove_member(state, name, confirmed).await.map_err(anyhow::Error::msg)?;
        }
        MemberCommand::Notes { name, enabled } => {
            commands::set_member_notes(state, name, enabled).await.map_err(anyhow::Error::msg)?;
        }
        MemberCommand::List => {
            for member in commands::list_members(state).await.map_err(anyhow::Error::msg)? {
                println!("{}", member.name);
            }
        }
    }
    Ok(())
}

async fn run_tracker(state: &AppState, cmd: TrackerCommand, assume_yes: bool) -> anyhow::Result<()> {
    match cmd {
        TrackerCommand::Add { member, name, kind, value, icon } => {
            let tracker = commands::create_tracker(state, member, name, kind, value, icon)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("Added {} ({})", tracker.name, tracker.kind());
        }
        TrackerCommand::Edit { member, tracker, name, value, icon } => {
            let tracker = commands::edit_tracker(state, member, tracker, name, value, icon)
                .await
                .map_err(anyhow::Error::msg)?;
            print_json(&tracker)?;
        }
        TrackerCommand::Delete { member, tracker } => {
            let confirmed = confirm(&format!("Delete {} and all of its values?", tracker), assume_yes);
            commands::delete_tracker(state, member, tracker, confirmed)
                .await
                .map_err(anyhow::Error::msg)?;
        }
        TrackerCommand::Toggle { member, tracker } => {
            let active = commands::toggle_tracker(state, member, tracker.clone())
                .await
                .map_err(anyhow::Error::msg)?;
            println!("{} is now {}", tracker, if active { "active" } else { "inactive" });
        }
        TrackerCommand::List { member } => {
            for tracker in commands::list_trackers(state, member).await.map_err(anyhow::Error::msg)? {
                let marker = if tracker.is_active { "" } else { " (inactive)" };
                println!("{} [{}]{}", tracker.name, tracker.kind(), marker);
            }
        }
    }
    Ok(())
}

async fn run_day(state: &AppState, cmd: DayCommand) -> anyhow::Result<()> {
    match cmd {
        DayCommand::Open { member, date } => {
            let date = commands::open_day(state, member, date).await.map_err(anyhow::Error::msg)?;
            println!("Opened {}", date);
        }
        DayCommand::Show { member, date } => {
            let record = commands::show_day(state, member, date).await.map_err(anyhow::Error::msg)?;
            print_json(&record)?;
        }
        DayCommand::List { member } => {
            for date in commands::list_days(state, member).await.map_err(anyhow::Error::msg)? {
                println!("{}", date);
            }
        }
    }
    Ok(())
}

async fn run_set(state: &AppState, cmd: SetCommand) -> anyhow::Result<()> {
    match cmd {
        SetCommand::Number { member, tracker, value, date } => {
            commands::set_number(state, member, date, tracker, value).await.map_err(anyhow::Error::msg)?;
        }
        SetCommand::Scale { member, tracker, value, date } => {
            commands::set_scale(state, member, date, tracker, value).await.map_err(anyhow::Error::msg)?;
        }
        SetCommand::Click { member, tracker, unit, date } => {
            let value = commands::click_scale(state, member, date, tracker, unit)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("{}", value);
        }
        SetCommand::Add { member, tracker, text, date } => {
            commands::add_entry(state, member, date, tracker, text).await.map_err(anyhow::Error::msg)?;
        }
        SetCommand::Edit { member, tracker, index, text, date } => {
            commands::update_entry(state, member, date, tracker, index, text)
                .await
                .map_err(anyhow::Error::msg)?;
        }
        SetCommand::Remove { member, tracker, index, date } => {
            commands::delete_entry(state, member, date, tracker, index)
                .await
                .map_err(anyhow::Error::msg)?;
        }
        SetCommand::Check { member, tracker, index, date } => {
            let checked = commands::toggle_check(state, member, date, tracker, index)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("{}", if checked { "checked" } else { "unchecked" });
        }
        SetCommand::Rep { member, tracker, group, rep, actual, date } => {
            commands::set_rep(state, member, date, tracker, group, rep, actual)
                .await
                .map_err(anyhow::Error::msg)?;
        }
    }
    Ok(())
}
