use std::path::PathBuf;

use chore_engine::calendar::{parse_date, parse_weekday};
use chore_engine::{RecurrenceKind, RecurrenceRule, WeekOrdinal};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Track recurring household chores.
#[derive(Debug, Parser)]
#[command(name = "chores", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store file (overrides `store_path` from config).
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Treat this date as today (YYYY-MM-DD).
    #[arg(long, global = true, value_name = "DATE", value_parser = parse_date_arg)]
    pub today: Option<NaiveDate>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Book(BookCommand),
    /// Print the description of a rule.
    Describe {
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Print the next due date of a rule.
    Next {
        #[command(flatten)]
        rule: RuleArgs,
        /// Reference date (defaults to today).
        #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
        on: Option<NaiveDate>,
    },
}

/// Commands that read or change the chore store.
#[derive(Debug, Subcommand)]
pub enum BookCommand {
    /// Add a recurring chore.
    Add {
        /// Chore name.
        name: String,
        /// Category id.
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Chores due today.
    Today,
    /// Chores due after today, grouped by date.
    Upcoming,
    /// Find chores by name.
    Search {
        query: String,
    },
    /// Toggle a chore's completion flag.
    Done {
        id: String,
    },
    /// Delete a chore.
    Remove {
        id: String,
    },
    /// Roll past due dates forward.
    Refresh,
    /// Manage categories.
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommands {
    /// Add or rename a category.
    Add {
        id: String,
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// List categories with their chore counts.
    List,
}

/// Flags describing a recurrence rule.
#[derive(Debug, Clone, Args)]
pub struct RuleArgs {
    /// daily, weekly, monthly-by-date, monthly-by-weekday, or yearly.
    #[arg(long = "every", value_name = "TYPE", value_parser = parse_kind_arg)]
    pub kind: RecurrenceKind,

    /// Repeat every N units (minimum 1).
    #[arg(long, default_value_t = 1)]
    pub interval: u32,

    /// Anchor date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Day of the month (monthly-by-date, yearly).
    #[arg(long)]
    pub day: Option<u32>,

    /// first, second, third, fourth, or last (monthly-by-weekday).
    #[arg(long, value_parser = parse_ordinal_arg)]
    pub ordinal: Option<WeekOrdinal>,

    /// Weekday name or 0-6 with 0 = Sunday (monthly-by-weekday).
    #[arg(long, value_parser = parse_weekday_arg)]
    pub weekday: Option<u8>,

    /// Month number 1-12 (yearly).
    #[arg(long)]
    pub month: Option<u32>,
}

impl RuleArgs {
    /// Build the rule, keeping only the fields that belong to its kind.
    /// Missing fields stay missing, so the rule may be malformed.
    pub fn to_rule(&self) -> RecurrenceRule {
        let base = RecurrenceRule::daily(self.interval)
            .with_kind(self.kind)
            .with_interval(self.interval)
            .with_start_date(self.start);
        match self.kind {
            RecurrenceKind::MonthlyByDate => RecurrenceRule {
                day_of_month: self.day,
                ..base
            },
            RecurrenceKind::MonthlyByWeekday => RecurrenceRule {
                week_ordinal: self.ordinal,
                weekday: self.weekday,
                ..base
            },
            RecurrenceKind::Yearly => RecurrenceRule {
                month: self.month,
                day_of_month: self.day,
                ..base
            },
            _ => base,
        }
    }

    /// Flags the kind requires but were not given.
    pub fn missing_flags(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self.kind {
            RecurrenceKind::MonthlyByDate => {
                if self.day.is_none() {
                    missing.push("--day");
                }
            }
            RecurrenceKind::MonthlyByWeekday => {
                if self.ordinal.is_none() {
                    missing.push("--ordinal");
                }
                if self.weekday.is_none() {
                    missing.push("--weekday");
                }
            }
            RecurrenceKind::Yearly => {
                if self.month.is_none() {
                    missing.push("--month");
                }
                if self.day.is_none() {
                    missing.push("--day");
                }
            }
            _ => {}
        }
        missing
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn parse_kind_arg(s: &str) -> Result<RecurrenceKind, String> {
    s.parse().map_err(|e: chore_engine::ChoreError| e.to_string())
}

fn parse_ordinal_arg(s: &str) -> Result<WeekOrdinal, String> {
    s.parse().map_err(|e: chore_engine::ChoreError| e.to_string())
}

fn parse_weekday_arg(s: &str) -> Result<u8, String> {
    parse_weekday(s).ok_or_else(|| format!("unknown weekday '{s}'"))
}
