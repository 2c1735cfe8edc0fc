//! The recurrence rule: how a chore repeats.
//!
//! A rule is a plain value embedded in a [`Task`](crate::task::Task). It is
//! replaced wholesale on edit; nothing in the engine mutates one in place.
//! Only the fields belonging to the rule's [`RecurrenceKind`] are populated.
//! The resolver treats a missing kind-specific field as a malformed rule and
//! yields no due date.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::parse_date;
use crate::error::ChoreError;

/// Which calendar pattern a rule follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    /// Same day number every N months.
    #[serde(alias = "monthly-date")]
    MonthlyByDate,
    /// Same weekday position (e.g. "last Friday") every N months.
    #[serde(alias = "monthly-day")]
    MonthlyByWeekday,
    Yearly,
    /// Any type tag this version does not understand. Kept so stored data
    /// with an unexpected tag still loads; it never resolves to a date.
    #[serde(other)]
    Unknown,
}

impl RecurrenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::MonthlyByDate => "monthly-by-date",
            Self::MonthlyByWeekday => "monthly-by-weekday",
            Self::Yearly => "yearly",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceKind {
    type Err = ChoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly-by-date" | "monthly-date" => Ok(Self::MonthlyByDate),
            "monthly-by-weekday" | "monthly-day" => Ok(Self::MonthlyByWeekday),
            "yearly" | "year" => Ok(Self::Yearly),
            other => Err(ChoreError::InvalidRule(format!(
                "unknown recurrence type '{other}'"
            ))),
        }
    }
}

/// Position of a weekday within its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekOrdinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOrdinal {
    /// 1..=4 counted from the start of the month, `None` for [`WeekOrdinal::Last`].
    pub fn nth(self) -> Option<u32> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for WeekOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekOrdinal {
    type Err = ChoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1st" | "1" => Ok(Self::First),
            "second" | "2nd" | "2" => Ok(Self::Second),
            "third" | "3rd" | "3" => Ok(Self::Third),
            "fourth" | "4th" | "4" => Ok(Self::Fourth),
            "last" => Ok(Self::Last),
            other => Err(ChoreError::InvalidRule(format!(
                "unknown week ordinal '{other}'"
            ))),
        }
    }
}

/// A declarative schedule: kind, interval, optional anchor date, and the
/// kind-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,

    /// Repeat multiplier. Always read through [`RecurrenceRule::interval`],
    /// which applies the floor of 1.
    #[serde(
        default = "default_interval",
        deserialize_with = "deserialize_interval"
    )]
    pub interval: u32,

    /// Anchor for the schedule. `None` anchors to the reference date.
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,

    /// 1..31, for monthly-by-date and yearly.
    #[serde(
        default,
        alias = "monthDay",
        alias = "monthDayYearly",
        skip_serializing_if = "Option::is_none"
    )]
    pub day_of_month: Option<u32>,

    /// For monthly-by-weekday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_ordinal: Option<WeekOrdinal>,

    /// 0 = Sunday .. 6 = Saturday, for monthly-by-weekday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,

    /// 1..12, for yearly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl RecurrenceRule {
    fn bare(kind: RecurrenceKind, interval: u32) -> Self {
        Self {
            kind,
            interval: interval.max(1),
            start_date: None,
            day_of_month: None,
            week_ordinal: None,
            weekday: None,
            month: None,
        }
    }

    pub fn daily(interval: u32) -> Self {
        Self::bare(RecurrenceKind::Daily, interval)
    }

    pub fn weekly(interval: u32) -> Self {
        Self::bare(RecurrenceKind::Weekly, interval)
    }

    pub fn monthly_by_date(interval: u32, day_of_month: u32) -> Self {
        Self {
            day_of_month: Some(day_of_month),
            ..Self::bare(RecurrenceKind::MonthlyByDate, interval)
        }
    }

    /// `weekday` is 0 = Sunday .. 6 = Saturday.
    pub fn monthly_by_weekday(interval: u32, ordinal: WeekOrdinal, weekday: u8) -> Self {
        Self {
            week_ordinal: Some(ordinal),
            weekday: Some(weekday),
            ..Self::bare(RecurrenceKind::MonthlyByWeekday, interval)
        }
    }

    pub fn yearly(interval: u32, month: u32, day_of_month: u32) -> Self {
        Self {
            month: Some(month),
            day_of_month: Some(day_of_month),
            ..Self::bare(RecurrenceKind::Yearly, interval)
        }
    }

    /// The repeat multiplier, never below 1.
    pub fn interval(&self) -> u32 {
        self.interval.max(1)
    }

    pub fn with_interval(self, interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ..self
        }
    }

    pub fn with_start_date(self, start_date: Option<NaiveDate>) -> Self {
        Self { start_date, ..self }
    }

    /// Switch to another kind.
    ///
    /// The interval resets to 1 and the start date is kept. Fields that
    /// belong to the old kind are cleared; the new kind's fields get
    /// defaults (the 1st of the month, the first Sunday, January 1st).
    pub fn with_kind(self, kind: RecurrenceKind) -> Self {
        let fresh = match kind {
            RecurrenceKind::MonthlyByDate => Self::monthly_by_date(1, 1),
            RecurrenceKind::MonthlyByWeekday => {
                Self::monthly_by_weekday(1, WeekOrdinal::First, 0)
            }
            RecurrenceKind::Yearly => Self::yearly(1, 1, 1),
            other => Self::bare(other, 1),
        };
        fresh.with_start_date(self.start_date)
    }
}

fn default_interval() -> u32 {
    1
}

fn deserialize_interval<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(1, i64::from(u32::MAX)) as u32)
}

/// Accepts `null`, `"YYYY-MM-DD"`, or an RFC 3339 timestamp (older stores
/// wrote full ISO timestamps). An empty string reads as no start date.
pub(crate) fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some).map_err(serde::de::Error::custom),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
