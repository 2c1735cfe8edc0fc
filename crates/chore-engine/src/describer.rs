//! Human-readable recurrence descriptions ("Every 2 weeks", "Every month on
//! the first Monday").
//!
//! [`describe_recurrence`] is total. A malformed rule yields one of the fixed
//! sentinel strings below; it never panics and never depends on the
//! resolver or the clock.

use std::fmt;

use crate::calendar::{month_name, weekday_name, with_ordinal_suffix};
use crate::rule::{RecurrenceKind, RecurrenceRule};

pub const NO_RECURRENCE: &str = "No recurrence set";
pub const INVALID_MONTHLY: &str = "Invalid monthly recurrence";
pub const INVALID_YEARLY: &str = "Invalid yearly recurrence";
pub const INVALID_TYPE: &str = "Invalid recurrence type";

/// Describe a recurrence rule in English.
///
/// ```
/// use chore_engine::{describe_recurrence, RecurrenceRule};
///
/// let rule = RecurrenceRule::monthly_by_date(1, 3);
/// assert_eq!(describe_recurrence(Some(&rule)), "Every month on the 3rd");
/// assert_eq!(describe_recurrence(None), "No recurrence set");
/// ```
pub fn describe_recurrence(rule: Option<&RecurrenceRule>) -> String {
    let Some(rule) = rule else {
        return NO_RECURRENCE.to_string();
    };

    match rule.kind {
        RecurrenceKind::Daily => every(rule, "day"),
        RecurrenceKind::Weekly => every(rule, "week"),
        RecurrenceKind::MonthlyByDate => match rule.day_of_month.filter(|&d| d > 0) {
            Some(day) => format!("{} on the {}", every(rule, "month"), with_ordinal_suffix(day)),
            None => INVALID_MONTHLY.to_string(),
        },
        RecurrenceKind::MonthlyByWeekday => {
            match (rule.week_ordinal, rule.weekday.and_then(weekday_name)) {
                (Some(ordinal), Some(weekday)) => {
                    format!("{} on the {ordinal} {weekday}", every(rule, "month"))
                }
                _ => INVALID_MONTHLY.to_string(),
            }
        }
        RecurrenceKind::Yearly => {
            let month = rule.month.and_then(month_name);
            match (month, rule.day_of_month.filter(|&d| d > 0)) {
                (Some(month), Some(day)) => format!(
                    "{} on {month} {}",
                    every(rule, "year"),
                    with_ordinal_suffix(day)
                ),
                _ => INVALID_YEARLY.to_string(),
            }
        }
        RecurrenceKind::Unknown => INVALID_TYPE.to_string(),
    }
}

/// "Every day" / "Every 3 days".
fn every(rule: &RecurrenceRule, unit: &str) -> String {
    match rule.interval() {
        1 => format!("Every {unit}"),
        n => format!("Every {n} {unit}s"),
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe_recurrence(Some(self)))
    }
}
