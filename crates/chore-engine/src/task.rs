//! Chores and the categories they are filed under.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resolver::next_due_date_from;
use crate::rule::{deserialize_lenient_date, RecurrenceRule};

/// A recurring chore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Category id, `None` for uncategorised chores.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
    pub recurrence: RecurrenceRule,
    pub created_at: DateTime<Utc>,
    /// Produced by the resolver; `None` when the rule is malformed.
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

/// The user-supplied part of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub category: Option<String>,
    pub recurrence: RecurrenceRule,
}

impl Task {
    /// Create a task, stamping its first due date as of `today`.
    pub fn new(data: NewTask, today: NaiveDate) -> Self {
        let next_due_date = next_due_date_from(&data.recurrence, today);
        Self {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            category: data.category,
            recurrence: data.recurrence,
            created_at: Utc::now(),
            next_due_date,
            is_completed: false,
        }
    }

    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.next_due_date == Some(day)
    }
}

/// A named group of chores ("Kitchen", "Garden").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Display colour as a CSS hex string.
    #[serde(default = "default_color")]
    pub color: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: default_color(),
        }
    }

    pub fn with_color(self, color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..self
        }
    }
}

fn default_color() -> String {
    "#7ED321".to_string()
}

/// Older stores wrote `""` for "no category".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}
