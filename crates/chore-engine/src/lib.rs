//! # chore-engine
//!
//! Recurring household chores.
//!
//! The core is a pair of pure functions over a [`RecurrenceRule`]: one
//! resolves the next due date on or after a reference date, the other
//! renders the rule as an English phrase. Around them sit the task book
//! (today/upcoming views, search, due-date refresh) and a JSON file store.
//!
//! ## Modules
//!
//! - [`rule`]: Recurrence rule model (daily, weekly, monthly by date, monthly by weekday, yearly)
//! - [`calendar`]: Date-only arithmetic with calendar rollover, weekday/month naming, ordinal suffixes
//! - [`resolver`]: Rule + reference date → next due date
//! - [`describer`]: Rule → human-readable description
//! - [`task`]: Chores and categories
//! - [`book`]: The task book and its views
//! - [`store`]: JSON file persistence
//! - [`error`]: Error types

pub mod book;
pub mod calendar;
pub mod describer;
pub mod error;
pub mod resolver;
pub mod rule;
pub mod store;
pub mod task;

pub use book::{SearchGroup, TaskBook, OTHER_TASKS};
pub use describer::describe_recurrence;
pub use error::{ChoreError, Result};
pub use resolver::{
    advance_from, needs_refresh, next_due_date, next_due_date_from, MAX_CORRECTION_STEPS,
};
pub use rule::{RecurrenceKind, RecurrenceRule, WeekOrdinal};
pub use store::JsonStore;
pub use task::{Category, NewTask, Task};
