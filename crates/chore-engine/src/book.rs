//! The task book: every chore and category, plus the views built on them
//! (due today, upcoming, search).
//!
//! Views take "today" as an argument and never read the clock.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ChoreError, Result};
use crate::resolver::{advance_from, needs_refresh, next_due_date_from};
use crate::task::{Category, NewTask, Task};

/// Title of the search group holding chores without a known category.
pub const OTHER_TASKS: &str = "Other Tasks";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBook {
    tasks: Vec<Task>,
    categories: Vec<Category>,
}

/// Search hits for one category, or for uncategorised chores when
/// `category` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchGroup<'a> {
    pub category: Option<&'a Category>,
    pub tasks: Vec<&'a Task>,
}

impl SearchGroup<'_> {
    pub fn title(&self) -> &str {
        self.category.map_or(OTHER_TASKS, |c| c.name.as_str())
    }
}

impl TaskBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(tasks: Vec<Task>, categories: Vec<Category>) -> Self {
        Self { tasks, categories }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Add a chore, computing its first due date as of `today`.
    ///
    /// # Errors
    ///
    /// [`ChoreError::CategoryNotFound`] if the chore names a category the
    /// book does not know.
    pub fn add_task(&mut self, data: NewTask, today: NaiveDate) -> Result<&Task> {
        if let Some(id) = data.category.as_deref() {
            if self.category(id).is_none() {
                return Err(ChoreError::CategoryNotFound { id: id.to_string() });
            }
        }
        let task = Task::new(data, today);
        debug!(id = %task.id, name = %task.name, due = ?task.next_due_date, "added task");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Insert a category, replacing any existing one with the same id.
    pub fn add_category(&mut self, category: Category) -> &Category {
        let index = match self.categories.iter().position(|c| c.id == category.id) {
            Some(index) => {
                self.categories[index] = category;
                index
            }
            None => {
                self.categories.push(category);
                self.categories.len() - 1
            }
        };
        &self.categories[index]
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task> {
        let index = self.position(id)?;
        Ok(self.tasks.remove(index))
    }

    /// Flip a chore's completion flag.
    pub fn toggle_completion(&mut self, id: &str) -> Result<&Task> {
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        task.is_completed = !task.is_completed;
        Ok(task)
    }

    /// Recompute due dates that have fallen into the past (or were never
    /// set). Returns how many chores changed.
    ///
    /// A stale date is rolled forward from itself so the schedule keeps its
    /// phase. The chores' rules are left untouched.
    pub fn refresh_due_dates(&mut self, today: NaiveDate) -> usize {
        let mut changed = 0;
        for task in &mut self.tasks {
            let next = match task.next_due_date {
                Some(due) if needs_refresh(due, today) => {
                    advance_from(&task.recurrence, due, today)
                }
                Some(_) => continue,
                None => next_due_date_from(&task.recurrence, today),
            };
            if next != task.next_due_date {
                debug!(id = %task.id, from = ?task.next_due_date, to = ?next, "rescheduled task");
                task.next_due_date = next;
                changed += 1;
            }
        }
        if changed > 0 {
            info!(changed, %today, "refreshed past due dates");
        }
        changed
    }

    // ── Views ───────────────────────────────────────────────────────────

    /// Chores due exactly on `today`, in insertion order.
    pub fn today_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_due_on(today)).collect()
    }

    /// Chores due after `today`, earliest first. Ties keep insertion order.
    pub fn upcoming_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        let mut upcoming: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.next_due_date.is_some_and(|due| due > today))
            .collect();
        upcoming.sort_by_key(|t| t.next_due_date);
        upcoming
    }

    /// [`TaskBook::upcoming_tasks`] grouped by due date.
    pub fn upcoming_by_date(&self, today: NaiveDate) -> BTreeMap<NaiveDate, Vec<&Task>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
        for task in self.upcoming_tasks(today) {
            if let Some(due) = task.next_due_date {
                grouped.entry(due).or_default().push(task);
            }
        }
        grouped
    }

    pub fn tasks_in_category(&self, category_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.category.as_deref() == Some(category_id))
            .collect()
    }

    /// Case-insensitive substring search on chore names.
    ///
    /// Hits are grouped by category in the book's category order, empty
    /// groups dropped, followed by one group for chores with no category or
    /// an unknown one. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchGroup<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let hits: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect();

        let mut groups: Vec<SearchGroup<'_>> = self
            .categories
            .iter()
            .map(|category| SearchGroup {
                category: Some(category),
                tasks: hits
                    .iter()
                    .copied()
                    .filter(|t| t.category.as_deref() == Some(category.id.as_str()))
                    .collect(),
            })
            .filter(|group| !group.tasks.is_empty())
            .collect();

        let other: Vec<&Task> = hits
            .iter()
            .copied()
            .filter(|t| t.category.as_deref().and_then(|id| self.category(id)).is_none())
            .collect();
        if !other.is_empty() {
            groups.push(SearchGroup {
                category: None,
                tasks: other,
            });
        }
        groups
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ChoreError::TaskNotFound { id: id.to_string() })
    }
}
