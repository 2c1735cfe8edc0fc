use anyhow::{bail, Context};
use chore_engine::{
    describe_recurrence, next_due_date, Category, JsonStore, NewTask, Task, TaskBook,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::cli::{BookCommand, CategoryCommands, Cli, Commands, RuleArgs};
use crate::config::ChoresConfig;

pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        store,
        json,
        today,
        ..
    } = cli;

    match command {
        Commands::Describe { rule } => describe(&rule, json),
        Commands::Next { rule, on } => {
            let on = match on.or(today) {
                Some(date) => date,
                None => ChoresConfig::load()?.today()?,
            };
            next(&rule, on, json)
        }
        Commands::Book(command) => {
            let config = ChoresConfig::load()?;
            let today = match today {
                Some(date) => date,
                None => config.today()?,
            };
            let store = JsonStore::open(store.unwrap_or(config.store_path));
            debug!(path = %store.path().display(), %today, "opening store");

            let mut book = store.load().context("failed to load chores")?;
            let refreshed = book.refresh_due_dates(today);
            let mutated = run_book_command(command, &mut book, today, refreshed, json)?;
            if mutated || refreshed > 0 {
                store.save(&book).context("failed to save chores")?;
            }
            Ok(())
        }
    }
}

/// Run a command against the loaded book. Returns whether the book changed.
fn run_book_command(
    command: BookCommand,
    book: &mut TaskBook,
    today: NaiveDate,
    refreshed: usize,
    json: bool,
) -> anyhow::Result<bool> {
    match command {
        BookCommand::Add {
            name,
            category,
            rule,
        } => {
            let missing = rule.missing_flags();
            if !missing.is_empty() {
                bail!(
                    "'--every {}' also needs {}",
                    rule.kind,
                    missing.join(", ")
                );
            }
            let task = book.add_task(
                NewTask {
                    name,
                    category,
                    recurrence: rule.to_rule(),
                },
                today,
            )?;
            if json {
                print_json(task)?;
            } else {
                println!("Added {}", task_line(task));
            }
            Ok(true)
        }
        BookCommand::Today => {
            let tasks = book.today_tasks(today);
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("Nothing due today.");
            } else {
                println!("Today's Tasks");
                for task in tasks {
                    println!("  {}", task_line(task));
                }
            }
            Ok(false)
        }
        BookCommand::Upcoming => {
            let grouped = book.upcoming_by_date(today);
            if json {
                print_json(&grouped)?;
            } else if grouped.is_empty() {
                println!("No upcoming tasks.");
            } else {
                for (date, tasks) in grouped {
                    println!("{}", date.format("%A, %B %-d"));
                    for task in tasks {
                        println!("  {}", task_line(task));
                    }
                }
            }
            Ok(false)
        }
        BookCommand::Search { query } => {
            let groups = book.search(&query);
            if json {
                let value: Vec<_> = groups
                    .iter()
                    .map(|g| json!({ "title": g.title(), "tasks": g.tasks }))
                    .collect();
                print_json(&value)?;
            } else if groups.is_empty() {
                println!("Nothing found. Try another word?");
            } else {
                let total: usize = groups.iter().map(|g| g.tasks.len()).sum();
                println!("Found {total} {}", if total == 1 { "task" } else { "tasks" });
                for group in &groups {
                    println!("{}", group.title());
                    for task in &group.tasks {
                        println!("  {}", task_line(task));
                    }
                }
            }
            Ok(false)
        }
        BookCommand::Done { id } => {
            let task = book.toggle_completion(&id)?;
            if json {
                print_json(task)?;
            } else if task.is_completed {
                println!("Completed {}", task.name);
            } else {
                println!("Reopened {}", task.name);
            }
            Ok(true)
        }
        BookCommand::Remove { id } => {
            let task = book.remove_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Removed {}", task.name);
            }
            Ok(true)
        }
        BookCommand::Refresh => {
            if json {
                print_json(&json!({ "rescheduled": refreshed }))?;
            } else {
                println!(
                    "Rescheduled {refreshed} {}",
                    if refreshed == 1 { "task" } else { "tasks" }
                );
            }
            Ok(false)
        }
        BookCommand::Category { action } => match action {
            CategoryCommands::Add { id, name, color } => {
                let category = match color {
                    Some(color) => Category::new(id, name).with_color(color),
                    None => Category::new(id, name),
                };
                let category = book.add_category(category);
                if json {
                    print_json(category)?;
                } else {
                    println!("Saved category {} ({})", category.name, category.id);
                }
                Ok(true)
            }
            CategoryCommands::List => {
                if json {
                    print_json(&book.categories())?;
                } else if book.categories().is_empty() {
                    println!("No categories.");
                } else {
                    for category in book.categories() {
                        let count = book.tasks_in_category(&category.id).len();
                        println!("{}  {}  ({count})", category.id, category.name);
                    }
                }
                Ok(false)
            }
        },
    }
}

fn describe(rule: &RuleArgs, json: bool) -> anyhow::Result<()> {
    let rule = rule.to_rule();
    let description = describe_recurrence(Some(&rule));
    if json {
        print_json(&json!({ "rule": rule, "description": description }))
    } else {
        println!("{description}");
        Ok(())
    }
}

/// Malformed rules print `none` rather than failing.
fn next(rule: &RuleArgs, on: NaiveDate, json: bool) -> anyhow::Result<()> {
    let rule = rule.to_rule();
    let due = next_due_date(&rule, Some(on));
    if json {
        print_json(&json!({
            "rule": rule,
            "reference": on,
            "nextDueDate": due,
            "description": describe_recurrence(Some(&rule)),
        }))
    } else {
        match due {
            Some(date) => println!("{date}"),
            None => println!("none"),
        }
        Ok(())
    }
}

fn task_line(task: &Task) -> String {
    let mark = if task.is_completed { "x" } else { " " };
    let due = task
        .next_due_date
        .map_or_else(|| "unscheduled".to_string(), |d| d.to_string());
    format!(
        "[{mark}] {due}  {}  ({})  {}",
        task.name, task.recurrence, task.id
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}
