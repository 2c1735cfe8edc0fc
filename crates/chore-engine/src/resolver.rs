//! Next-due-date resolution for recurrence rules.
//!
//! All functions are pure and date-only. The one exception is
//! [`next_due_date`], which reads the local calendar date when the caller
//! does not supply a reference date. Use [`next_due_date_from`] to pass
//! "today" in explicitly, which keeps tests and replays deterministic.
//!
//! # Algorithm
//!
//! 1. Pick the working anchor: the rule's start date, or the reference date
//!    when the rule has none.
//! 2. Step the anchor forward once by the rule's interval (days, weeks,
//!    months, or years) and land on the rule's calendar position.
//! 3. If the candidate is far behind the reference date, jump ahead by
//!    whole periods in one step.
//! 4. While the candidate is still before the reference date, step again
//!    from the candidate.
//!
//! The rule itself is never modified; only the local working anchor moves.
//! Step 4 is bounded by [`MAX_CORRECTION_STEPS`] and stops early if a step
//! fails to move the candidate forward.
//!
//! # Day overflow
//!
//! Every step is plain calendar arithmetic through [`date_from_parts`],
//! which rolls out-of-range days into the next month instead of clamping.
//! A month step first moves the anchor itself, keeping its day, and only
//! then applies the rule's position:
//!
//! - monthly on the 3rd from January 31 moves to "February 31", which is
//!   March 2, and lands on March 3;
//! - the first Monday from January 31 is searched in March for the same
//!   reason;
//! - monthly on the 31st from May 15 moves to June 15 and lands on
//!   "June 31", which is July 1;
//! - yearly on February 29 lands on March 1 in common years.
//!
//! A yearly step moves the anchor by whole years, then sets the month
//! (keeping the anchor's day, which may roll over), then sets the day.

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, warn};

use crate::calendar::{
    add_days, add_months, add_years, date_from_parts, last_weekday_of_month, months_between,
    nth_weekday_of_month, weekday_from_index,
};
use crate::rule::{RecurrenceKind, RecurrenceRule};

/// Upper bound on past-date correction steps for one resolution.
///
/// Every kind jumps close to the reference date before stepping, so valid
/// rules take a handful of steps. The cap guards against steps that stall.
pub const MAX_CORRECTION_STEPS: u32 = 10_000;

/// Compute the next due date of `rule` on or after `reference`.
///
/// `reference` defaults to today's local date. Returns `None` only when the
/// rule is missing the fields its kind requires.
///
/// ```
/// use chrono::NaiveDate;
/// use chore_engine::{next_due_date, RecurrenceRule};
///
/// let rule = RecurrenceRule::weekly(2).with_start_date(NaiveDate::from_ymd_opt(2024, 1, 1));
/// let due = next_due_date(&rule, NaiveDate::from_ymd_opt(2024, 1, 10));
/// assert_eq!(due, NaiveDate::from_ymd_opt(2024, 1, 15));
/// ```
pub fn next_due_date(rule: &RecurrenceRule, reference: Option<NaiveDate>) -> Option<NaiveDate> {
    let reference = reference.unwrap_or_else(|| Local::now().date_naive());
    next_due_date_from(rule, reference)
}

/// Compute the next due date of `rule` on or after `reference`, treating
/// `reference` as "today".
///
/// A daily rule without a start date is due on the reference date itself,
/// so a chore added today shows up today rather than tomorrow.
pub fn next_due_date_from(rule: &RecurrenceRule, reference: NaiveDate) -> Option<NaiveDate> {
    match rule.start_date {
        None if rule.kind == RecurrenceKind::Daily => Some(reference),
        start => advance_from(rule, start.unwrap_or(reference), reference),
    }
}

/// Step `rule` forward from `anchor` until the result is on or after
/// `reference`.
///
/// The first occurrence considered is always strictly after `anchor`. This
/// is how a stale due date is rolled forward while keeping the schedule's
/// phase (a Monday chore stays on Mondays).
pub fn advance_from(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    let mut candidate = step(rule, anchor)?;

    if candidate < reference {
        candidate = fast_forward(rule, candidate, reference)?;
    }

    let mut steps = 0u32;
    while candidate < reference {
        if steps == MAX_CORRECTION_STEPS {
            warn!(
                kind = %rule.kind,
                %candidate,
                %reference,
                "past-date correction hit its step limit; returning best effort"
            );
            break;
        }
        match step(rule, candidate) {
            Some(next) if next > candidate => candidate = next,
            _ => {
                warn!(
                    kind = %rule.kind,
                    %candidate,
                    "recurrence step did not advance; stopping correction"
                );
                break;
            }
        }
        steps += 1;
    }

    if steps > 0 {
        debug!(kind = %rule.kind, steps, %candidate, "corrected past due date");
    }
    Some(candidate)
}

/// Whether a stored due date has fallen behind `today` and must be
/// recomputed.
pub fn needs_refresh(due: NaiveDate, today: NaiveDate) -> bool {
    due < today
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// One application of the rule from `anchor`. `None` for malformed rules.
fn step(rule: &RecurrenceRule, anchor: NaiveDate) -> Option<NaiveDate> {
    step_periods(rule, anchor, 1)
}

/// `periods` applications of the rule from `anchor` taken as a single move.
fn step_periods(rule: &RecurrenceRule, anchor: NaiveDate, periods: i64) -> Option<NaiveDate> {
    let span = i64::from(rule.interval()).checked_mul(periods)?;

    match rule.kind {
        RecurrenceKind::Daily => add_days(anchor, span),
        RecurrenceKind::Weekly => add_days(anchor, span.checked_mul(7)?),
        RecurrenceKind::MonthlyByDate => {
            let day = rule.day_of_month.filter(|&d| d > 0)?;
            let moved = add_months(anchor, span)?;
            date_from_parts(
                i64::from(moved.year()),
                i64::from(moved.month()),
                i64::from(day),
            )
        }
        RecurrenceKind::MonthlyByWeekday => {
            let ordinal = rule.week_ordinal?;
            let weekday = weekday_from_index(rule.weekday?)?;
            let moved = add_months(anchor, span)?;
            match ordinal.nth() {
                Some(n) => nth_weekday_of_month(moved.year(), moved.month(), weekday, n),
                None => last_weekday_of_month(moved.year(), moved.month(), weekday),
            }
        }
        RecurrenceKind::Yearly => {
            let month = rule.month.filter(|&m| m > 0)?;
            let day = rule.day_of_month.filter(|&d| d > 0)?;
            let moved = add_years(anchor, span)?;
            let in_month = date_from_parts(
                i64::from(moved.year()),
                i64::from(month),
                i64::from(moved.day()),
            )?;
            date_from_parts(
                i64::from(in_month.year()),
                i64::from(in_month.month()),
                i64::from(day),
            )
        }
        RecurrenceKind::Unknown => None,
    }
}

/// Whole periods kept between a calendar jump and the reference date.
/// Day rollover can push a step up to two months (or one year) past its
/// target, so the jump stops short and the loop finishes the approach.
const CALENDAR_JUMP_MARGIN: i64 = 3;

/// Jump `candidate` towards `reference` by whole periods.
///
/// Daily and weekly rules land exactly on the first occurrence on or after
/// `reference`. Month and year rules stop a few periods short and stay
/// before `reference`.
fn fast_forward(
    rule: &RecurrenceRule,
    candidate: NaiveDate,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    let interval = i64::from(rule.interval());
    let whole = match rule.kind {
        RecurrenceKind::Daily => return skip_whole_periods(candidate, reference, interval),
        RecurrenceKind::Weekly => return skip_whole_periods(candidate, reference, interval * 7),
        RecurrenceKind::MonthlyByDate | RecurrenceKind::MonthlyByWeekday => {
            months_between(candidate, reference) / interval
        }
        RecurrenceKind::Yearly => {
            i64::from(reference.year() - candidate.year()) / interval
        }
        RecurrenceKind::Unknown => return Some(candidate),
    };
    let periods = whole - CALENDAR_JUMP_MARGIN;

    if periods <= 0 {
        return Some(candidate);
    }
    debug!(kind = %rule.kind, periods, %candidate, "jumping ahead by whole periods");
    step_periods(rule, candidate, periods)
}

/// Smallest `candidate + k * period` (k ≥ 0) that is on or after `reference`.
fn skip_whole_periods(candidate: NaiveDate, reference: NaiveDate, period: i64) -> Option<NaiveDate> {
    let gap = (reference - candidate).num_days();
    let periods = (gap + period - 1) / period;
    add_days(candidate, periods.checked_mul(period)?)
}

// ── Tests ───────────────────────────────────────────────────────────────────
