//! Monthly wins goal projection.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use thiserror::Error;

use super::round_to;
use crate::models::GoalPace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaceError {
    #[error("No days left in the month of {0}")]
    MonthElapsed(NaiveDate),

    #[error("Reference instant out of range")]
    OutOfRange,
}

/// Last calendar day of `date`'s month.
pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

/// Days left in the month of `date`, `date` itself included.
pub fn days_remaining_inclusive(date: NaiveDate) -> Option<i64> {
    last_day_of_month(date).map(|last| (last - date).num_days() + 1)
}

/// Project the daily win pace needed to reach `goal` by month end.
///
/// `now` is shifted forward by `hour_offset` hours before the calendar day is
/// taken, so late-evening requests already count from the next day.
pub fn project_goal_pace(
    wins: u32,
    goal: u32,
    now: DateTime<Utc>,
    hour_offset: i64,
) -> Result<GoalPace, PaceError> {
    let shift = Duration::try_hours(hour_offset).ok_or(PaceError::OutOfRange)?;
    let reference = now
        .checked_add_signed(shift)
        .ok_or(PaceError::OutOfRange)?;
    let today = reference.date_naive();
    let days = days_remaining_inclusive(today).ok_or(PaceError::OutOfRange)?;
    if days <= 0 {
        return Err(PaceError::MonthElapsed(today));
    }

    let wins_remaining = i64::from(goal) - i64::from(wins);
    let daily_pace_required = round_to(wins_remaining as f64 / days as f64, 2);

    Ok(GoalPace {
        goal,
        wins,
        wins_remaining,
        days_remaining: days as u32,
        daily_pace_required,
    })
}

/// Plain-text summary of a pace projection.
pub fn pace_message(name: &str, pace: &GoalPace) -> String {
    if pace.goal_reached() {
        return format!(
            "{} already has {} wins and has hit the goal of {}.",
            name, pace.wins, pace.goal
        );
    }
    let day_word = if pace.days_remaining == 1 { "day" } else { "days" };
    format!(
        "{} has {} of {} wins. {} to go in {} {}: {:.2} wins per day.",
        name,
        pace.wins,
        pace.goal,
        pace.wins_remaining,
        pace.days_remaining,
        day_word,
        pace.daily_pace_required
    )
}
