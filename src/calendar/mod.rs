//! Monthly event calendar grid.
//!
//! Builds the fixed 6x7 Monday-first grid the dashboard renders for a
//! reference month, and the derived upcoming-events list.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Event, EventStatus};

/// Cells in the month grid (6 weeks of 7 days).
pub const GRID_CELLS: usize = 42;

/// Events shown inline per day cell; the rest is an overflow counter.
pub const MAX_INLINE_EVENTS: usize = 2;

/// Default cap of the upcoming-events list.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// One day cell of the grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    /// At most [`MAX_INLINE_EVENTS`] events starting on this day.
    pub events: Vec<Event>,
    /// How many further events start on this day.
    pub overflow: usize,
}

/// A fully built month view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// Build the 42-cell grid for a month.
///
/// The grid starts on the Monday of the week containing the 1st, so it
/// spans trailing days of the previous month and leading days of the next
/// month. An event lands on a cell when its start date falls on that
/// calendar day; range overlap is not considered.
pub fn month_grid(
    year: i32,
    month: u32,
    today: NaiveDate,
    events: &[Event],
) -> Result<CalendarMonth, AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))?;

    let offset = u64::from(first.weekday().num_days_from_monday());
    let grid_start = first
        .checked_sub_days(Days::new(offset))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))?;

    let mut days = Vec::with_capacity(GRID_CELLS);
    for i in 0..GRID_CELLS {
        let date = grid_start
            .checked_add_days(Days::new(i as u64))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))?;

        let day_events: Vec<&Event> = events
            .iter()
            .filter(|e| e.start_date.date_naive() == date)
            .collect();

        let overflow = day_events.len().saturating_sub(MAX_INLINE_EVENTS);
        let events = day_events
            .into_iter()
            .take(MAX_INLINE_EVENTS)
            .cloned()
            .collect();

        days.push(CalendarDay {
            date,
            is_current_month: date.year() == year && date.month() == month,
            is_today: date == today,
            events,
            overflow,
        });
    }

    Ok(CalendarMonth { year, month, days })
}

/// Scheduled events starting strictly after `now`, ascending by start
/// time, capped to `limit`.
pub fn upcoming(events: &[Event], now: DateTime<Utc>, limit: usize) -> Vec<Event> {
    let mut upcoming: Vec<Event> = events
        .iter()
        .filter(|e| e.start_date > now && e.status == EventStatus::Scheduled)
        .cloned()
        .collect();
    upcoming.sort_by_key(|e| e.start_date);
    upcoming.truncate(limit);
    upcoming
}
