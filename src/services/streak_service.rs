use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::models::child::CompletionRecord;
use crate::models::profile::StreakMetrics;
use crate::services::date_utils;

/// Streaks over the calendar days on which at least one completion happened.
///
/// The current streak is the run ending at the latest completion day, and
/// only counts when that day is `today` or the day before.
pub fn calculate_streak_metrics<'a, I>(completions: I, today: NaiveDate) -> StreakMetrics
where
    I: IntoIterator<Item = &'a CompletionRecord>,
{
    let mut skipped = 0usize;
    let days: BTreeSet<NaiveDate> = completions
        .into_iter()
        .filter_map(|record| {
            let parsed = date_utils::parse_calendar_date(&record.completed_at);
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();

    if skipped > 0 {
        debug!(target: "app::planner::streak", skipped, "ignored unparseable completion timestamps");
    }

    streak_metrics_for_days(&days, today)
}

pub fn streak_metrics_for_days(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> StreakMetrics {
    let Some(&last) = days.iter().next_back() else {
        return StreakMetrics::default();
    };

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for &day in days {
        run = match previous {
            Some(prev) if date_utils::days_between(day, prev) == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    let yesterday = today - Duration::days(1);
    let current = if last == today || last == yesterday {
        run_ending_at(days, last)
    } else {
        0
    };

    StreakMetrics {
        current_streak: current,
        longest_streak: longest,
        last_completed_date: Some(last),
    }
}

fn run_ending_at(days: &BTreeSet<NaiveDate>, anchor: NaiveDate) -> u32 {
    let mut count = 0u32;
    let mut expected = anchor;
    for &day in days.range(..=anchor).rev() {
        if day != expected {
            break;
        }
        count += 1;
        expected = day - Duration::days(1);
    }
    count
}
