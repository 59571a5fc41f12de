use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::models::activity::Activity;
use crate::models::plan::{DaySlot, WeekDay, WeeklyPlan};
use crate::models::profile::RankedActivity;
use crate::models::settings::PlannerSettings;
use crate::services::date_utils;

pub const PLAN_LENGTH_DAYS: usize = 7;
/// Slots filled under the novelty and skill diversity rules before they relax.
pub const CONSTRAINED_SLOTS: usize = 4;

/// Picks up to seven activities for the week, in slot order.
///
/// Runs a constrained pass over the ranking, then backfills when it placed
/// fewer than [`CONSTRAINED_SLOTS`] activities.
pub fn select_plan_activities<'a>(
    ranked: &'a [RankedActivity],
    completed_ids: &HashSet<String>,
) -> Vec<&'a Activity> {
    let mut placed = constrained_pass(ranked, completed_ids);
    if placed.len() < CONSTRAINED_SLOTS {
        backfill_pass(ranked, &mut placed);
    }
    placed
}

fn constrained_pass<'a>(
    ranked: &'a [RankedActivity],
    completed_ids: &HashSet<String>,
) -> Vec<&'a Activity> {
    let mut placed: Vec<&Activity> = Vec::with_capacity(PLAN_LENGTH_DAYS);
    let mut used_tags: HashSet<String> = HashSet::new();

    for item in ranked {
        if placed.len() >= PLAN_LENGTH_DAYS {
            break;
        }

        let activity = &item.activity;
        let constrained = placed.len() < CONSTRAINED_SLOTS;
        if constrained && completed_ids.contains(&activity.id) {
            continue;
        }
        if constrained && activity.shares_skill_with(&used_tags) {
            continue;
        }

        used_tags.extend(activity.skill_tags.iter().cloned());
        placed.push(activity);
    }

    placed
}

fn backfill_pass<'a>(ranked: &'a [RankedActivity], placed: &mut Vec<&'a Activity>) {
    for item in ranked {
        if placed.len() >= CONSTRAINED_SLOTS {
            break;
        }
        if placed.iter().any(|existing| existing.id == item.activity.id) {
            continue;
        }
        placed.push(&item.activity);
    }
}

/// Lays the selection out over Monday..Sunday of the week after `now`.
pub fn build_weekly_plan(
    ranked: &[RankedActivity],
    completed_ids: &HashSet<String>,
    settings: &PlannerSettings,
    now: DateTime<Utc>,
) -> WeeklyPlan {
    let selection = select_plan_activities(ranked, completed_ids);
    let start_date = date_utils::next_monday(now.date_naive());

    let days = WeekDay::ALL
        .iter()
        .enumerate()
        .map(|(index, &day)| DaySlot {
            key: day,
            label: settings.label_for(day).to_string(),
            date: start_date + Duration::days(day.offset()),
            activity: selection.get(index).map(|activity| (*activity).clone()),
        })
        .collect();

    debug!(
        target: "app::planner::weekly",
        start_date = %start_date,
        planned = selection.len(),
        candidates = ranked.len(),
        "weekly plan assembled"
    );

    WeeklyPlan {
        generated_at: now,
        start_date,
        days,
    }
}
