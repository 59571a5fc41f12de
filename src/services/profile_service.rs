use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::child::{Child, CompletionRecord};
use crate::models::profile::ChildProfile;
use crate::models::settings::PlannerSettings;
use crate::services::catalog_service::ActivityCatalog;
use crate::services::eligibility;
use crate::services::recommendation_service::{self, PlanningContext};
use crate::services::streak_service;
use crate::services::weekly_plan_service;

/// Builds one profile per child, in input order.
///
/// Completions are matched to children by `child_id`; records for children
/// not in `children` are ignored.
pub fn build_child_profiles(
    catalog: &ActivityCatalog,
    settings: &PlannerSettings,
    children: &[Child],
    completions: &[CompletionRecord],
    now: DateTime<Utc>,
) -> Vec<ChildProfile> {
    let mut by_child: HashMap<&str, Vec<&CompletionRecord>> = HashMap::new();
    for record in completions {
        by_child
            .entry(record.child_id.as_str())
            .or_default()
            .push(record);
    }

    let profiles: Vec<ChildProfile> = children
        .iter()
        .map(|child| {
            let history = by_child
                .get(child.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            build_child_profile(catalog, settings, child, history, now)
        })
        .collect();

    debug!(
        target: "app::planner",
        children = profiles.len(),
        completions = completions.len(),
        "child profiles built"
    );
    profiles
}

pub fn build_child_profile(
    catalog: &ActivityCatalog,
    settings: &PlannerSettings,
    child: &Child,
    history: &[&CompletionRecord],
    now: DateTime<Utc>,
) -> ChildProfile {
    let today = now.date_naive();
    let age = eligibility::calculate_age(child.birth_date.as_deref(), today);
    let metrics = streak_service::calculate_streak_metrics(history.iter().copied(), today);

    let completed_activity_ids: HashSet<String> = history
        .iter()
        .map(|record| record.activity_id.clone())
        .collect();

    let context = PlanningContext {
        age,
        grade: child.grade().map(str::to_string),
        completed_activity_ids,
    };

    let ranked = recommendation_service::rank_activities_for_child(catalog, &context);
    let weekly_plan = weekly_plan_service::build_weekly_plan(
        &ranked,
        &context.completed_activity_ids,
        settings,
        now,
    );
    let recommendations = ranked
        .iter()
        .take(settings.recommendations_per_child)
        .map(|item| item.activity.clone())
        .collect();

    ChildProfile {
        child: child.clone(),
        age,
        age_buckets: eligibility::age_buckets(catalog, age),
        metrics,
        completed_activity_ids: context.completed_activity_ids.into_iter().collect::<BTreeSet<_>>(),
        recommendations,
        weekly_plan,
        total_completions: history.len(),
        total_minutes: completed_minutes(catalog, history),
    }
}

/// Catalog minutes across the completions. Unknown activity ids add nothing.
pub fn completed_minutes(catalog: &ActivityCatalog, history: &[&CompletionRecord]) -> u32 {
    let mut unknown = 0usize;
    let total = history
        .iter()
        .map(|record| match catalog.activity_by_id(&record.activity_id) {
            Some(activity) => activity.duration_minutes,
            None => {
                unknown += 1;
                0
            }
        })
        .fold(0u32, u32::saturating_add);

    if unknown > 0 {
        warn!(
            target: "app::planner",
            unknown,
            "completions reference activities missing from the catalog"
        );
    }
    total
}
