use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::activity::Activity;
use crate::models::profile::{AggregateRecommendation, ChildProfile, RankedActivity};
use crate::services::catalog_service::ActivityCatalog;

const BASE_SCORE: i32 = 10;
const NOVELTY_BONUS: i32 = 5;
const REPEAT_PENALTY: i32 = 3;
const RECOMMENDED_BONUS: i32 = 3;
const GRADE_MATCH_BONUS: i32 = 2;
const GRADE_MISMATCH_PENALTY: i32 = 1;
const SHORT_ACTIVITY_MINUTES: u32 = 20;
const SHORT_ACTIVITY_BONUS: i32 = 1;
const AUDIENCE_RANK_BASE: u32 = 100;

/// What the scorer knows about one child.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanningContext {
    pub age: Option<u32>,
    pub grade: Option<String>,
    pub completed_activity_ids: HashSet<String>,
}

impl PlanningContext {
    pub fn has_completed(&self, activity_id: &str) -> bool {
        self.completed_activity_ids.contains(activity_id)
    }
}

/// Score of `activity` for the child, or `None` when its age ranges exclude the child.
pub fn score_activity(activity: &Activity, context: &PlanningContext) -> Option<i32> {
    if !activity.is_eligible_for(context.age) {
        return None;
    }

    let mut score = BASE_SCORE;

    if context.has_completed(&activity.id) {
        score -= REPEAT_PENALTY;
    } else {
        score += NOVELTY_BONUS;
    }

    if activity.recommended {
        score += RECOMMENDED_BONUS;
    }

    if let Some(grade) = context.grade.as_deref() {
        if !activity.grade_levels.is_empty() {
            if activity.grade_levels.iter().any(|level| level == grade) {
                score += GRADE_MATCH_BONUS;
            } else {
                score -= GRADE_MISMATCH_PENALTY;
            }
        }
    }

    if activity.duration_minutes <= SHORT_ACTIVITY_MINUTES {
        score += SHORT_ACTIVITY_BONUS;
    }

    Some(score)
}

/// Eligible catalog activities, best first. Equal scores keep catalog order.
pub fn rank_activities_for_child(
    catalog: &ActivityCatalog,
    context: &PlanningContext,
) -> Vec<RankedActivity> {
    let mut ranked: Vec<RankedActivity> = catalog
        .activities()
        .iter()
        .filter_map(|activity| {
            score_activity(activity, context).map(|score| RankedActivity {
                activity: activity.clone(),
                score,
                already_completed: context.has_completed(&activity.id),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    debug!(
        target: "app::planner::ranking",
        age = ?context.age,
        eligible = ranked.len(),
        catalog = catalog.len(),
        "ranked activities for child"
    );
    ranked
}

struct Tally<'a> {
    activity: &'a Activity,
    score: u32,
    audience: HashSet<&'a str>,
}

/// Merges every child's top recommendations into one family-wide list.
///
/// An activity at position `i` of a child's list earns `100 - i` points.
/// Equal totals keep first-seen order.
pub fn compile_global_recommendations(
    profiles: &[ChildProfile],
    limit: usize,
) -> Vec<AggregateRecommendation> {
    let mut tallies: Vec<Tally<'_>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for profile in profiles {
        for (index, activity) in profile.recommendations.iter().enumerate() {
            let slot = *positions.entry(activity.id.as_str()).or_insert_with(|| {
                tallies.push(Tally {
                    activity,
                    score: 0,
                    audience: HashSet::new(),
                });
                tallies.len() - 1
            });

            let tally = &mut tallies[slot];
            let points = u32::try_from(index)
                .map(|index| AUDIENCE_RANK_BASE.saturating_sub(index))
                .unwrap_or(0);
            tally.score += points;
            tally.audience.insert(profile.child.id.as_str());
        }
    }

    tallies.sort_by(|a, b| b.score.cmp(&a.score));
    tallies.truncate(limit);

    tallies
        .into_iter()
        .map(|tally| AggregateRecommendation {
            activity: tally.activity.clone(),
            score: tally.score,
            audience_size: tally.audience.len(),
        })
        .collect()
}
