use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::activity::Activity;
use crate::models::child::Child;
use crate::models::plan::WeeklyPlan;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakMetrics {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default)]
    pub last_completed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedActivity {
    pub activity: Activity,
    pub score: i32,
    pub already_completed: bool,
}

/// Per-request view of a child, derived from the child record, its
/// completions and the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub child: Child,
    pub age: Option<u32>,
    pub age_buckets: Vec<String>,
    pub metrics: StreakMetrics,
    pub completed_activity_ids: BTreeSet<String>,
    pub recommendations: Vec<Activity>,
    pub weekly_plan: WeeklyPlan,
    pub total_completions: usize,
    pub total_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRecommendation {
    #[serde(flatten)]
    pub activity: Activity,
    pub score: u32,
    pub audience_size: usize,
}
