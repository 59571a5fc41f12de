use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::plan::WeekDay;

pub const DEFAULT_RECOMMENDATIONS_PER_CHILD: usize = 5;
pub const DEFAULT_GLOBAL_RECOMMENDATION_LIMIT: usize = 5;
pub const DEFAULT_ORGANIZER_EMAIL: &str = "no-reply@example.org";
pub const DEFAULT_ORGANIZER_NAME: &str = "Family Planner";
pub const DEFAULT_PRODUCT_ID: &str = "-//Family Planner//Education Planner//EN";
pub const DEFAULT_UID_DOMAIN: &str = "edu-planner";
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,app::planner=debug";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerSettings {
    pub recommendations_per_child: usize,
    pub global_recommendation_limit: usize,
    pub organizer_email: String,
    pub organizer_name: String,
    pub product_id: String,
    pub uid_domain: String,
    /// Labels shown for Monday through Sunday.
    pub weekday_labels: Vec<String>,
    pub log_directives: String,
    pub log_dir: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

impl PlannerSettings {
    pub fn label_for(&self, day: WeekDay) -> &str {
        self.weekday_labels
            .get(day.offset() as usize)
            .map(String::as_str)
            .unwrap_or_else(|| day.default_label())
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            recommendations_per_child: DEFAULT_RECOMMENDATIONS_PER_CHILD,
            global_recommendation_limit: DEFAULT_GLOBAL_RECOMMENDATION_LIMIT,
            organizer_email: DEFAULT_ORGANIZER_EMAIL.to_string(),
            organizer_name: DEFAULT_ORGANIZER_NAME.to_string(),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
            weekday_labels: WeekDay::ALL
                .iter()
                .map(|day| day.default_label().to_string())
                .collect(),
            log_directives: DEFAULT_LOG_DIRECTIVES.to_string(),
            log_dir: None,
            catalog_path: None,
        }
    }
}
