use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::child::{Child, CompletionRecord};
use crate::models::plan::WeeklyPlan;
use crate::models::profile::{AggregateRecommendation, ChildProfile};
use crate::models::settings::PlannerSettings;
use crate::services::calendar_export::{CalendarExporter, ExportOptions};
use crate::services::catalog_service::ActivityCatalog;
use crate::services::profile_service;
use crate::services::recommendation_service;

/// Entry point used by request handlers. Holds only immutable state, so one
/// instance can serve concurrent requests.
#[derive(Clone)]
pub struct PlannerService {
    catalog: Arc<ActivityCatalog>,
    settings: Arc<PlannerSettings>,
}

impl PlannerService {
    pub fn new(catalog: Arc<ActivityCatalog>, settings: PlannerSettings) -> Self {
        Self {
            catalog,
            settings: Arc::new(settings),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ActivityCatalog::shared_default(), PlannerSettings::default())
    }

    /// Uses the catalog file named in `settings`, or the built-in catalog.
    pub fn from_settings(settings: PlannerSettings) -> AppResult<Self> {
        let catalog = match settings.catalog_path.as_deref() {
            Some(path) => Arc::new(ActivityCatalog::load_from_path(path)?),
            None => ActivityCatalog::shared_default(),
        };
        info!(
            target: "app::planner",
            activities = catalog.len(),
            custom_catalog = settings.catalog_path.is_some(),
            "planner ready"
        );
        Ok(Self::new(catalog, settings))
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn build_child_profiles(
        &self,
        children: &[Child],
        completions: &[CompletionRecord],
    ) -> Vec<ChildProfile> {
        self.build_child_profiles_at(children, completions, Utc::now())
    }

    pub fn build_child_profiles_at(
        &self,
        children: &[Child],
        completions: &[CompletionRecord],
        now: DateTime<Utc>,
    ) -> Vec<ChildProfile> {
        profile_service::build_child_profiles(
            &self.catalog,
            &self.settings,
            children,
            completions,
            now,
        )
    }

    pub fn compile_global_recommendations(
        &self,
        profiles: &[ChildProfile],
        limit: usize,
    ) -> Vec<AggregateRecommendation> {
        recommendation_service::compile_global_recommendations(profiles, limit)
    }

    /// Family-wide list truncated to the configured limit.
    pub fn family_recommendations(
        &self,
        profiles: &[ChildProfile],
    ) -> Vec<AggregateRecommendation> {
        self.compile_global_recommendations(profiles, self.settings.global_recommendation_limit)
    }

    pub fn generate_weekly_plan_export(
        &self,
        profile: &ChildProfile,
        plan: &WeeklyPlan,
        options: &ExportOptions,
    ) -> String {
        CalendarExporter::new(&self.catalog, &self.settings).export(profile, plan, options)
    }

    pub fn generate_weekly_plan_export_at(
        &self,
        profile: &ChildProfile,
        plan: &WeeklyPlan,
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> String {
        CalendarExporter::new(&self.catalog, &self.settings).export_at(profile, plan, options, now)
    }
}

pub fn find_profile<'a>(
    profiles: &'a [ChildProfile],
    child_id: &str,
) -> AppResult<&'a ChildProfile> {
    profiles
        .iter()
        .find(|profile| profile.child.id == child_id)
        .ok_or_else(|| AppError::not_found("child", child_id))
}
