use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::json;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::plan::WeekDay;
use crate::models::settings::PlannerSettings;

const MAX_RECOMMENDATIONS: usize = 50;

#[derive(Debug, Default, Clone)]
pub struct SettingsUpdateInput {
    pub recommendations_per_child: Option<usize>,
    pub global_recommendation_limit: Option<usize>,
    pub organizer_email: Option<String>,
    pub organizer_name: Option<String>,
    pub weekday_labels: Option<Vec<String>>,
    pub catalog_path: Option<Option<PathBuf>>,
}

/// YAML-backed planner settings. Missing files and keys fall back to defaults.
pub struct SettingsService {
    path: Option<PathBuf>,
    cache: RwLock<Option<PlannerSettings>>,
}

impl SettingsService {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<PlannerSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    /// Read, merge, validate and save all happen under the cache write lock.
    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<PlannerSettings> {
        let mut guard = self
            .cache
            .write()
            .map_err(|_| AppError::other("settings cache lock poisoned"))?;

        let mut current = match guard.as_ref() {
            Some(settings) => settings.clone(),
            None => self.load()?,
        };

        if let Some(count) = input.recommendations_per_child {
            current.recommendations_per_child = count;
        }
        if let Some(limit) = input.global_recommendation_limit {
            current.global_recommendation_limit = limit;
        }
        if let Some(email) = input.organizer_email {
            current.organizer_email = email.trim().to_string();
        }
        if let Some(name) = input.organizer_name {
            current.organizer_name = name.trim().to_string();
        }
        if let Some(labels) = input.weekday_labels {
            current.weekday_labels = labels.into_iter().map(|label| label.trim().to_string()).collect();
        }
        if let Some(catalog_path) = input.catalog_path {
            current.catalog_path = catalog_path;
        }

        validate(&current)?;

        if let Some(path) = self.path.as_deref() {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_yaml::to_string(&current)?)?;
            info!(target: "app::settings", path = %path.display(), "settings saved");
        }

        *guard = Some(current.clone());
        Ok(current)
    }

    fn load(&self) -> AppResult<PlannerSettings> {
        match self.path.as_deref() {
            Some(path) if path.exists() => load_from_path(path),
            Some(path) => {
                debug!(target: "app::settings", path = %path.display(), "settings file missing, using defaults");
                Ok(PlannerSettings::default())
            }
            None => Ok(PlannerSettings::default()),
        }
    }

    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
    }
}

pub fn from_yaml_str(content: &str) -> AppResult<PlannerSettings> {
    let settings = if content.trim().is_empty() {
        PlannerSettings::default()
    } else {
        serde_yaml::from_str::<PlannerSettings>(content)?
    };
    validate(&settings)?;
    Ok(settings)
}

pub fn load_from_path(path: &Path) -> AppResult<PlannerSettings> {
    debug!(target: "app::settings", path = %path.display(), "reading settings file");
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn validate(settings: &PlannerSettings) -> AppResult<()> {
    ensure_valid_limit("recommendationsPerChild", settings.recommendations_per_child)?;
    ensure_valid_limit("globalRecommendationLimit", settings.global_recommendation_limit)?;
    ensure_valid_email(&settings.organizer_email)?;

    if settings.organizer_name.trim().is_empty() {
        return Err(AppError::validation("organizer name must not be empty"));
    }
    if settings.product_id.trim().is_empty() {
        return Err(AppError::validation("product id must not be empty"));
    }
    if settings.uid_domain.trim().is_empty() || settings.uid_domain.contains(char::is_whitespace) {
        return Err(AppError::validation_with_details(
            "uid domain must be a single non-empty token",
            json!({ "uidDomain": settings.uid_domain }),
        ));
    }

    if settings.weekday_labels.len() != WeekDay::ALL.len() {
        return Err(AppError::validation_with_details(
            "exactly seven weekday labels are required",
            json!({ "count": settings.weekday_labels.len() }),
        ));
    }
    if settings.weekday_labels.iter().any(|label| label.trim().is_empty()) {
        return Err(AppError::validation("weekday labels must not be empty"));
    }

    Ok(())
}

fn ensure_valid_limit(field: &str, value: usize) -> AppResult<()> {
    if !(1..=MAX_RECOMMENDATIONS).contains(&value) {
        return Err(AppError::validation_with_details(
            format!("{field} must be between 1 and {MAX_RECOMMENDATIONS}"),
            json!({ "field": field, "value": value }),
        ));
    }
    Ok(())
}

/// One `@` between non-empty parts, no whitespace or control characters.
pub fn is_valid_email(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.contains(|ch: char| ch.is_whitespace() || ch.is_control()) {
        return false;
    }
    match trimmed.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn ensure_valid_email(value: &str) -> AppResult<()> {
    if !is_valid_email(value) {
        return Err(AppError::validation_with_details(
            "organizer email is invalid",
            json!({ "value": value }),
        ));
    }
    Ok(())
}
