use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;

/// Target age span declared by an activity, written `min-max` or `N+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AgeRange {
    Between { min: u32, max: u32 },
    AtLeast { min: u32 },
}

impl AgeRange {
    /// Unknown ages match every range.
    pub fn matches(&self, age: Option<u32>) -> bool {
        let Some(age) = age else {
            return true;
        };
        match *self {
            AgeRange::Between { min, max } => age >= min && age <= max,
            AgeRange::AtLeast { min } => age >= min,
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeRange::Between { min, max } => write!(f, "{min}-{max}"),
            AgeRange::AtLeast { min } => write!(f, "{min}+"),
        }
    }
}

impl FromStr for AgeRange {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let raw = value.trim();
        let invalid = || {
            AppError::validation_with_details("invalid age range", json!({ "value": value }))
        };

        if let Some(min) = raw.strip_suffix('+') {
            let min = min.trim().parse::<u32>().map_err(|_| invalid())?;
            return Ok(AgeRange::AtLeast { min });
        }

        let (min, max) = raw.split_once('-').ok_or_else(invalid)?;
        let min = min.trim().parse::<u32>().map_err(|_| invalid())?;
        let max = max.trim().parse::<u32>().map_err(|_| invalid())?;
        if min > max {
            return Err(invalid());
        }
        Ok(AgeRange::Between { min, max })
    }
}

impl TryFrom<String> for AgeRange {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AgeRange> for String {
    fn from(range: AgeRange) -> Self {
        range.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_color_class: Option<String>,
    #[serde(default)]
    pub view_all_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub category_id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub gradient: Option<String>,
    #[serde(default)]
    pub badge_class: Option<String>,
    pub age_ranges: Vec<AgeRange>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tips: Option<String>,
    #[serde(default)]
    pub skill_tags: Vec<String>,
    #[serde(default)]
    pub recommended: bool,
    /// Grades this activity is written for. Empty when the activity makes no claim.
    #[serde(default)]
    pub grade_levels: Vec<String>,
}

impl Activity {
    pub fn is_eligible_for(&self, age: Option<u32>) -> bool {
        age.is_none() || self.age_ranges.iter().any(|range| range.matches(age))
    }

    pub fn shares_skill_with(&self, used_tags: &HashSet<String>) -> bool {
        self.skill_tags.iter().any(|tag| used_tags.contains(tag))
    }

    /// Short text for calendar entries: the summary, else the long description.
    pub fn blurb(&self) -> &str {
        self.summary
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgeFilter {
    pub id: String,
    pub label: String,
}
