use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::activity::{Activity, AgeFilter, AgeRange, Category};

pub const ALL_AGES_BUCKET: &str = "all";

static DEFAULT_CATALOG: Lazy<Arc<ActivityCatalog>> =
    Lazy::new(|| Arc::new(ActivityCatalog::index(default_categories(), default_activities())));

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Immutable activity registry with precomputed lookups.
#[derive(Debug, Clone)]
pub struct ActivityCatalog {
    categories: Vec<Category>,
    activities: Vec<Activity>,
    by_id: HashMap<String, usize>,
    by_category: HashMap<String, Vec<usize>>,
}

impl ActivityCatalog {
    pub fn new(categories: Vec<Category>, activities: Vec<Activity>) -> AppResult<Self> {
        validate(&categories, &activities)?;
        let catalog = Self::index(categories, activities);
        info!(
            target: "app::catalog",
            categories = catalog.categories.len(),
            activities = catalog.activities.len(),
            "activity catalog loaded"
        );
        Ok(catalog)
    }

    pub fn shared_default() -> Arc<ActivityCatalog> {
        Arc::clone(&DEFAULT_CATALOG)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let document: CatalogDocument = serde_yaml::from_str(content)?;
        Self::new(document.categories, document.activities)
    }

    pub fn load_from_path(path: &Path) -> AppResult<Self> {
        debug!(target: "app::catalog", path = %path.display(), "reading catalog file");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    fn index(categories: Vec<Category>, activities: Vec<Activity>) -> Self {
        let mut by_id = HashMap::with_capacity(activities.len());
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, activity) in activities.iter().enumerate() {
            by_id.insert(activity.id.clone(), idx);
            by_category
                .entry(activity.category_id.clone())
                .or_default()
                .push(idx);
        }

        Self {
            categories,
            activities,
            by_id,
            by_category,
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn activity_by_id(&self, id: &str) -> Option<&Activity> {
        self.by_id.get(id).map(|&idx| &self.activities[idx])
    }

    pub fn require_activity(&self, id: &str) -> AppResult<&Activity> {
        self.activity_by_id(id)
            .ok_or_else(|| AppError::not_found("activity", id))
    }

    pub fn activities_in_category(&self, category_id: &str) -> Vec<&Activity> {
        self.by_category
            .get(category_id)
            .map(|indexes| indexes.iter().map(|&idx| &self.activities[idx]).collect())
            .unwrap_or_default()
    }

    /// Every category paired with its activities, in catalog order.
    pub fn activities_by_category(&self) -> Vec<(&Category, Vec<&Activity>)> {
        self.categories
            .iter()
            .map(|category| (category, self.activities_in_category(&category.id)))
            .collect()
    }

    /// Distinct age range labels in first-seen order.
    pub fn age_range_labels(&self) -> Vec<(AgeRange, String)> {
        let mut seen = HashSet::new();
        self.activities
            .iter()
            .flat_map(|activity| activity.age_ranges.iter().copied())
            .filter(|range| seen.insert(*range))
            .map(|range| (range, range.to_string()))
            .collect()
    }

    /// Activities shown under an age filter id (`all`, `0-3`, `12+`, ...).
    pub fn activities_for_filter(&self, filter_id: &str) -> AppResult<Vec<&Activity>> {
        if filter_id == ALL_AGES_BUCKET {
            return Ok(self.activities.iter().collect());
        }
        let wanted: AgeRange = filter_id.parse()?;
        Ok(self
            .activities
            .iter()
            .filter(|activity| activity.age_ranges.contains(&wanted))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

pub fn age_filters() -> Vec<AgeFilter> {
    [
        (ALL_AGES_BUCKET, "All ages"),
        ("0-3", "0-3 years"),
        ("3-6", "3-6 years"),
        ("6-12", "6-12 years"),
        ("12+", "12+ years"),
    ]
    .iter()
    .map(|(id, label)| AgeFilter {
        id: id.to_string(),
        label: label.to_string(),
    })
    .collect()
}

fn validate(categories: &[Category], activities: &[Activity]) -> AppResult<()> {
    let mut category_ids = HashSet::new();
    for category in categories {
        if category.id.trim().is_empty() {
            return Err(AppError::catalog("category id must not be empty"));
        }
        if !category_ids.insert(category.id.as_str()) {
            return Err(AppError::catalog(format!(
                "duplicate category id `{}`",
                category.id
            )));
        }
    }

    let mut activity_ids = HashSet::new();
    for activity in activities {
        if activity.id.trim().is_empty() {
            return Err(AppError::catalog("activity id must not be empty"));
        }
        if !activity_ids.insert(activity.id.as_str()) {
            return Err(AppError::catalog(format!(
                "duplicate activity id `{}`",
                activity.id
            )));
        }
        if !category_ids.contains(activity.category_id.as_str()) {
            return Err(AppError::catalog(format!(
                "activity `{}` references unknown category `{}`",
                activity.id, activity.category_id
            )));
        }
        if activity.age_ranges.is_empty() {
            return Err(AppError::catalog(format!(
                "activity `{}` declares no age range",
                activity.id
            )));
        }
        if activity.duration_minutes == 0 {
            return Err(AppError::catalog(format!(
                "activity `{}` has a zero duration",
                activity.id
            )));
        }
    }

    Ok(())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn default_categories() -> Vec<Category> {
    vec![
        Category {
            id: "preschool".into(),
            name: "Preschool support".into(),
            icon: Some("toys".into()),
            icon_color_class: Some("text-blue-600".into()),
            view_all_path: Some("/education/preschool".into()),
        },
        Category {
            id: "primary".into(),
            name: "School support".into(),
            icon: Some("menu_book".into()),
            icon_color_class: Some("text-purple-600".into()),
            view_all_path: Some("/education/school".into()),
        },
    ]
}

fn default_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "creative-coloring".into(),
            category_id: "preschool".into(),
            title: "Creative coloring".into(),
            summary: Some("Build creativity and fine motor skills with playful coloring pages.".into()),
            description: Some(
                "Let your child explore colors and shapes on drawings suited to their age. \
                 Let them pick their own colors and praise the effort."
                    .into(),
            ),
            icon: Some("palette".into()),
            gradient: Some("from-blue-200 to-purple-200".into()),
            badge_class: Some("bg-blue-100 text-blue-700".into()),
            age_ranges: vec![AgeRange::Between { min: 3, max: 6 }],
            duration_minutes: 20,
            learning_goals: strings(&[
                "Develop fine motor skills",
                "Strengthen hand-eye coordination",
                "Encourage creativity",
            ]),
            materials: strings(&[
                "Coloring pages",
                "Colored pencils or markers",
                "Decorative stickers (optional)",
            ]),
            steps: strings(&[
                "Pick a drawing suited to the child's age.",
                "Offer several colors and let the child choose.",
                "Encourage coloring along the outlines without aiming for perfection.",
                "Praise the child and display the artwork somewhere visible.",
            ]),
            tips: Some("Ask the child to tell the story of the drawing to practise language.".into()),
            skill_tags: strings(&["Creativity", "Fine motor skills"]),
            recommended: true,
            grade_levels: Vec::new(),
        },
        Activity {
            id: "letter-learning".into(),
            category_id: "preschool".into(),
            title: "Learning letters".into(),
            summary: Some("Discover the alphabet through recognition and sound games.".into()),
            description: Some(
                "Familiarise the child with letters and their sounds through short, fun games."
                    .into(),
            ),
            icon: Some("abc".into()),
            gradient: Some("from-green-200 to-teal-200".into()),
            badge_class: Some("bg-green-100 text-green-700".into()),
            age_ranges: vec![AgeRange::Between { min: 3, max: 6 }],
            duration_minutes: 15,
            learning_goals: strings(&[
                "Recognise the letters of the alphabet",
                "Match letters and sounds",
                "Grow vocabulary",
            ]),
            materials: strings(&[
                "Alphabet cards or magnetic letters",
                "Picture books or posters",
                "Alphabet songs",
            ]),
            steps: strings(&[
                "Introduce three or four letters and say them clearly.",
                "Ask the child to repeat the letters and their sounds.",
                "Link each letter to a familiar word.",
                "Finish with an alphabet song.",
            ]),
            tips: Some("Vary the materials (foam letters, modelling clay) to keep attention.".into()),
            skill_tags: strings(&["Language", "Phonological awareness"]),
            recommended: false,
            grade_levels: Vec::new(),
        },
        Activity {
            id: "reading-comprehension".into(),
            category_id: "primary".into(),
            title: "Reading and comprehension".into(),
            summary: Some("Strengthen reading comprehension with tailored questions.".into()),
            description: Some(
                "Read a short text together, then talk about the characters, the plot and \
                 the feelings involved."
                    .into(),
            ),
            icon: Some("import_contacts".into()),
            gradient: Some("from-indigo-200 to-blue-300".into()),
            badge_class: Some("bg-indigo-100 text-indigo-700".into()),
            age_ranges: vec![AgeRange::Between { min: 6, max: 12 }],
            duration_minutes: 25,
            learning_goals: strings(&[
                "Improve reading fluency",
                "Identify key information",
                "Practise summarising",
            ]),
            materials: strings(&[
                "A book or short text at the right level",
                "Prepared comprehension questions",
                "A notebook for new ideas",
            ]),
            steps: strings(&[
                "Read the text together or independently.",
                "Ask who, what, when, where and why questions.",
                "Have the child summarise the story in their own words.",
                "Pick a new word and look up its meaning together.",
            ]),
            tips: Some("Let the child choose the book to boost motivation.".into()),
            skill_tags: strings(&["Reading", "Analysis"]),
            recommended: true,
            grade_levels: Vec::new(),
        },
        Activity {
            id: "math-workshop".into(),
            category_id: "primary".into(),
            title: "Playful mathematics".into(),
            summary: Some("Practise mental arithmetic, geometry and logic through games.".into()),
            description: Some(
                "Turn math homework into small challenges with simple rewards to keep \
                 engagement high."
                    .into(),
            ),
            icon: Some("functions".into()),
            gradient: Some("from-red-200 to-orange-300".into()),
            badge_class: Some("bg-red-100 text-red-700".into()),
            age_ranges: vec![AgeRange::Between { min: 6, max: 12 }],
            duration_minutes: 30,
            learning_goals: strings(&[
                "Strengthen mental arithmetic",
                "Understand geometric shapes",
                "Develop logical thinking",
            ]),
            materials: strings(&[
                "Mental arithmetic cards",
                "Ruler and squared paper",
                "Small objects to manipulate",
            ]),
            steps: strings(&[
                "Start with five minutes of quick mental arithmetic.",
                "Introduce a concept with a concrete example.",
                "Let the child solve a guided exercise.",
                "Finish with a timed mini challenge.",
            ]),
            tips: Some("Keep a visible progress chart to celebrate effort.".into()),
            skill_tags: strings(&["Mathematics", "Logic"]),
            recommended: false,
            grade_levels: Vec::new(),
        },
        Activity {
            id: "science-experiments".into(),
            category_id: "primary".into(),
            title: "Science experiments".into(),
            summary: Some("Discover science through simple, safe experiments.".into()),
            description: Some(
                "Build a miniature volcano to explain chemical reactions and the words \
                 that describe them."
                    .into(),
            ),
            icon: Some("science".into()),
            gradient: Some("from-teal-200 to-green-300".into()),
            badge_class: Some("bg-teal-100 text-teal-700".into()),
            age_ranges: vec![AgeRange::Between { min: 6, max: 12 }],
            duration_minutes: 25,
            learning_goals: strings(&[
                "Understand a simple chemical reaction",
                "Observe and describe a phenomenon",
                "Use scientific vocabulary",
            ]),
            materials: strings(&["Baking soda", "Vinegar", "Food colouring", "A small container"]),
            steps: strings(&[
                "Prepare the materials together and explain the steps.",
                "Pour the baking soda into the container.",
                "Slowly add the coloured vinegar and watch the reaction.",
                "Talk about what happened and note the observations.",
            ]),
            tips: Some("Take photos of each step to build a science journal.".into()),
            skill_tags: strings(&["Science", "Observation"]),
            recommended: false,
            grade_levels: Vec::new(),
        },
        Activity {
            id: "history-geography".into(),
            category_id: "primary".into(),
            title: "History and geography".into(),
            summary: Some("Explore the world through stories and interactive maps.".into()),
            description: Some(
                "Choose a country or a period and discover its key events, culture and \
                 landmarks together."
                    .into(),
            ),
            icon: Some("history_edu".into()),
            gradient: Some("from-violet-200 to-purple-300".into()),
            badge_class: Some("bg-violet-100 text-violet-700".into()),
            age_ranges: vec![
                AgeRange::Between { min: 6, max: 12 },
                AgeRange::AtLeast { min: 12 },
            ],
            duration_minutes: 30,
            learning_goals: strings(&[
                "Place an event on a timeline",
                "Understand how maps work",
                "Broaden general knowledge",
            ]),
            materials: strings(&["Atlas or globe", "Timeline", "Pictures or videos"]),
            steps: strings(&[
                "Choose a theme, for example castles.",
                "Find the place on a map or globe.",
                "Read or watch suitable content.",
                "Ask the child to present what they remember.",
            ]),
            tips: Some("Keep a travel journal where the child pastes pictures and notes.".into()),
            skill_tags: strings(&["Culture", "Analysis"]),
            recommended: true,
            grade_levels: Vec::new(),
        },
    ]
}
