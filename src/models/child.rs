use serde::{Deserialize, Serialize};

/// Child record as stored by the family data store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Child {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub family_id: Option<String>,
}

impl Child {
    pub fn grade(&self) -> Option<&str> {
        self.grade
            .as_deref()
            .map(str::trim)
            .filter(|grade| !grade.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRecord {
    pub activity_id: String,
    pub child_id: String,
    pub completed_at: String,
}

/// Consistent input set for one planning request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlanningSnapshot {
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
}
