use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::plan::WeeklyPlan;
use crate::models::profile::ChildProfile;
use crate::models::settings::PlannerSettings;
use crate::services::catalog_service::ActivityCatalog;
use crate::services::date_utils;
use crate::services::settings_service;

const CRLF: &str = "\r\n";
const MAX_LINE_OCTETS: usize = 75;
const EVENT_CATEGORY: &str = "Education";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Overrides the configured organizer address when it is a valid email.
    #[serde(default)]
    pub organizer_email: Option<String>,
}

/// Writes weekly plans as iCalendar documents with one all-day event per planned day.
pub struct CalendarExporter<'a> {
    catalog: &'a ActivityCatalog,
    settings: &'a PlannerSettings,
}

impl<'a> CalendarExporter<'a> {
    pub fn new(catalog: &'a ActivityCatalog, settings: &'a PlannerSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn export(
        &self,
        profile: &ChildProfile,
        plan: &WeeklyPlan,
        options: &ExportOptions,
    ) -> String {
        self.export_at(profile, plan, options, Utc::now())
    }

    /// `now` becomes the DTSTAMP of every event. UIDs are always fresh.
    pub fn export_at(
        &self,
        profile: &ChildProfile,
        plan: &WeeklyPlan,
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> String {
        let organizer_email = options
            .organizer_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .filter(|email| {
                let valid = settings_service::is_valid_email(email);
                if !valid {
                    warn!(
                        target: "app::planner::export",
                        child_id = %profile.child.id,
                        "organizer override rejected, using configured address"
                    );
                }
                valid
            })
            .unwrap_or(self.settings.organizer_email.as_str());
        let stamp = date_utils::ics_timestamp(now);

        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.settings.product_id),
            "CALSCALE:GREGORIAN".to_string(),
        ];

        let mut events = 0usize;
        for (day, planned) in plan.filled_days() {
            let activity = self.catalog.activity_by_id(&planned.id).unwrap_or(planned);
            let summary = format!("{} – {}", profile.child.name, activity.title);

            lines.push("BEGIN:VEVENT".to_string());
            lines.push(format!("UID:{}@{}", Uuid::new_v4(), self.settings.uid_domain));
            lines.push(format!("DTSTAMP:{stamp}"));
            lines.push(format!(
                "ORGANIZER;CN={}:mailto:{}",
                param_value(&self.settings.organizer_name),
                organizer_email
            ));
            lines.push(format!("DTSTART;VALUE=DATE:{}", date_utils::ics_date(day.date)));
            lines.push(format!("SUMMARY:{}", escape_text(&summary)));
            lines.push(format!("DESCRIPTION:{}", escape_text(activity.blurb())));
            lines.push(format!("CATEGORIES:{EVENT_CATEGORY}"));
            lines.push("TRANSP:OPAQUE".to_string());
            lines.push("END:VEVENT".to_string());
            events += 1;
        }

        lines.push("END:VCALENDAR".to_string());

        info!(
            target: "app::planner::export",
            child_id = %profile.child.id,
            start_date = %plan.start_date,
            events,
            "weekly plan exported"
        );

        let mut document = String::new();
        for line in &lines {
            document.push_str(&fold_line(line));
            document.push_str(CRLF);
        }
        document
    }
}

/// Escapes a TEXT value (RFC 5545 §3.3.11).
pub fn escape_text(value: &str) -> String {
    let normalized = value.replace("\r\n", "\n");
    let mut escaped = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' | '\r' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn param_value(value: &str) -> String {
    let cleaned: String = value.chars().filter(|ch| *ch != '"' && !ch.is_control()).collect();
    if cleaned.contains(|ch: char| matches!(ch, ':' | ';' | ',')) {
        format!("\"{cleaned}\"")
    } else {
        cleaned
    }
}

/// Splits content lines longer than 75 octets, never inside a UTF-8 sequence.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / (MAX_LINE_OCTETS - 1) * 3);
    let mut octets = 0usize;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if octets + width > MAX_LINE_OCTETS {
            folded.push_str(CRLF);
            folded.push(' ');
            octets = 1;
        }
        folded.push(ch);
        octets += width;
    }
    folded
}
