use chrono::{DateTime, TimeZone, Utc};
use edu_planner_lib::models::child::Child;
use edu_planner_lib::models::profile::ChildProfile;
use edu_planner_lib::models::settings::PlannerSettings;
use edu_planner_lib::services::calendar_export::ExportOptions;
use edu_planner_lib::services::catalog_service::ActivityCatalog;
use edu_planner_lib::services::planner_service::PlannerService;

fn friday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0)
        .single()
        .expect("fixed instant")
}

fn profile_for(planner: &PlannerService, name: &str, birth_date: &str) -> ChildProfile {
    let child = Child {
        id: "child-1".into(),
        name: name.into(),
        birth_date: Some(birth_date.into()),
        grade: None,
        family_id: None,
    };
    planner
        .build_child_profiles_at(&[child], &[], friday_noon())
        .into_iter()
        .next()
        .expect("one profile")
}

fn unfolded_lines(document: &str) -> Vec<String> {
    document
        .replace("\r\n ", "")
        .split("\r\n")
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn count_lines(lines: &[String], prefix: &str) -> usize {
    lines.iter().filter(|line| line.starts_with(prefix)).count()
}

#[test]
fn exports_one_event_per_planned_day() {
    let planner = PlannerService::with_defaults();
    let profile = profile_for(&planner, "Ada", "2016-01-20");
    assert_eq!(profile.weekly_plan.filled_count(), 4);

    let document = planner.generate_weekly_plan_export_at(
        &profile,
        &profile.weekly_plan,
        &ExportOptions::default(),
        friday_noon(),
    );

    assert!(document.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(document.ends_with("END:VCALENDAR\r\n"));
    assert!(!document.replace("\r\n", "").contains('\n'));

    let lines = unfolded_lines(&document);
    assert_eq!(count_lines(&lines, "BEGIN:VEVENT"), 4);
    assert_eq!(count_lines(&lines, "END:VEVENT"), 4);
    assert_eq!(count_lines(&lines, "DTSTAMP:20240510T120000Z"), 4);
    assert_eq!(count_lines(&lines, "CATEGORIES:Education"), 4);
    assert_eq!(
        count_lines(&lines, "ORGANIZER;CN=Family Planner:mailto:no-reply@example.org"),
        4
    );

    let starts: Vec<&str> = lines
        .iter()
        .filter_map(|line| line.strip_prefix("DTSTART;VALUE=DATE:"))
        .collect();
    assert_eq!(starts, vec!["20240513", "20240514", "20240515", "20240516"]);

    assert!(lines.contains(&"SUMMARY:Ada – Reading and comprehension".to_string()));
    // Commas in descriptions are escaped.
    assert!(lines.contains(
        &"DESCRIPTION:Practise mental arithmetic\\, geometry and logic through games.".to_string()
    ));

    let uids: Vec<&str> = lines
        .iter()
        .filter_map(|line| line.strip_prefix("UID:"))
        .collect();
    assert_eq!(uids.len(), 4);
    assert!(uids.iter().all(|uid| uid.ends_with("@edu-planner")));
    let mut unique = uids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 4);
}

#[test]
fn empty_plan_exports_calendar_without_events() {
    let planner = PlannerService::with_defaults();
    let profile = profile_for(&planner, "Toddler", "2022-03-01");
    assert_eq!(profile.age, Some(2));
    assert_eq!(profile.weekly_plan.filled_count(), 0);

    let document = planner.generate_weekly_plan_export(
        &profile,
        &profile.weekly_plan,
        &ExportOptions::default(),
    );
    let lines = unfolded_lines(&document);
    assert_eq!(count_lines(&lines, "BEGIN:VEVENT"), 0);
    assert_eq!(lines.first().map(String::as_str), Some("BEGIN:VCALENDAR"));
    assert_eq!(lines.last().map(String::as_str), Some("END:VCALENDAR"));
}

#[test]
fn organizer_override_and_custom_settings_are_applied() {
    let settings = PlannerSettings {
        organizer_name: "Smith, Family".into(),
        uid_domain: "planner.example.com".into(),
        ..PlannerSettings::default()
    };
    let planner = PlannerService::new(ActivityCatalog::shared_default(), settings);
    let profile = profile_for(&planner, "Leo", "2020-03-01");
    assert_eq!(profile.weekly_plan.filled_count(), 2);

    let options = ExportOptions {
        organizer_email: Some("  parents@example.com ".into()),
    };
    let document =
        planner.generate_weekly_plan_export_at(&profile, &profile.weekly_plan, &options, friday_noon());
    let lines = unfolded_lines(&document);

    assert_eq!(
        count_lines(
            &lines,
            "ORGANIZER;CN=\"Smith, Family\":mailto:parents@example.com"
        ),
        2
    );
    assert!(lines
        .iter()
        .filter_map(|line| line.strip_prefix("UID:"))
        .all(|uid| uid.ends_with("@planner.example.com")));

    let blank = ExportOptions {
        organizer_email: Some("   ".into()),
    };
    let fallback =
        planner.generate_weekly_plan_export_at(&profile, &profile.weekly_plan, &blank, friday_noon());
    assert!(fallback.contains("mailto:no-reply@example.org"));
}

#[test]
fn malformed_organizer_override_cannot_add_content_lines() {
    let planner = PlannerService::with_defaults();
    let profile = profile_for(&planner, "Leo", "2020-03-01");

    let options = ExportOptions {
        organizer_email: Some("x@y.z\r\nEND:VEVENT\r\nEND:VCALENDAR".into()),
    };
    let document =
        planner.generate_weekly_plan_export_at(&profile, &profile.weekly_plan, &options, friday_noon());
    let lines = unfolded_lines(&document);

    assert_eq!(count_lines(&lines, "END:VCALENDAR"), 1);
    assert_eq!(count_lines(&lines, "END:VEVENT"), 2);
    assert_eq!(
        count_lines(&lines, "ORGANIZER;CN=Family Planner:mailto:no-reply@example.org"),
        2
    );
    assert!(!document.contains("x@y.z"));
}
