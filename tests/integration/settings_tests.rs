use chrono::{TimeZone, Utc};
use edu_planner_lib::models::child::Child;
use edu_planner_lib::models::plan::WeekDay;
use edu_planner_lib::models::settings::PlannerSettings;
use edu_planner_lib::services::planner_service::PlannerService;
use edu_planner_lib::services::settings_service::{SettingsService, SettingsUpdateInput};
use tempfile::tempdir;

const CATALOG_YAML: &str = r#"
categories:
  - id: outdoor
    name: Outdoor
activities:
  - id: nature-walk
    categoryId: outdoor
    title: Nature walk
    summary: Collect leaves and name the trees you pass.
    ageRanges: ["3-6", "6-12"]
    durationMinutes: 40
    skillTags: [Observation]
  - id: bird-count
    categoryId: outdoor
    title: Bird count
    ageRanges: ["6-12"]
    durationMinutes: 15
    skillTags: [Observation, Mathematics]
    gradeLevels: ["3"]
  - id: star-map
    categoryId: outdoor
    title: Star map
    ageRanges: ["12+"]
    durationMinutes: 30
    skillTags: [Science]
"#;

#[test]
fn missing_settings_file_falls_back_to_defaults() {
    let dir = tempdir().expect("temp dir");
    let service = SettingsService::new(Some(dir.path().join("absent.yaml")));
    let settings = service.get().expect("defaults");
    assert_eq!(settings, PlannerSettings::default());
    assert!(!dir.path().join("absent.yaml").exists());
}

#[test]
fn updates_are_persisted_and_reloaded() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("config").join("planner.yaml");

    let service = SettingsService::new(Some(path.clone()));
    let updated = service
        .update(SettingsUpdateInput {
            recommendations_per_child: Some(2),
            organizer_email: Some(" parents@example.com ".into()),
            weekday_labels: Some(
                ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                    .iter()
                    .map(|label| label.to_string())
                    .collect(),
            ),
            ..Default::default()
        })
        .expect("update settings");
    assert_eq!(updated.organizer_email, "parents@example.com");
    assert!(path.exists());

    let reloaded = SettingsService::new(Some(path.clone()))
        .get()
        .expect("reload settings");
    assert_eq!(reloaded, updated);
    assert_eq!(reloaded.label_for(WeekDay::Sunday), "Sun");

    let rejected = service.update(SettingsUpdateInput {
        global_recommendation_limit: Some(0),
        ..Default::default()
    });
    assert!(rejected.is_err());

    service.invalidate();
    let after_reject = service.get().expect("settings after rejected update");
    assert_eq!(after_reject.global_recommendation_limit, 5);
    assert_eq!(after_reject.recommendations_per_child, 2);
}

#[test]
fn planner_uses_catalog_and_labels_from_settings() {
    let dir = tempdir().expect("temp dir");
    let catalog_path = dir.path().join("catalog.yaml");
    std::fs::write(&catalog_path, CATALOG_YAML).expect("write catalog");

    let settings_path = dir.path().join("planner.yaml");
    std::fs::write(
        &settings_path,
        format!(
            "recommendationsPerChild: 1\nweekdayLabels: [Lun, Mar, Mer, Jeu, Ven, Sam, Dim]\ncatalogPath: {}\n",
            catalog_path.display()
        ),
    )
    .expect("write settings");

    let settings = SettingsService::new(Some(settings_path))
        .get()
        .expect("load settings");
    let planner = PlannerService::from_settings(settings).expect("planner");
    assert_eq!(planner.catalog().len(), 3);

    let child = Child {
        id: "kid".into(),
        name: "Kid".into(),
        birth_date: Some("2015-06-01".into()),
        grade: Some("3".into()),
        family_id: None,
    };
    let now = Utc
        .with_ymd_and_hms(2024, 5, 10, 12, 0, 0)
        .single()
        .expect("fixed instant");
    let profiles = planner.build_child_profiles_at(&[child], &[], now);
    let profile = &profiles[0];

    assert_eq!(profile.age, Some(8));
    assert_eq!(profile.age_buckets, vec!["all", "6-12"]);
    assert_eq!(profile.recommendations.len(), 1);
    // Grade match and short duration lift the bird count above the walk.
    assert_eq!(profile.recommendations[0].id, "bird-count");

    let plan = &profile.weekly_plan;
    assert_eq!(plan.days[0].label, "Lun");
    assert_eq!(plan.days[6].label, "Dim");
    assert_eq!(
        plan.filled_days()
            .map(|(_, activity)| activity.id.as_str())
            .collect::<Vec<_>>(),
        vec!["bird-count", "nature-walk"]
    );
}
