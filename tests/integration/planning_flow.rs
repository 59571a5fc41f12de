use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use edu_planner_lib::models::child::{Child, CompletionRecord, PlanningSnapshot};
use edu_planner_lib::models::plan::WeekDay;
use edu_planner_lib::services::planner_service::{self, PlannerService};

fn friday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0)
        .single()
        .expect("fixed instant")
}

fn child(id: &str, name: &str, birth_date: Option<&str>) -> Child {
    Child {
        id: id.into(),
        name: name.into(),
        birth_date: birth_date.map(str::to_string),
        grade: None,
        family_id: Some("family-1".into()),
    }
}

fn completion(child_id: &str, activity_id: &str, completed_at: &str) -> CompletionRecord {
    CompletionRecord {
        activity_id: activity_id.into(),
        child_id: child_id.into(),
        completed_at: completed_at.into(),
    }
}

fn ids<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    items.collect()
}

#[test]
fn family_snapshot_produces_profiles_plans_and_aggregate() {
    let planner = PlannerService::with_defaults();
    let children = vec![
        child("ada", "Ada", Some("2016-01-20")),
        child("leo", "Leo", Some("2020-03-01")),
    ];

    let profiles = planner.build_child_profiles_at(&children, &[], friday_noon());
    assert_eq!(profiles.len(), 2);

    let ada = &profiles[0];
    assert_eq!(ada.age, Some(8));
    assert_eq!(
        ids(ada.recommendations.iter().map(|activity| activity.id.as_str())),
        vec![
            "reading-comprehension",
            "history-geography",
            "math-workshop",
            "science-experiments",
        ]
    );

    let plan = &ada.weekly_plan;
    assert_eq!(plan.start_date, NaiveDate::from_ymd_opt(2024, 5, 13).expect("monday"));
    assert_eq!(plan.start_date.weekday(), Weekday::Mon);
    assert_eq!(plan.days.len(), 7);
    assert_eq!(plan.days[0].key, WeekDay::Monday);
    assert_eq!(plan.days[6].key, WeekDay::Sunday);
    assert_eq!(plan.days[6].date, NaiveDate::from_ymd_opt(2024, 5, 19).expect("sunday"));
    assert_eq!(plan.days[0].label, "Monday");
    // history-geography shares a skill with reading and only returns in the backfill.
    assert_eq!(
        ids(plan.filled_days().map(|(_, activity)| activity.id.as_str())),
        vec![
            "reading-comprehension",
            "math-workshop",
            "science-experiments",
            "history-geography",
        ]
    );
    assert!(plan.days[4..].iter().all(|day| day.activity.is_none()));

    let leo = &profiles[1];
    assert_eq!(leo.age, Some(4));
    assert_eq!(leo.age_buckets, vec!["all", "3-6"]);
    assert_eq!(leo.weekly_plan.filled_count(), 2);

    let aggregate = planner.family_recommendations(&profiles);
    assert_eq!(aggregate.len(), 5);
    assert_eq!(
        ids(aggregate.iter().map(|item| item.activity.id.as_str())),
        vec![
            "reading-comprehension",
            "creative-coloring",
            "history-geography",
            "letter-learning",
            "math-workshop",
        ]
    );
    assert_eq!(aggregate[0].score, 100);
    assert!(aggregate.iter().all(|item| item.audience_size == 1));
}

#[test]
fn shared_activities_accumulate_across_children() {
    let planner = PlannerService::with_defaults();
    let children = vec![
        child("ada", "Ada", Some("2016-01-20")),
        child("max", "Max", Some("2014-02-02")),
    ];
    let completions = vec![completion("max", "reading-comprehension", "2024-05-09T17:00:00Z")];

    let profiles = planner.build_child_profiles_at(&children, &completions, friday_noon());
    let max = planner_service::find_profile(&profiles, "max").expect("max profile");
    assert_eq!(max.age, Some(10));
    assert_eq!(max.metrics.current_streak, 1);
    assert_eq!(max.metrics.longest_streak, 1);
    assert_eq!(max.total_minutes, 25);
    assert_eq!(max.recommendations[0].id, "history-geography");
    assert_eq!(
        max.recommendations.last().map(|activity| activity.id.as_str()),
        Some("reading-comprehension")
    );
    // Completed activities are kept out of the first slots and used as backfill.
    assert_eq!(
        max.weekly_plan.days[3].activity.as_ref().map(|activity| activity.id.as_str()),
        Some("reading-comprehension")
    );

    let aggregate = planner.compile_global_recommendations(&profiles, 10);
    assert_eq!(
        aggregate
            .iter()
            .map(|item| (item.activity.id.as_str(), item.score, item.audience_size))
            .collect::<Vec<_>>(),
        vec![
            ("history-geography", 199, 2),
            ("reading-comprehension", 197, 2),
            ("math-workshop", 197, 2),
            ("science-experiments", 195, 2),
        ]
    );

    let truncated = planner.compile_global_recommendations(&profiles, 1);
    assert_eq!(truncated.len(), 1);
    assert_eq!(truncated[0].activity.id, "history-geography");
}

#[test]
fn snapshot_json_drives_the_same_flow() {
    let raw = r#"{
        "children": [
            { "id": "ada", "name": "Ada", "birth_date": "2016-01-20" },
            { "id": "nobody", "name": "No birthday" }
        ],
        "completions": [
            { "activity_id": "math-workshop", "child_id": "ada", "completed_at": "2024-05-08" },
            { "activity_id": "science-experiments", "child_id": "ada", "completed_at": "2024-05-09T08:00:00Z" },
            { "activity_id": "reading-comprehension", "child_id": "ada", "completed_at": "2024-05-10 07:30:00" },
            { "activity_id": "reading-comprehension", "child_id": "ada", "completed_at": "not a date" }
        ]
    }"#;
    let snapshot: PlanningSnapshot = serde_json::from_str(raw).expect("snapshot json");

    let planner = PlannerService::with_defaults();
    let profiles =
        planner.build_child_profiles_at(&snapshot.children, &snapshot.completions, friday_noon());

    let ada = &profiles[0];
    assert_eq!(ada.total_completions, 4);
    assert_eq!(ada.metrics.current_streak, 3);
    assert_eq!(ada.metrics.longest_streak, 3);
    assert_eq!(
        ada.metrics.last_completed_date,
        NaiveDate::from_ymd_opt(2024, 5, 10)
    );
    assert_eq!(ada.completed_activity_ids.len(), 3);

    let nobody = &profiles[1];
    assert_eq!(nobody.age, None);
    assert_eq!(nobody.age_buckets, vec!["all"]);
    assert_eq!(nobody.total_completions, 0);
    assert_eq!(nobody.metrics.current_streak, 0);

    let json = serde_json::to_value(&profiles).expect("profiles serialize");
    assert_eq!(json[0]["weeklyPlan"]["startDate"], "2024-05-13");
    assert_eq!(json[0]["metrics"]["currentStreak"], 3);
}
