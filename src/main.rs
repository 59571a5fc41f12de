use std::path::PathBuf;
use std::process::ExitCode;

use edu_planner_lib::error::{AppError, AppResult};
use edu_planner_lib::models::child::PlanningSnapshot;
use edu_planner_lib::services::calendar_export::ExportOptions;
use edu_planner_lib::services::planner_service::{self, PlannerService};
use edu_planner_lib::services::settings_service::SettingsService;
use edu_planner_lib::utils::logger;
use serde_json::json;

const CONFIG_ENV: &str = "EDU_PLANNER_CONFIG";
const USAGE: &str = "usage: edu-planner <snapshot.json> [child-id [organizer-email]]";

fn main() -> ExitCode {
    match try_run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("edu-planner: {error}");
            ExitCode::FAILURE
        }
    }
}

fn try_run() -> AppResult<()> {
    let mut args = std::env::args().skip(1);
    let snapshot_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| AppError::validation(USAGE))?;
    let child_id = args.next();
    let organizer_email = args.next();

    let settings = SettingsService::new(std::env::var_os(CONFIG_ENV).map(PathBuf::from)).get()?;
    logger::init_logging(&settings)?;

    let planner = PlannerService::from_settings(settings)?;
    let snapshot: PlanningSnapshot =
        serde_json::from_str(&std::fs::read_to_string(&snapshot_path)?)?;
    let profiles = planner.build_child_profiles(&snapshot.children, &snapshot.completions);

    match child_id {
        Some(child_id) => {
            let profile = planner_service::find_profile(&profiles, &child_id)?;
            let options = ExportOptions { organizer_email };
            print!(
                "{}",
                planner.generate_weekly_plan_export(profile, &profile.weekly_plan, &options)
            );
        }
        None => {
            let report = json!({
                "profiles": profiles,
                "recommendations": planner.family_recommendations(&profiles),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
