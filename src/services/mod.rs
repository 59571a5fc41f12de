pub mod calendar_export;
pub mod catalog_service;
pub mod date_utils;
pub mod eligibility;
pub mod planner_service;
pub mod profile_service;
pub mod recommendation_service;
pub mod settings_service;
pub mod streak_service;
pub mod weekly_plan_service;
