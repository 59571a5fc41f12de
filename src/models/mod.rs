pub mod activity;
pub mod child;
pub mod plan;
pub mod profile;
pub mod settings;
