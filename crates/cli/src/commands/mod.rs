//! Subcommand implementations and the argument groups they share.

pub mod check;
pub mod config_cmd;
pub mod eligible;
pub mod onboard;
pub mod plan;
pub mod render;
pub mod schedule;
pub mod status;

use clap::Args;
use coursepilot_catalog::build_from_config;
use coursepilot_config::AppConfig;
use coursepilot_core::{CourseCode, Preferences, SectionError, parse_days};
use coursepilot_engine::Planner;
use serde::Serialize;
use std::collections::BTreeSet;

/// Who to resolve for: a stored user, or a major plus completed courses.
#[derive(Args, Debug, Clone)]
pub struct PlanTarget {
    /// Stored user id
    #[arg(short, long, conflicts_with_all = ["major", "completed"])]
    pub user: Option<String>,

    /// Major name or catalog id (aliases such as "CS" are resolved)
    #[arg(short, long, required_unless_present = "user")]
    pub major: Option<String>,

    /// Completed courses, comma separated
    #[arg(short, long)]
    pub completed: Option<String>,
}

/// Solver preference overrides; unset values come from config.
#[derive(Args, Debug, Clone, Default)]
pub struct PreferenceArgs {
    /// Credit target
    #[arg(long)]
    pub credits: Option<u32>,

    /// Prefer sections starting before noon
    #[arg(long)]
    pub morning: bool,

    /// Days to avoid, e.g. "F", "MW" or "Fri,Sat"
    #[arg(long)]
    pub avoid: Option<String>,

    /// Number of alternative plans (1-3)
    #[arg(long)]
    pub max_plans: Option<usize>,
}

impl PreferenceArgs {
    /// Layer these overrides on top of `base`.
    pub fn apply(&self, mut base: Preferences) -> Result<Preferences, SectionError> {
        if let Some(credits) = self.credits {
            base.credits_target = credits;
        }
        if self.morning {
            base.time_of_day = Some(coursepilot_core::TimeOfDay::Morning);
        }
        if let Some(avoid) = &self.avoid {
            for token in avoid.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                base.days_to_avoid.extend(parse_days(token)?);
            }
        }
        if let Some(max_plans) = self.max_plans {
            base.max_plans = max_plans;
        }
        Ok(base)
    }
}

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Planner over the configured catalog.
pub fn build_planner(config: &AppConfig) -> Result<Planner, Box<dyn std::error::Error>> {
    let catalog = build_from_config(config)?;
    Ok(Planner::from_config(
        catalog.courses,
        catalog.sections,
        catalog.profiles,
        config,
    ))
}

/// Split a comma separated list of course codes.
pub fn parse_codes(list: &str) -> BTreeSet<CourseCode> {
    list.split(',')
        .map(CourseCode::new)
        .filter(|code| !code.is_empty())
        .collect()
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
