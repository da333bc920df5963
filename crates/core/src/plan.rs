//! Scheduling preferences and the plans produced from them.

use crate::section::{Section, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default credit load the solver aims for.
pub const DEFAULT_CREDITS_TARGET: u32 = 9;

/// Upper bound on the number of alternative plans returned.
pub const MAX_PLANS: usize = 3;

/// Preferred part of the day. Only `Morning` affects scoring;
/// any unrecognised value deserialises to `Any`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    #[default]
    #[serde(other)]
    Any,
}

/// Soft and hard constraints for one solve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_credits_target", alias = "creditTarget")]
    pub credits_target: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,

    #[serde(default)]
    pub days_to_avoid: BTreeSet<Weekday>,

    #[serde(default = "default_max_plans")]
    pub max_plans: usize,
}

fn default_credits_target() -> u32 {
    DEFAULT_CREDITS_TARGET
}

fn default_max_plans() -> usize {
    MAX_PLANS
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            credits_target: DEFAULT_CREDITS_TARGET,
            time_of_day: None,
            days_to_avoid: BTreeSet::new(),
            max_plans: MAX_PLANS,
        }
    }
}

impl Preferences {
    pub fn prefers_morning(&self) -> bool {
        self.time_of_day == Some(TimeOfDay::Morning)
    }

    /// `max_plans` clamped to `1..=MAX_PLANS`.
    pub fn plan_limit(&self) -> usize {
        self.max_plans.clamp(1, MAX_PLANS)
    }
}

/// A conflict-free selection of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub sections: Vec<Section>,
    pub credits: u32,
    pub score: u32,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn crns(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.crn.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_defaults() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.credits_target, 9);
        assert_eq!(prefs.max_plans, 3);
        assert!(!prefs.prefers_morning());
        assert!(prefs.days_to_avoid.is_empty());
    }

    #[test]
    fn preferences_accept_wire_names() {
        let prefs: Preferences = serde_json::from_str(
            r#"{"creditsTarget": 12, "timeOfDay": "Morning", "daysToAvoid": ["Tue", "Thu"]}"#,
        )
        .unwrap();
        assert_eq!(prefs.credits_target, 12);
        assert!(prefs.prefers_morning());
        assert!(prefs.days_to_avoid.contains(&Weekday::Thu));

        let alias: Preferences = serde_json::from_str(r#"{"creditTarget": 6}"#).unwrap();
        assert_eq!(alias.credits_target, 6);
    }

    #[test]
    fn unknown_time_of_day_scores_nothing() {
        let prefs: Preferences = serde_json::from_str(r#"{"timeOfDay": "Evening"}"#).unwrap();
        assert_eq!(prefs.time_of_day, Some(TimeOfDay::Any));
        assert!(!prefs.prefers_morning());
    }

    #[test]
    fn plan_limit_is_clamped() {
        let mut prefs = Preferences::default();
        prefs.max_plans = 0;
        assert_eq!(prefs.plan_limit(), 1);
        prefs.max_plans = 10;
        assert_eq!(prefs.plan_limit(), 3);
    }
}
