//! `coursepilot check` — Parse a requisite expression and evaluate it.

use coursepilot_config::{AppConfig, ConfigError};
use coursepilot_core::{CourseCode, EmptyGroupPolicy, RequisiteExpression};
use serde::Serialize;
use tracing::warn;

use super::{parse_codes, print_json};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    expression: String,
    groups: Vec<Vec<CourseCode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    satisfied: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unmet: Vec<Vec<CourseCode>>,
}

/// The configured policy, or the default when the config cannot be loaded.
/// Checking an expression needs nothing else from the config.
fn empty_group_policy(loaded: Result<AppConfig, ConfigError>) -> EmptyGroupPolicy {
    match loaded {
        Ok(config) => config.requisites.empty_groups,
        Err(e) => {
            warn!(error = %e, "Config unavailable, using the default empty-group policy");
            EmptyGroupPolicy::default()
        }
    }
}

pub fn run(
    expression: &str,
    completed: Option<&str>,
    strict: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = if strict {
        RequisiteExpression::parse_strict(expression)?
    } else {
        RequisiteExpression::parse_with(expression, empty_group_policy(AppConfig::load()))
    };

    let completed = completed.map(parse_codes);
    let output = CheckOutput {
        expression: parsed.to_string(),
        groups: parsed.groups().to_vec(),
        satisfied: completed.as_ref().map(|c| parsed.is_satisfied(c)),
        unmet: completed
            .as_ref()
            .map(|c| parsed.unmet(c))
            .unwrap_or_default(),
    };

    if json {
        return print_json(&output);
    }

    if parsed.is_empty() {
        println!("  Expression: (none) — always satisfied");
    } else {
        println!("  Expression: {}", output.expression);
        for (i, group) in parsed.groups().iter().enumerate() {
            let options: Vec<&str> = group.iter().map(CourseCode::as_str).collect();
            if options.is_empty() {
                println!("    group {}: (unsatisfiable)", i + 1);
            } else {
                println!("    group {}: {}", i + 1, options.join(" | "));
            }
        }
    }

    match output.satisfied {
        Some(true) => println!("  ✅ Satisfied"),
        Some(false) => {
            println!("  ❌ Not satisfied");
            for group in &output.unmet {
                let options: Vec<&str> = group.iter().map(CourseCode::as_str).collect();
                println!("     missing one of: {}", options.join(", "));
            }
        }
        None => {}
    }

    Ok(())
}
