//! `coursepilot schedule` — Solve a schedule from a JSON file of sections.
//!
//! The file is a JSON array in the record service's section format.

use coursepilot_catalog::wire::section_from_value;
use coursepilot_engine::{ScheduleSolver, SolveReport};
use std::path::Path;
use tracing::warn;

use super::{PreferenceArgs, load_config, print_json, render};

pub async fn run(
    path: &Path,
    preferences: PreferenceArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let prefs = preferences.apply(config.solver.preferences())?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let report = solve_document(&content, &prefs)?;

    if json {
        return print_json(&report);
    }

    render::plans(&report.plans);
    render::diagnostics(&report.rejected);
    Ok(())
}

/// Parse a sections document and solve it. Sections that fail to parse are
/// reported alongside the solver's own rejections.
pub fn solve_document(
    content: &str,
    prefs: &coursepilot_core::Preferences,
) -> Result<SolveReport, Box<dyn std::error::Error>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(content).map_err(|e| format!("Expected a JSON array of sections: {e}"))?;

    let mut sections = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();
    for value in values {
        match section_from_value(value) {
            Ok(section) => sections.push(section),
            Err(diagnostic) => {
                warn!(%diagnostic, "Skipping section");
                rejected.push(diagnostic);
            }
        }
    }

    let mut report = ScheduleSolver::new().solve_report(&sections, prefs);
    rejected.append(&mut report.rejected);
    report.rejected = rejected;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursepilot_core::Preferences;

    #[test]
    fn document_with_bad_section() {
        let doc = r#"[
            {"course": "COP3337", "crn": "1", "days": "MW", "start": "10:00", "end": "11:15", "credits": 3},
            {"course": "COP3530", "crn": "2", "days": "MW", "start": "10:00", "end": "11:15", "credits": 3},
            {"course": "COT3100", "crn": "3", "days": "XYZ", "start": "10:00", "end": "11:15", "credits": 3}
        ]"#;
        let report = solve_document(doc, &Preferences::default()).unwrap();
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.plans[0].sections.len(), 1);
    }

    #[test]
    fn non_array_is_an_error() {
        assert!(solve_document("{}", &Preferences::default()).is_err());
    }
}
