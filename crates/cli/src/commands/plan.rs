//! `coursepilot plan` — Eligibility, sections and schedules in one call.

use coursepilot_config::AppConfig;
use coursepilot_engine::PlanRequest;

use super::{
    PlanTarget, PreferenceArgs, build_planner, load_config, parse_codes, print_json, render,
};

/// Term and campus overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub term: Option<String>,
    pub campuses: Vec<String>,
    pub any_campus: bool,
}

/// The request for this invocation: config defaults with overrides applied.
pub fn build_request(
    config: &AppConfig,
    scope: Scope,
    preferences: &PreferenceArgs,
) -> Result<PlanRequest, Box<dyn std::error::Error>> {
    let mut request = PlanRequest::from_config(config);
    if let Some(term) = scope.term {
        request.term = term;
    }
    if scope.any_campus {
        request.campuses.clear();
    } else if !scope.campuses.is_empty() {
        request = request.with_campuses(scope.campuses);
    }
    let prefs = preferences.apply(request.preferences.clone())?;
    Ok(request.with_preferences(prefs))
}

pub async fn run(
    target: PlanTarget,
    scope: Scope,
    preferences: PreferenceArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let planner = build_planner(&config)?;
    let request = build_request(&config, scope, &preferences)?;

    let report = match (&target.user, &target.major) {
        (Some(user), _) => planner.plan_for_user(user, &request).await?,
        (None, Some(major)) => {
            let completed = target
                .completed
                .as_deref()
                .map(parse_codes)
                .unwrap_or_default();
            planner.plan_for_major(major, &completed, &request).await?
        }
        (None, None) => return Err("either --user or --major is required".into()),
    };

    if json {
        return print_json(&report);
    }

    render::eligibility(&report.eligibility);
    println!(
        "\n  Term {} — {} section(s) considered",
        request.term, report.sections_considered
    );
    render::plans(&report.plans);
    // Eligibility warnings were already printed above.
    let section_diagnostics = &report.diagnostics[report.eligibility.warnings.len()..];
    render::diagnostics(section_diagnostics);
    Ok(())
}
