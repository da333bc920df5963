//! `coursepilot eligible` — Remaining and currently eligible courses.

use super::{PlanTarget, build_planner, load_config, parse_codes, print_json, render};

pub async fn run(target: PlanTarget, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let planner = build_planner(&config)?;

    let result = match (&target.user, &target.major) {
        (Some(user), _) => planner.eligibility_for_user(user).await?,
        (None, Some(major)) => {
            let completed = target
                .completed
                .as_deref()
                .map(parse_codes)
                .unwrap_or_default();
            planner.eligibility_for_major(major, &completed).await?
        }
        (None, None) => return Err("either --user or --major is required".into()),
    };

    if json {
        print_json(&result)
    } else {
        render::eligibility(&result);
        Ok(())
    }
}
