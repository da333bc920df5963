//! `coursepilot status` — Show configuration and catalog status.

use coursepilot_catalog::build_from_config;
use coursepilot_config::AppConfig;

use super::load_config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    println!("🎓 CoursePilot Status");
    println!("====================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Catalog:       {}", config.catalog.source);
    if let Some(path) = &config.catalog.path {
        println!("  Snapshot:      {}", path.display());
    }
    println!("  Service URL:   {}", config.catalog.base_url);
    println!("  Empty groups:  {:?}", config.requisites.empty_groups);
    println!("  Concurrency:   {}", config.eligibility.fetch_concurrency);
    println!("  Credits:       {}", config.solver.credits_target);
    println!("  Max plans:     {}", config.solver.max_plans);
    println!("  Term:          {}", config.defaults.term);
    println!("  Campuses:      {}", config.defaults.campuses.join(", "));

    match build_from_config(&config) {
        Ok(catalog) => println!("\n  ✅ Catalog ready ({})", catalog.describe()),
        Err(e) => println!("\n  ❌ Catalog unavailable: {e}"),
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — run `coursepilot onboard` first");
    }

    Ok(())
}
