//! `coursepilot config` — Configuration management commands.

use coursepilot_config::{AppConfig, CatalogSource};

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Catalog:   {}", config.catalog.source);
            println!("   Term:      {}", config.defaults.term);
            println!("   Campuses:  {}", config.defaults.campuses.join(", "));
            println!("   Aliases:   {}", config.eligibility.major_aliases.len());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Non-fatal findings about a config that passed validation.
fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.catalog.source == CatalogSource::File {
        if let Some(path) = &config.catalog.path {
            if !path.exists() {
                warnings.push(format!("Snapshot file {} does not exist", path.display()));
            }
        }
    }

    if config.catalog.source == CatalogSource::Http && config.catalog.api_key.is_none() {
        warnings.push(
            "No record service token set (set COURSEPILOT_API_KEY if the service needs one)"
                .to_string(),
        );
    }

    if config.defaults.term.trim().is_empty() {
        warnings.push("defaults.term is empty; section lookups will match nothing".to_string());
    }

    if config.defaults.campuses.is_empty() {
        warnings.push("defaults.campuses is empty; every campus will be searched".to_string());
    }

    if config.solver.credits_target == 0 {
        warnings.push("solver.credits_target is 0; plans stop after one section".to_string());
    }

    warnings
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.catalog.api_key.is_some() {
        config.catalog.api_key = Some("[REDACTED]".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_valid() {
        let path = AppConfig::config_dir().join("config.toml");
        assert!(path.to_str().unwrap().contains("config.toml"));
    }

    #[test]
    fn default_config_has_no_warnings() {
        assert!(warnings(&AppConfig::default()).is_empty());
    }

    #[test]
    fn http_without_token_warns() {
        let mut config = AppConfig::default();
        config.catalog.source = CatalogSource::Http;
        let found = warnings(&config);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("COURSEPILOT_API_KEY"));
    }

    #[test]
    fn missing_snapshot_warns() {
        let mut config = AppConfig::default();
        config.catalog.source = CatalogSource::File;
        config.catalog.path = Some("/nonexistent/catalog.json".into());
        assert!(warnings(&config)[0].contains("does not exist"));
    }
}
