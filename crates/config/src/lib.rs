//! Configuration loading, validation, and management for CoursePilot.
//!
//! Loads configuration from `~/.coursepilot/config.toml` with environment
//! variable overrides. Validates all settings at startup. The resulting
//! [`AppConfig`] is passed explicitly into provider constructors; nothing
//! reads the environment after loading.

use coursepilot_core::plan::{Preferences, TimeOfDay, MAX_PLANS};
use coursepilot_core::requisite::EmptyGroupPolicy;
use coursepilot_core::section::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.coursepilot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where course, major, section and profile records come from
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Requisite parsing behaviour
    #[serde(default)]
    pub requisites: RequisiteConfig,

    /// Eligibility resolution settings
    #[serde(default)]
    pub eligibility: EligibilityConfig,

    /// Default solver preferences
    #[serde(default)]
    pub solver: SolverConfig,

    /// Default term and campuses for section lookups
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Which catalog implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// Bundled sample catalog
    #[default]
    Sample,
    /// JSON snapshot file at `catalog.path`
    File,
    /// Record service at `catalog.base_url`
    Http,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CatalogSource::Sample => "sample",
            CatalogSource::File => "file",
            CatalogSource::Http => "http",
        })
    }
}

impl std::str::FromStr for CatalogSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(CatalogSource::Sample),
            "file" => Ok(CatalogSource::File),
            "http" => Ok(CatalogSource::Http),
            other => Err(ConfigError::ValidationError(format!(
                "unknown catalog source '{other}' (expected sample, file or http)"
            ))),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,

    /// Snapshot file for `source = "file"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Record service base URL for `source = "http"`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional bearer token for the record service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::default(),
            path: None,
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("source", &self.source)
            .field("path", &self.path)
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequisiteConfig {
    /// `"drop"` ignores empty AND-groups, `"unsatisfiable"` makes them fail
    #[serde(default)]
    pub empty_groups: EmptyGroupPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Maximum concurrent course lookups during one resolution pass
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Bucket id used when a major only lists required courses
    #[serde(default = "default_bucket_id")]
    pub default_bucket_id: String,

    /// `choose` value for that synthesized bucket
    #[serde(default = "default_bucket_choose")]
    pub default_bucket_choose: u32,

    /// Short names mapped to catalog major ids (e.g. "CS" → "COMPSC:BS")
    #[serde(default = "default_major_aliases")]
    pub major_aliases: BTreeMap<String, String>,
}

fn default_fetch_concurrency() -> usize {
    8
}
fn default_bucket_id() -> String {
    "core".into()
}
fn default_bucket_choose() -> u32 {
    2
}
fn default_major_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("CS".to_string(), "COMPSC:BS".to_string())])
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
            default_bucket_id: default_bucket_id(),
            default_bucket_choose: default_bucket_choose(),
            major_aliases: default_major_aliases(),
        }
    }
}

impl EligibilityConfig {
    /// Map a user-facing major name to its catalog id. Alias keys match
    /// case-insensitively; unknown names pass through unchanged.
    pub fn resolve_major(&self, major: &str) -> String {
        let trimmed = major.trim();
        self.major_aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
            .map(|(_, id)| id.clone())
            .unwrap_or_else(|| trimmed.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_credits_target")]
    pub credits_target: u32,

    #[serde(default = "default_max_plans")]
    pub max_plans: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,

    #[serde(default)]
    pub days_to_avoid: BTreeSet<Weekday>,
}

fn default_credits_target() -> u32 {
    coursepilot_core::plan::DEFAULT_CREDITS_TARGET
}
fn default_max_plans() -> usize {
    MAX_PLANS
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            credits_target: default_credits_target(),
            max_plans: default_max_plans(),
            time_of_day: None,
            days_to_avoid: BTreeSet::new(),
        }
    }
}

impl SolverConfig {
    /// The configured defaults as solver preferences.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            credits_target: self.credits_target,
            time_of_day: self.time_of_day,
            days_to_avoid: self.days_to_avoid.clone(),
            max_plans: self.max_plans,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_term")]
    pub term: String,

    #[serde(default = "default_campuses")]
    pub campuses: Vec<String>,
}

fn default_term() -> String {
    "2026 Spring".into()
}
fn default_campuses() -> Vec<String> {
    vec!["MMC".into(), "Online".into()]
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            term: default_term(),
            campuses: default_campuses(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.coursepilot/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `COURSEPILOT_CATALOG` — catalog source (`sample`, `file`, `http`)
    /// - `COURSEPILOT_CATALOG_PATH` — snapshot file path
    /// - `COURSEPILOT_API_BASE` — record service base URL
    /// - `COURSEPILOT_API_KEY` — record service token
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(source) = std::env::var("COURSEPILOT_CATALOG") {
            config.catalog.source = source.parse()?;
        }
        if let Ok(path) = std::env::var("COURSEPILOT_CATALOG_PATH") {
            config.catalog.path = Some(PathBuf::from(path));
        }
        if let Ok(base) = std::env::var("COURSEPILOT_API_BASE") {
            config.catalog.base_url = base;
        }
        if config.catalog.api_key.is_none() {
            config.catalog.api_key = std::env::var("COURSEPILOT_API_KEY").ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".coursepilot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eligibility.fetch_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "eligibility.fetch_concurrency must be at least 1".into(),
            ));
        }

        if self.solver.max_plans == 0 || self.solver.max_plans > MAX_PLANS {
            return Err(ConfigError::ValidationError(format!(
                "solver.max_plans must be between 1 and {MAX_PLANS}"
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "catalog.timeout_secs must be > 0".into(),
            ));
        }

        match self.catalog.source {
            CatalogSource::File if self.catalog.path.is_none() => {
                return Err(ConfigError::ValidationError(
                    "catalog.path is required when catalog.source = \"file\"".into(),
                ));
            }
            CatalogSource::Http
                if !(self.catalog.base_url.starts_with("http://")
                    || self.catalog.base_url.starts_with("https://")) =>
            {
                return Err(ConfigError::ValidationError(format!(
                    "catalog.base_url must be an http(s) URL, got '{}'",
                    self.catalog.base_url
                )));
            }
            _ => {}
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog.source, CatalogSource::Sample);
        assert_eq!(config.solver.credits_target, 9);
        assert_eq!(config.eligibility.default_bucket_choose, 2);
        assert_eq!(config.requisites.empty_groups, EmptyGroupPolicy::Drop);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.catalog.base_url, config.catalog.base_url);
        assert_eq!(parsed.defaults.campuses, config.defaults.campuses);
        assert_eq!(parsed.eligibility.major_aliases, config.eligibility.major_aliases);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().defaults.term, "2026 Spring");
    }

    #[test]
    fn file_source_requires_path() {
        let mut config = AppConfig::default();
        config.catalog.source = CatalogSource::File;
        assert!(config.validate().is_err());
        config.catalog.path = Some(PathBuf::from("/tmp/catalog.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn http_source_requires_url() {
        let mut config = AppConfig::default();
        config.catalog.source = CatalogSource::Http;
        config.catalog.base_url = "ftp://catalog".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_max_plans_rejected() {
        let mut config = AppConfig::default();
        config.solver.max_plans = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[catalog]
source = "http"
base_url = "https://registrar.example.edu/api"
api_key = "secret-token"

[requisites]
empty_groups = "unsatisfiable"

[solver]
credits_target = 12
time_of_day = "Morning"
days_to_avoid = ["Fri"]

[eligibility.major_aliases]
EE = "ELECENG:BS"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.catalog.source, CatalogSource::Http);
        assert_eq!(config.requisites.empty_groups, EmptyGroupPolicy::Unsatisfiable);
        assert_eq!(config.eligibility.resolve_major("ee"), "ELECENG:BS");
        assert_eq!(config.eligibility.resolve_major("COMPSC:BS"), "COMPSC:BS");

        let prefs = config.solver.preferences();
        assert_eq!(prefs.credits_target, 12);
        assert!(prefs.prefers_morning());
        assert!(prefs.days_to_avoid.contains(&Weekday::Fri));
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.catalog.api_key = Some("super-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_aliases_map_cs() {
        let config = AppConfig::default();
        assert_eq!(config.eligibility.resolve_major("cs"), "COMPSC:BS");
        assert_eq!(config.eligibility.resolve_major(" MATH:BS "), "MATH:BS");
    }

    #[test]
    fn catalog_source_parsing() {
        assert_eq!("HTTP".parse::<CatalogSource>().unwrap(), CatalogSource::Http);
        assert!("mongo".parse::<CatalogSource>().is_err());
        let json = serde_json::to_string(&CatalogSource::File).unwrap();
        assert_eq!(json, "\"file\"");
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("sample"));
        assert!(toml_str.contains("2026 Spring"));
    }
}
