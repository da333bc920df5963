//! CoursePilot CLI — the main entry point.
//!
//! Commands:
//! - `onboard`   — Write a default config
//! - `status`    — Show configuration and catalog status
//! - `config`    — Validate, show, or locate the config file
//! - `check`     — Parse and evaluate a requisite expression
//! - `eligible`  — Remaining and currently eligible courses
//! - `schedule`  — Solve a schedule from a sections file
//! - `plan`      — Eligibility, sections and schedules in one go

use clap::{Parser, Subcommand};

mod commands;

use commands::{PlanTarget, PreferenceArgs};

#[derive(Parser)]
#[command(
    name = "coursepilot",
    about = "CoursePilot — degree eligibility and schedule planning",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config directory and a default config.toml
    Onboard,

    /// Show configuration and catalog status
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Parse a requisite expression and optionally evaluate it
    Check {
        /// Expression, e.g. "COP2210,MAC1105|MAC1140"
        expression: String,

        /// Completed courses, comma separated
        #[arg(short, long)]
        completed: Option<String>,

        /// Reject empty groups, empty options and malformed codes
        #[arg(long)]
        strict: bool,
    },

    /// List remaining and currently eligible courses
    Eligible {
        #[command(flatten)]
        target: PlanTarget,
    },

    /// Build schedules from a JSON file of sections
    Schedule {
        /// Path to a JSON array of sections
        #[arg(short, long)]
        sections: std::path::PathBuf,

        #[command(flatten)]
        preferences: PreferenceArgs,
    },

    /// Resolve eligibility, fetch sections and build schedules
    Plan {
        #[command(flatten)]
        target: PlanTarget,

        /// Term to schedule (defaults to config)
        #[arg(short, long)]
        term: Option<String>,

        /// Campus filter; repeat for several (defaults to config)
        #[arg(long = "campus")]
        campuses: Vec<String>,

        /// Search every campus
        #[arg(long, conflicts_with = "campuses")]
        any_campus: bool,

        #[command(flatten)]
        preferences: PreferenceArgs,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate the config file
    Validate,
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
        Commands::Check {
            expression,
            completed,
            strict,
        } => commands::check::run(&expression, completed.as_deref(), strict, cli.json)?,
        Commands::Eligible { target } => commands::eligible::run(target, cli.json).await?,
        Commands::Schedule {
            sections,
            preferences,
        } => commands::schedule::run(&sections, preferences, cli.json).await?,
        Commands::Plan {
            target,
            term,
            campuses,
            any_campus,
            preferences,
        } => {
            commands::plan::run(
                target,
                commands::plan::Scope {
                    term,
                    campuses,
                    any_campus,
                },
                preferences,
                cli.json,
            )
            .await?
        }
    }

    Ok(())
}
