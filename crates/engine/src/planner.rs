//! Planner — profile, eligibility and sections in one call.

use coursepilot_config::{AppConfig, EligibilityConfig};
use coursepilot_core::catalog::{CourseCatalogProvider, ProfileProvider, SectionCatalogProvider};
use coursepilot_core::{CourseCode, Diagnostic, Plan, Preferences, ResolutionError, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::eligibility::{EligibilityResolver, EligibilityResult};
use crate::solver::ScheduleSolver;

/// Where and how to schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub term: String,
    /// Empty means any campus.
    #[serde(default)]
    pub campuses: BTreeSet<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl PlanRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            campuses: BTreeSet::new(),
            preferences: Preferences::default(),
        }
    }

    /// Term, campuses and solver preferences from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            term: config.defaults.term.clone(),
            campuses: config.defaults.campuses.iter().cloned().collect(),
            preferences: config.solver.preferences(),
        }
    }

    pub fn with_campuses(mut self, campuses: impl IntoIterator<Item = String>) -> Self {
        self.campuses = campuses.into_iter().collect();
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// Everything one planning call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub major_id: String,
    pub eligibility: EligibilityResult,
    /// Valid sections the catalog returned for the eligible courses.
    pub sections_considered: usize,
    pub plans: Vec<Plan>,
    /// Eligibility warnings followed by section rejections.
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Planner {
    resolver: EligibilityResolver,
    sections: Arc<dyn SectionCatalogProvider>,
    profiles: Arc<dyn ProfileProvider>,
    eligibility: EligibilityConfig,
}

impl Planner {
    pub fn new(
        courses: Arc<dyn CourseCatalogProvider>,
        sections: Arc<dyn SectionCatalogProvider>,
        profiles: Arc<dyn ProfileProvider>,
    ) -> Self {
        Self {
            resolver: EligibilityResolver::new(courses),
            sections,
            profiles,
            eligibility: EligibilityConfig::default(),
        }
    }

    pub fn from_config(
        courses: Arc<dyn CourseCatalogProvider>,
        sections: Arc<dyn SectionCatalogProvider>,
        profiles: Arc<dyn ProfileProvider>,
        config: &AppConfig,
    ) -> Self {
        Self {
            resolver: EligibilityResolver::from_config(courses, config),
            sections,
            profiles,
            eligibility: config.eligibility.clone(),
        }
    }

    pub fn resolver(&self) -> &EligibilityResolver {
        &self.resolver
    }

    /// Catalog major id for a user-facing major name.
    pub fn major_id(&self, major: &str) -> String {
        self.eligibility.resolve_major(major)
    }

    /// The stored profile for `user_id`.
    pub async fn profile(&self, user_id: &str) -> Result<UserProfile, ResolutionError> {
        self.profiles
            .get_user_profile(user_id)
            .await?
            .ok_or_else(|| ResolutionError::UnknownUser(user_id.trim().to_string()))
    }

    /// Eligibility for a major name (aliases applied).
    pub async fn eligibility_for_major(
        &self,
        major: &str,
        completed: &BTreeSet<CourseCode>,
    ) -> Result<EligibilityResult, ResolutionError> {
        let major_id = self.major_id(major);
        self.resolver.resolve(&major_id, completed).await
    }

    pub async fn eligibility_for_user(
        &self,
        user_id: &str,
    ) -> Result<EligibilityResult, ResolutionError> {
        let profile = self.profile(user_id).await?;
        let completed = profile.completed_courses.iter().cloned().collect();
        self.eligibility_for_major(&profile.major, &completed).await
    }

    /// Resolve eligibility for `major`, fetch sections for the eligible
    /// courses and schedule them.
    pub async fn plan_for_major(
        &self,
        major: &str,
        completed: &BTreeSet<CourseCode>,
        request: &PlanRequest,
    ) -> Result<PlanReport, ResolutionError> {
        let eligibility = self.eligibility_for_major(major, completed).await?;
        let wanted: BTreeSet<CourseCode> = eligibility.eligible_now.iter().cloned().collect();

        let batch = self
            .sections
            .get_sections(&request.term, &request.campuses, &wanted)
            .await?;
        debug!(
            term = %request.term,
            provider = self.sections.name(),
            sections = batch.sections.len(),
            "Sections fetched"
        );

        let report = ScheduleSolver::new()
            .with_known_courses(wanted)
            .solve_report(&batch.sections, &request.preferences);

        let mut diagnostics = eligibility.warnings.clone();
        diagnostics.extend(batch.rejected);
        diagnostics.extend(report.rejected);

        info!(
            major_id = %eligibility.major_id,
            eligible = eligibility.eligible_now.len(),
            plans = report.plans.len(),
            "Plan built"
        );

        Ok(PlanReport {
            major_id: eligibility.major_id.clone(),
            sections_considered: batch.sections.len(),
            eligibility,
            plans: report.plans,
            diagnostics,
        })
    }

    /// [`plan_for_major`](Self::plan_for_major) using the user's stored
    /// major and completed courses.
    pub async fn plan_for_user(
        &self,
        user_id: &str,
        request: &PlanRequest,
    ) -> Result<PlanReport, ResolutionError> {
        let profile = self.profile(user_id).await?;
        let completed = profile.completed_courses.iter().cloned().collect();
        self.plan_for_major(&profile.major, &completed, request).await
    }
}
