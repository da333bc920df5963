//! Greedy section scheduling.
//!
//! Sections are walked in `(start, course)` order and accepted whenever they
//! do not overlap anything already accepted, until the credit target is
//! reached. Alternatives come from re-running the walk with the first
//! accepted section of each earlier plan left out.

use coursepilot_core::{CourseCode, Diagnostic, Plan, Preferences, Section, SectionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Plans plus the sections refused before scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub plans: Vec<Plan>,
    pub rejected: Vec<Diagnostic>,
}

/// Deterministic greedy schedule builder. Holds no per-call state.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSolver {
    known_courses: Option<BTreeSet<CourseCode>>,
}

impl ScheduleSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject sections whose course is not in `known`.
    pub fn with_known_courses(mut self, known: impl IntoIterator<Item = CourseCode>) -> Self {
        self.known_courses = Some(known.into_iter().collect());
        self
    }

    /// Build 1 to `prefs.plan_limit()` conflict-free plans, best first.
    pub fn solve(&self, sections: &[Section], prefs: &Preferences) -> Vec<Plan> {
        self.solve_report(sections, prefs).plans
    }

    /// Like [`solve`](Self::solve), also returning rejected sections.
    pub fn solve_report(&self, sections: &[Section], prefs: &Preferences) -> SolveReport {
        let (accepted, rejected) = self.ingest(sections);

        let mut pool: Vec<&Section> = accepted
            .into_iter()
            .filter(|s| !s.meets_on_any(&prefs.days_to_avoid))
            .collect();
        pool.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.course.cmp(&b.course)));

        if pool.is_empty() {
            debug!("No schedulable sections");
            return SolveReport {
                plans: vec![Plan::default()],
                rejected,
            };
        }

        let limit = prefs.plan_limit();
        let mut excluded = BTreeSet::new();
        let mut plans: Vec<Plan> = Vec::with_capacity(limit);

        for round in 0..limit {
            let (plan, first) = greedy(&pool, &excluded, prefs);
            let Some(first) = first else {
                debug!(round, "Pool exhausted, no further alternatives");
                break;
            };
            if plans.contains(&plan) {
                debug!(round, "Duplicate plan dropped");
            } else {
                plans.push(plan);
            }
            excluded.insert(first);
        }

        // Stable: equal plans keep generation order.
        plans.sort_by(|a, b| {
            b.credits
                .cmp(&a.credits)
                .then_with(|| b.score.cmp(&a.score))
        });

        info!(
            pool = pool.len(),
            plans = plans.len(),
            rejected = rejected.len(),
            best_credits = plans.first().map(|p| p.credits).unwrap_or(0),
            "Schedule solved"
        );

        SolveReport { plans, rejected }
    }

    /// Split input into valid sections and rejection diagnostics.
    fn ingest<'a>(&self, sections: &'a [Section]) -> (Vec<&'a Section>, Vec<Diagnostic>) {
        let mut accepted = Vec::with_capacity(sections.len());
        let mut rejected = Vec::new();

        for section in sections {
            match self.check(section) {
                Ok(()) => accepted.push(section),
                Err(e) => {
                    warn!(crn = %section.crn, course = %section.course, error = %e, "Section rejected");
                    rejected.push(Diagnostic::RejectedSection {
                        crn: section.crn.clone(),
                        course: section.course.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        (accepted, rejected)
    }

    fn check(&self, section: &Section) -> Result<(), SectionError> {
        section.validate()?;
        if let Some(known) = &self.known_courses {
            if !known.contains(&section.course) {
                return Err(SectionError::UnknownCourse {
                    crn: section.crn.clone(),
                    course: section.course.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// One greedy pass over the sorted pool, skipping `excluded` indices.
/// Returns the plan and the pool index of its first accepted section.
fn greedy(
    pool: &[&Section],
    excluded: &BTreeSet<usize>,
    prefs: &Preferences,
) -> (Plan, Option<usize>) {
    let mut plan = Plan::default();
    let mut first = None;

    for (idx, section) in pool.iter().enumerate() {
        if excluded.contains(&idx) {
            continue;
        }
        if plan.sections.iter().any(|taken| taken.overlaps(section)) {
            continue;
        }

        first.get_or_insert(idx);
        plan.credits = plan.credits.saturating_add(section.credits);
        if prefs.prefers_morning() && section.starts_before_noon() {
            plan.score += 1;
        }
        plan.sections.push((*section).clone());

        if plan.credits >= prefs.credits_target {
            break;
        }
    }

    (plan, first)
}
