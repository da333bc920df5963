//! CoursePilot engine: eligibility resolution, greedy scheduling, and the
//! planner that chains them over the catalog traits.

pub mod eligibility;
pub mod planner;
pub mod solver;

pub use eligibility::{BucketProgress, EligibilityResolver, EligibilityResult, RemainingCourse};
pub use planner::{PlanReport, PlanRequest, Planner};
pub use solver::{ScheduleSolver, SolveReport};
