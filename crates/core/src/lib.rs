//! # CoursePilot Core
//!
//! Domain types, traits, and error definitions for the CoursePilot degree
//! planner. This crate has **no I/O** — it defines the domain model that the
//! catalog providers and the engine implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator (course catalog, section catalog, profiles) is defined
//! as a trait here. Implementations live in `coursepilot-catalog`. This enables:
//! - Swapping an in-memory fixture for a networked record service
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod code;
pub mod requisite;
pub mod course;
pub mod section;
pub mod plan;
pub mod diagnostic;
pub mod catalog;

// Re-export key types at crate root for ergonomics
pub use error::{CatalogError, Error, RequisiteError, ResolutionError, Result, SectionError};
pub use code::CourseCode;
pub use requisite::{EmptyGroupPolicy, RequisiteExpression};
pub use course::{Bucket, CourseRecord, RequirementTemplate, UserProfile, DEFAULT_CREDITS};
pub use section::{Section, Weekday, parse_days, parse_time_of_day};
pub use plan::{Plan, Preferences, TimeOfDay};
pub use diagnostic::{DegradeReason, Diagnostic};
pub use catalog::{CourseCatalogProvider, ProfileProvider, SectionBatch, SectionCatalogProvider};
