//! Daily lunch grouping.
//!
//! Takes the people who asked for a lunch match on a given day and seats
//! them at tables of three to four, mixing departments as much as the
//! population allows.

pub mod error;
pub mod quality;
pub mod redistribute;
pub mod sizing;
pub mod strategy;
pub mod types;
pub mod validate;

use rand::RngCore;

pub use error::{AssignmentViolation, Error, Result};
pub use quality::{diversity_score, matching_quality};
pub use strategy::{DepartmentMixStrategy, GroupingStrategy, RandomChunkStrategy};
pub use types::{Group, GroupSizeConfig, Person};
pub use validate::validate_assignment;

/// Seat `requesters` at department-mixed tables using `rng` for shuffling.
pub fn assign(requesters: &[Person], config: &GroupSizeConfig, rng: &mut dyn RngCore) -> Vec<Group> {
    DepartmentMixStrategy.assign(requesters, config, rng)
}

/// [`assign`] with the thread-local generator.
pub fn assign_random(requesters: &[Person], config: &GroupSizeConfig) -> Vec<Group> {
    assign(requesters, config, &mut rand::thread_rng())
}
