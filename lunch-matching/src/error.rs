use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid group size bounds: min {min}, max {max} (need 1 <= min <= max)")]
    InvalidGroupSize { min: usize, max: usize },
}

/// A way in which an assignment fails to be a valid partition of its
/// requesters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentViolation {
    #[error("requester {0} is missing from the assignment")]
    Missing(String),

    #[error("requester {0} appears more than once")]
    Duplicated(String),

    #[error("person {0} was not among the requesters")]
    Unknown(String),

    #[error("group {index} is empty")]
    EmptyGroup { index: usize },

    #[error("expected a single group for {population} requesters, got {groups}")]
    ExpectedSingleGroup { population: usize, groups: usize },

    #[error("group {index} has {size} members, below the minimum of {min}")]
    GroupTooSmall { index: usize, size: usize, min: usize },

    #[error("group {index} has {size} members, above the maximum of {max}")]
    GroupTooLarge { index: usize, size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
