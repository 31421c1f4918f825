use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not enough requesters for {date}: found {found}, need at least {required}")]
    InsufficientRequesters {
        date: NaiveDate,
        found: usize,
        required: usize,
    },

    #[error("committed {committed} of {total} groups for {date}; groups {failed:?} failed and their members stay pending")]
    PersistencePartialFailure {
        date: NaiveDate,
        committed: usize,
        total: usize,
        failed: Vec<u32>,
    },

    #[error("a run for {date} is already in progress")]
    RunInProgress { date: NaiveDate },

    #[error("requests for {date} closed at the deadline")]
    RequestsClosed { date: NaiveDate },

    #[error("requester {0} has no active request")]
    UnknownRequester(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Matching(#[from] lunch_matching::Error),

    #[error("assignment rejected: {0}")]
    InvalidAssignment(#[from] lunch_matching::AssignmentViolation),
}

impl Error {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Whether the run was skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::InsufficientRequesters { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
