use chrono::NaiveDate;
use lunch_matching::{Group, Person};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee as far as matching is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
}

impl From<&Profile> for Person {
    fn from(profile: &Profile) -> Self {
        Person {
            id: profile.id.to_string(),
            department: profile.department.clone(),
            name: Some(profile.name.clone()),
        }
    }
}

/// Lifecycle of a lunch request.
///
/// ```text
/// Pending → Matched
///    ↓ ↑________| (reset when a date is re-run)
/// Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for the day's run.
    Pending,
    /// Seated at a committed group.
    Matched,
    /// Withdrawn by the requester; never matched.
    Cancelled,
}

/// One employee's request to be matched on `request_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub request_date: NaiveDate,
    pub status: RequestStatus,
    pub profile: Profile,
}

/// A committed lunch table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    pub id: Uuid,
    pub match_date: NaiveDate,
    /// 1-based position in the day's assignment.
    pub group_number: u32,
    pub members: Vec<Uuid>,
}

/// Outcome of a successful run for one date.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub date: NaiveDate,
    pub total_requests: usize,
    pub groups_created: usize,
    pub quality: f64,
    pub groups: Vec<Group>,
}
