use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::stats::{summarize, ParticipationStats};
use crate::types::{MatchGroup, MatchRequest, Profile, RequestStatus};

/// Where requests and committed groups live.
///
/// `commit_group` is the unit of atomicity: either the group, its members and
/// their `Matched` status are all written, or none of them are.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Record a request for `date`. A user holds at most one active request
    /// per day; asking again returns the existing one.
    async fn submit_request(&self, profile: Profile, date: NaiveDate) -> Result<MatchRequest>;

    /// Withdraw a pending request. Matched requests cannot be cancelled.
    async fn cancel_request(&self, user_id: Uuid, date: NaiveDate) -> Result<MatchRequest>;

    /// Profiles with a non-cancelled request for `date`.
    async fn active_requesters(&self, date: NaiveDate) -> Result<Vec<Profile>>;

    /// Profiles whose request for `date` is still pending.
    async fn pending_requesters(&self, date: NaiveDate) -> Result<Vec<Profile>>;

    /// Delete every group for `date` and put matched requests back to pending.
    /// Returns the number of groups removed.
    async fn clear_groups(&self, date: NaiveDate) -> Result<usize>;

    /// Create one group and mark its members matched.
    async fn commit_group(
        &self,
        date: NaiveDate,
        group_number: u32,
        members: &[Uuid],
    ) -> Result<MatchGroup>;
}

#[derive(Default)]
struct Tables {
    requests: Vec<MatchRequest>,
    groups: Vec<MatchGroup>,
}

/// In-process store, used by the binary and by tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests_for(&self, date: NaiveDate) -> Vec<MatchRequest> {
        let tables = self.tables.lock().await;
        tables
            .requests
            .iter()
            .filter(|r| r.request_date == date)
            .cloned()
            .collect()
    }

    pub async fn groups_for(&self, date: NaiveDate) -> Vec<MatchGroup> {
        let tables = self.tables.lock().await;
        let mut groups: Vec<MatchGroup> = tables
            .groups
            .iter()
            .filter(|g| g.match_date == date)
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.group_number);
        groups
    }

    /// Participation over `from..=to`, from the committed groups.
    pub async fn stats(&self, from: NaiveDate, to: NaiveDate) -> ParticipationStats {
        let tables = self.tables.lock().await;
        let profiles: HashMap<Uuid, Profile> = tables
            .requests
            .iter()
            .map(|r| (r.user_id, r.profile.clone()))
            .collect();
        summarize(from, to, &tables.groups, &profiles)
    }

    async fn requesters_with(
        &self,
        date: NaiveDate,
        keep: impl Fn(RequestStatus) -> bool + Send,
    ) -> Vec<Profile> {
        let tables = self.tables.lock().await;
        tables
            .requests
            .iter()
            .filter(|r| r.request_date == date && keep(r.status))
            .map(|r| r.profile.clone())
            .collect()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn submit_request(&self, profile: Profile, date: NaiveDate) -> Result<MatchRequest> {
        let mut tables = self.tables.lock().await;

        if let Some(existing) = tables.requests.iter().find(|r| {
            r.user_id == profile.id
                && r.request_date == date
                && r.status != RequestStatus::Cancelled
        }) {
            return Ok(existing.clone());
        }

        let request = MatchRequest {
            id: Uuid::new_v4(),
            user_id: profile.id,
            request_date: date,
            status: RequestStatus::Pending,
            profile,
        };
        tables.requests.push(request.clone());
        Ok(request)
    }

    async fn cancel_request(&self, user_id: Uuid, date: NaiveDate) -> Result<MatchRequest> {
        let mut tables = self.tables.lock().await;
        let request = tables
            .requests
            .iter_mut()
            .find(|r| {
                r.user_id == user_id
                    && r.request_date == date
                    && r.status == RequestStatus::Pending
            })
            .ok_or_else(|| Error::UnknownRequester(user_id.to_string()))?;

        request.status = RequestStatus::Cancelled;
        Ok(request.clone())
    }

    async fn active_requesters(&self, date: NaiveDate) -> Result<Vec<Profile>> {
        Ok(self
            .requesters_with(date, |status| status != RequestStatus::Cancelled)
            .await)
    }

    async fn pending_requesters(&self, date: NaiveDate) -> Result<Vec<Profile>> {
        Ok(self
            .requesters_with(date, |status| status == RequestStatus::Pending)
            .await)
    }

    async fn clear_groups(&self, date: NaiveDate) -> Result<usize> {
        let mut tables = self.tables.lock().await;

        let before = tables.groups.len();
        tables.groups.retain(|g| g.match_date != date);
        let removed = before - tables.groups.len();

        for request in tables
            .requests
            .iter_mut()
            .filter(|r| r.request_date == date && r.status == RequestStatus::Matched)
        {
            request.status = RequestStatus::Pending;
        }

        Ok(removed)
    }

    async fn commit_group(
        &self,
        date: NaiveDate,
        group_number: u32,
        members: &[Uuid],
    ) -> Result<MatchGroup> {
        let mut tables = self.tables.lock().await;

        if tables
            .groups
            .iter()
            .any(|g| g.match_date == date && g.group_number == group_number)
        {
            return Err(Error::store(format!(
                "group {group_number} already exists for {date}"
            )));
        }

        // Check every member before writing anything.
        let wanted: HashSet<&Uuid> = members.iter().collect();
        let pending: HashSet<&Uuid> = tables
            .requests
            .iter()
            .filter(|r| r.request_date == date && r.status == RequestStatus::Pending)
            .map(|r| &r.user_id)
            .collect();
        if let Some(missing) = members.iter().find(|id| !pending.contains(id)) {
            return Err(Error::UnknownRequester(missing.to_string()));
        }
        if wanted.len() != members.len() {
            return Err(Error::store(format!(
                "group {group_number} lists a member twice"
            )));
        }

        for request in tables
            .requests
            .iter_mut()
            .filter(|r| r.request_date == date && wanted.contains(&r.user_id))
        {
            if request.status == RequestStatus::Pending {
                request.status = RequestStatus::Matched;
            }
        }

        let group = MatchGroup {
            id: Uuid::new_v4(),
            match_date: date,
            group_number,
            members: members.to_vec(),
        };
        tables.groups.push(group.clone());
        Ok(group)
    }
}
