#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use lunch_roulette::error::{Error, Result};
use lunch_roulette::runner::{MatchRunner, RunnerConfig};
use lunch_roulette::store::{MatchStore, MemoryStore};
use lunch_roulette::types::{MatchGroup, MatchRequest, Profile};

pub const SEED: u64 = 20260302;

pub fn match_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Wall clock that starts at `start` and follows tokio's (pausable) clock.
pub fn tokio_clock(start: DateTime<Utc>) -> impl Fn() -> DateTime<Utc> + Send + Sync + 'static {
    let origin = tokio::time::Instant::now();
    move || start + chrono::Duration::from_std(origin.elapsed()).unwrap()
}

pub fn profile(name: &str, department: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        name: name.to_string(),
        department: Some(department.to_string()),
    }
}

/// `count` employees spread over three departments in turn.
pub fn staff(count: usize) -> Vec<Profile> {
    const DEPARTMENTS: [&str; 3] = ["planning", "technology", "applications"];
    (0..count)
        .map(|i| profile(&format!("employee-{i}"), DEPARTMENTS[i % DEPARTMENTS.len()]))
        .collect()
}

pub async fn submit_all(store: &MemoryStore, profiles: &[Profile]) {
    for profile in profiles {
        store
            .submit_request(profile.clone(), match_date())
            .await
            .unwrap();
    }
}

pub fn runner<S: MatchStore>(store: Arc<S>) -> MatchRunner<S> {
    MatchRunner::new(store, RunnerConfig::default()).with_seed(SEED)
}

/// Wraps a [`MemoryStore`] and refuses to commit the listed group numbers.
pub struct FlakyStore {
    inner: MemoryStore,
    failing: HashSet<u32>,
}

impl FlakyStore {
    pub fn new(failing: impl IntoIterator<Item = u32>) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: failing.into_iter().collect(),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl MatchStore for FlakyStore {
    async fn submit_request(&self, profile: Profile, date: NaiveDate) -> Result<MatchRequest> {
        self.inner.submit_request(profile, date).await
    }

    async fn cancel_request(&self, user_id: Uuid, date: NaiveDate) -> Result<MatchRequest> {
        self.inner.cancel_request(user_id, date).await
    }

    async fn active_requesters(&self, date: NaiveDate) -> Result<Vec<Profile>> {
        self.inner.active_requesters(date).await
    }

    async fn pending_requesters(&self, date: NaiveDate) -> Result<Vec<Profile>> {
        self.inner.pending_requesters(date).await
    }

    async fn clear_groups(&self, date: NaiveDate) -> Result<usize> {
        self.inner.clear_groups(date).await
    }

    async fn commit_group(
        &self,
        date: NaiveDate,
        group_number: u32,
        members: &[Uuid],
    ) -> Result<MatchGroup> {
        if self.failing.contains(&group_number) {
            return Err(Error::store(format!("write for group {group_number} timed out")));
        }
        self.inner.commit_group(date, group_number, members).await
    }
}
