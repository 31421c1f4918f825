use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use lunch_matching::{
    matching_quality, validate_assignment, DepartmentMixStrategy, Group, GroupSizeConfig,
    GroupingStrategy, Person,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::schedule::DailySchedule;
use crate::store::MatchStore;
use crate::types::{MatchRequest, Profile, RunReport};

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub group_size: GroupSizeConfig,
    /// Fewer active requesters than this and the run is skipped.
    pub min_requesters: usize,
    /// Requests for a date are accepted until its deadline.
    pub schedule: DailySchedule,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            group_size: GroupSizeConfig::default(),
            min_requesters: 3,
            schedule: DailySchedule::default(),
        }
    }
}

/// Runs the matching for one date against a store: reset any previous
/// result, group the pending requesters, and commit each group on its own.
pub struct MatchRunner<S> {
    store: Arc<S>,
    config: RunnerConfig,
    strategy: Arc<dyn GroupingStrategy>,
    rng: Mutex<StdRng>,
    in_flight: Mutex<HashSet<NaiveDate>>,
}

impl<S: MatchStore> MatchRunner<S> {
    pub fn new(store: Arc<S>, config: RunnerConfig) -> Self {
        Self {
            store,
            config,
            strategy: Arc::new(DepartmentMixStrategy),
            rng: Mutex::new(StdRng::from_entropy()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn GroupingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Make shuffles reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Ask for a lunch match on `date`, as of `now`.
    ///
    /// Fails with [`Error::RequestsClosed`] once the date's deadline has
    /// passed.
    pub async fn request(
        &self,
        profile: Profile,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<MatchRequest> {
        self.ensure_open(date, now)?;
        self.store.submit_request(profile, date).await
    }

    /// Withdraw a pending request for `date`. Closes with requests.
    pub async fn cancel(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<MatchRequest> {
        self.ensure_open(date, now)?;
        self.store.cancel_request(user_id, date).await
    }

    fn ensure_open(&self, date: NaiveDate, now: DateTime<Utc>) -> Result<()> {
        if self.config.schedule.accepts(date, now) {
            return Ok(());
        }
        tracing::debug!(date = %date, now = %now, "requests already closed");
        Err(Error::RequestsClosed { date })
    }

    /// Match everyone who asked for lunch on `date`.
    ///
    /// Re-running a date first removes its groups and puts their members back
    /// to pending, so the result always replaces the previous one. A group
    /// that fails to commit leaves its members pending and the run returns
    /// [`Error::PersistencePartialFailure`].
    pub async fn run(&self, date: NaiveDate) -> Result<RunReport> {
        let _guard = InFlightGuard::acquire(&self.in_flight, date)?;

        let active = self.store.active_requesters(date).await?;
        if active.len() < self.config.min_requesters {
            tracing::info!(
                date = %date,
                found = active.len(),
                required = self.config.min_requesters,
                "not enough requesters, skipping run"
            );
            return Err(Error::InsufficientRequesters {
                date,
                found: active.len(),
                required: self.config.min_requesters,
            });
        }

        let cleared = self.store.clear_groups(date).await?;
        if cleared > 0 {
            tracing::info!(date = %date, groups = cleared, "cleared previous groups");
        }

        let pending = self.store.pending_requesters(date).await?;
        tracing::info!(date = %date, requesters = pending.len(), "starting lunch matching");

        let people: Vec<Person> = pending.iter().map(Person::from).collect();
        let groups = {
            let mut rng = lock(&self.rng);
            self.strategy
                .assign(&people, &self.config.group_size, &mut *rng)
        };
        validate_assignment(&people, &groups, &self.config.group_size)?;

        let ids = user_ids(&pending);
        let total = groups.len();
        let mut failed = Vec::new();

        for (group_number, group) in (1u32..).zip(groups.iter()) {
            let members = group
                .members()
                .iter()
                .map(|person| {
                    ids.get(person.id.as_str())
                        .copied()
                        .ok_or_else(|| Error::UnknownRequester(person.id.clone()))
                })
                .collect::<Result<Vec<Uuid>>>()?;

            match self.store.commit_group(date, group_number, &members).await {
                Ok(_) => tracing::info!(
                    date = %date,
                    group = group_number,
                    members = %member_names(group),
                    "group committed"
                ),
                Err(e) => {
                    tracing::error!(date = %date, group = group_number, error = %e, "failed to commit group");
                    failed.push(group_number);
                }
            }
        }

        if !failed.is_empty() {
            return Err(Error::PersistencePartialFailure {
                date,
                committed: total - failed.len(),
                total,
                failed,
            });
        }

        let quality = matching_quality(&groups);
        tracing::info!(date = %date, groups = total, quality, "lunch matching completed");

        Ok(RunReport {
            date,
            total_requests: pending.len(),
            groups_created: total,
            quality,
            groups,
        })
    }
}

/// Marks a date as being run; released on drop.
struct InFlightGuard<'a> {
    dates: &'a Mutex<HashSet<NaiveDate>>,
    date: NaiveDate,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(dates: &'a Mutex<HashSet<NaiveDate>>, date: NaiveDate) -> Result<Self> {
        if !lock(dates).insert(date) {
            tracing::warn!(date = %date, "run already in progress");
            return Err(Error::RunInProgress { date });
        }
        Ok(Self { dates, date })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.dates).remove(&self.date);
    }
}

// A poisoned lock only means another run panicked; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn user_ids(profiles: &[Profile]) -> HashMap<String, Uuid> {
    profiles
        .iter()
        .map(|profile| (profile.id.to_string(), profile.id))
        .collect()
}

fn member_names(group: &Group) -> String {
    group
        .members()
        .iter()
        .map(|p| p.name.as_deref().unwrap_or(p.id.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
