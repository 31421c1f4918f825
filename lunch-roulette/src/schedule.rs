use std::sync::Arc;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::roster::RequestSource;
use crate::runner::MatchRunner;
use crate::store::MatchStore;

const DEFAULT_DEADLINE_HOUR: u32 = 11;
const KST_SECONDS: i32 = 9 * 3600;

/// When requests close each day, in the office's local time.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    pub deadline_hour: u32,
    pub utc_offset: FixedOffset,
}

impl DailySchedule {
    pub fn new(deadline_hour: u32, utc_offset: FixedOffset) -> Result<Self> {
        if deadline_hour > 23 {
            return Err(Error::Config(format!(
                "deadline hour {deadline_hour} is not an hour of the day"
            )));
        }
        Ok(Self {
            deadline_hour,
            utc_offset,
        })
    }

    /// The office's calendar date at `now`.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }

    /// Requests for `date` are still accepted at `now`.
    pub fn accepts(&self, date: NaiveDate, now: DateTime<Utc>) -> bool {
        now < self.deadline_on(date)
    }

    /// The deadline for `date`, as a UTC instant.
    pub fn deadline_on(&self, date: NaiveDate) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(self.deadline_hour, 0, 0).unwrap_or_default();
        let local = date.and_time(time);
        (local - self.utc_offset).and_utc()
    }

    /// The first deadline strictly after `now` and the date it belongs to.
    pub fn next_deadline(&self, now: DateTime<Utc>) -> (NaiveDate, DateTime<Utc>) {
        let today = self.local_date(now);
        let deadline = self.deadline_on(today);
        if now < deadline {
            return (today, deadline);
        }
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        (tomorrow, self.deadline_on(tomorrow))
    }
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            deadline_hour: DEFAULT_DEADLINE_HOUR,
            utc_offset: FixedOffset::east_opt(KST_SECONDS).unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// Run the matching once per day at the deadline until `cancel` fires.
///
/// Before waiting on a date's deadline, the requesters `source` lists for it
/// are submitted. `clock` tells the time, so tests can drive the loop. Each
/// date is run at most once by this loop. Skips (too few requesters) and
/// failures are logged; the loop keeps going either way.
pub async fn run_daily<S, C>(
    runner: Arc<MatchRunner<S>>,
    source: Arc<dyn RequestSource>,
    clock: C,
    cancel: CancellationToken,
) -> Result<()>
where
    S: MatchStore + 'static,
    C: Fn() -> DateTime<Utc> + Send + Sync,
{
    let schedule = runner.config().schedule;
    let mut last_run: Option<NaiveDate> = None;

    loop {
        let now = clock();
        let (date, deadline) = schedule.next_deadline(now);
        if last_run != Some(date) {
            admit(&runner, source.as_ref(), date, now).await;
        }

        let wait = (deadline - now).to_std().unwrap_or_default();
        tracing::info!(date = %date, deadline = %deadline, "waiting for matching deadline");

        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = tokio::time::sleep(wait) => {}
        }

        if last_run == Some(date) {
            tracing::debug!(date = %date, "already matched this date");
            continue;
        }
        last_run = Some(date);

        match runner.run(date).await {
            Ok(report) => tracing::info!(
                date = %date,
                groups = report.groups_created,
                requesters = report.total_requests,
                "daily matching finished"
            ),
            Err(e) if e.is_skip() => tracing::info!(date = %date, reason = %e, "daily matching skipped"),
            Err(e) => tracing::error!(date = %date, error = %e, "daily matching failed"),
        }
    }
}

async fn admit<S: MatchStore>(
    runner: &MatchRunner<S>,
    source: &dyn RequestSource,
    date: NaiveDate,
    now: DateTime<Utc>,
) {
    let profiles = match source.requesters(date).await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!(date = %date, error = %e, "failed to load requesters");
            return;
        }
    };

    let mut admitted = 0;
    for profile in profiles {
        match runner.request(profile, date, now).await {
            Ok(_) => admitted += 1,
            Err(e) => tracing::warn!(date = %date, error = %e, "request not admitted"),
        }
    }
    tracing::info!(date = %date, requesters = admitted, "requests admitted");
}
