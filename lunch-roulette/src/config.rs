use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use envconfig::Envconfig;
use lunch_matching::{DepartmentMixStrategy, GroupSizeConfig, GroupingStrategy, RandomChunkStrategy};

use crate::error::{Error, Result};

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    // ── Grouping ────────────────────────────────────────────────────
    #[envconfig(default = "3")]
    pub min_group_size: usize,

    #[envconfig(default = "4")]
    pub max_group_size: usize,

    /// Runs with fewer active requesters than this are skipped.
    #[envconfig(default = "3")]
    pub min_requesters: usize,

    /// `department_mix`, or `random` to ignore departments.
    #[envconfig(default = "department_mix")]
    pub strategy: String,

    // ── Schedule ────────────────────────────────────────────────────
    /// Local hour at which requests close and the daily run fires.
    #[envconfig(default = "11")]
    pub deadline_hour: u32,

    /// Offset of the office's local time from UTC (KST by default).
    #[envconfig(default = "540")]
    pub utc_offset_minutes: i32,

    // ── Binary ──────────────────────────────────────────────────────
    #[envconfig(default = "requests.json")]
    pub requests_path: String,

    /// `once` runs the matching immediately, `daily` waits for each deadline.
    #[envconfig(default = "once")]
    pub mode: String,

    /// Date to match in `once` mode, `YYYY-MM-DD`. Defaults to today's local date.
    pub match_date: Option<String>,
}

impl Config {
    pub fn init_with_defaults() -> std::result::Result<Self, envconfig::Error> {
        Config::init_from_env()
    }

    pub fn group_size(&self) -> Result<GroupSizeConfig> {
        Ok(GroupSizeConfig::new(
            self.min_group_size,
            self.max_group_size,
        )?)
    }

    pub fn grouping_strategy(&self) -> Result<Arc<dyn GroupingStrategy>> {
        let strategy: Arc<dyn GroupingStrategy> = match self.strategy.as_str() {
            "department_mix" => Arc::new(DepartmentMixStrategy),
            "random" => Arc::new(RandomChunkStrategy),
            other => {
                return Err(Error::Config(format!(
                    "unknown STRATEGY {other}, expected department_mix or random"
                )))
            }
        };
        Ok(strategy)
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::Config(format!(
                "utc offset of {} minutes is out of range",
                self.utc_offset_minutes
            ))
        })
    }

    pub fn parsed_match_date(&self) -> Result<Option<NaiveDate>> {
        self.match_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| Error::Config(format!("invalid MATCH_DATE {raw}: {e}")))
            })
            .transpose()
    }
}
