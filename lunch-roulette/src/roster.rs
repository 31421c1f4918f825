use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::types::Profile;

/// Who wants lunch on a given day, fed to the daily loop ahead of each
/// deadline.
#[async_trait]
pub trait RequestSource: Send + Sync {
    async fn requesters(&self, date: NaiveDate) -> Result<Vec<Profile>>;
}

/// A standing list: everyone on it asks for lunch every day.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    profiles: Vec<Profile>,
}

impl Roster {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl RequestSource for Roster {
    async fn requesters(&self, _date: NaiveDate) -> Result<Vec<Profile>> {
        Ok(self.profiles.clone())
    }
}
