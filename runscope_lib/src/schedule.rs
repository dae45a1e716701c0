//! Schedules: the recurring interval at which a test is triggered against
//! one of its environments.

use serde::{Deserialize, Serialize};

use crate::client::{endpoint, require, Client};
use crate::error::{Error, Result};

/// Intervals accepted by the service.
pub const VALID_INTERVALS: [&str; 7] = ["1m", "5m", "15m", "30m", "1h", "6h", "1d"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
}

impl Schedule {
    pub fn new(environment_id: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            environment_id: Some(environment_id.into()),
            interval: Some(interval.into()),
            ..Self::default()
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Check the fields the service requires before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.environment_id.as_deref().unwrap_or("").trim().is_empty() {
            return Err(Error::Validation(
                "environment_id must not be empty for a schedule".to_string(),
            ));
        }
        let interval = self.interval.as_deref().unwrap_or("").trim();
        if interval.is_empty() {
            return Err(Error::Validation(
                "interval must not be empty for a schedule".to_string(),
            ));
        }
        if !VALID_INTERVALS.contains(&interval) {
            return Err(Error::Validation(format!(
                "Invalid interval {:?}. Must be one of: {}",
                interval,
                VALID_INTERVALS.join(", ")
            )));
        }
        Ok(())
    }
}

fn schedules_path(bucket_key: &str, test_id: &str) -> Result<String> {
    require(bucket_key, "bucket key")?;
    require(test_id, "test id")?;
    Ok(endpoint(&["buckets", bucket_key, "tests", test_id, "schedules"]))
}

fn schedule_path(bucket_key: &str, test_id: &str, schedule_id: &str) -> Result<String> {
    require(schedule_id, "schedule id")?;
    Ok(format!(
        "{}/{}",
        schedules_path(bucket_key, test_id)?,
        endpoint(&[schedule_id])
    ))
}

impl Client {
    pub async fn list_schedules(&self, bucket_key: &str, test_id: &str) -> Result<Vec<Schedule>> {
        self.get(&schedules_path(bucket_key, test_id)?).await
    }

    pub async fn get_schedule(
        &self,
        bucket_key: &str,
        test_id: &str,
        schedule_id: &str,
    ) -> Result<Schedule> {
        self.get(&schedule_path(bucket_key, test_id, schedule_id)?)
            .await
    }

    /// Create a schedule. Fails locally when the environment or interval is missing.
    pub async fn create_schedule(
        &self,
        bucket_key: &str,
        test_id: &str,
        schedule: &Schedule,
    ) -> Result<Schedule> {
        schedule.validate()?;
        self.post(&schedules_path(bucket_key, test_id)?, schedule)
            .await
    }

    pub async fn update_schedule(
        &self,
        bucket_key: &str,
        test_id: &str,
        schedule_id: &str,
        schedule: &Schedule,
    ) -> Result<Schedule> {
        schedule.validate()?;
        self.put(&schedule_path(bucket_key, test_id, schedule_id)?, schedule)
            .await
    }

    pub async fn delete_schedule(
        &self,
        bucket_key: &str,
        test_id: &str,
        schedule_id: &str,
    ) -> Result<()> {
        self.delete(&schedule_path(bucket_key, test_id, schedule_id)?)
            .await
    }
}
