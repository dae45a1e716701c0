//! Test results: the recorded outcome of one test run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{endpoint, require, with_query, Client};
use crate::envelope::nullable;
use crate::error::Result;
use crate::helpers::epoch_to_datetime;
use crate::step::{Assertion, Script, Variable};

/// Identifier accepted by the results endpoint in place of a run id.
pub const LATEST: &str = "latest";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_run_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Remote agent that ran the test, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// `pass`, `fail`, `working`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub requests_executed: u32,
    #[serde(deserialize_with = "nullable")]
    pub assertions_defined: u32,
    #[serde(deserialize_with = "nullable")]
    pub assertions_passed: u32,
    #[serde(deserialize_with = "nullable")]
    pub assertions_failed: u32,
    #[serde(deserialize_with = "nullable")]
    pub scripts_defined: u32,
    #[serde(deserialize_with = "nullable")]
    pub scripts_passed: u32,
    #[serde(deserialize_with = "nullable")]
    pub scripts_failed: u32,
    #[serde(deserialize_with = "nullable")]
    pub variables_defined: u32,
    #[serde(deserialize_with = "nullable")]
    pub variables_passed: u32,
    #[serde(deserialize_with = "nullable")]
    pub variables_failed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<RequestResult>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.result.as_deref() == Some("pass")
    }

    pub fn started(&self) -> Option<DateTime<Utc>> {
        self.started_at.and_then(epoch_to_datetime)
    }

    pub fn finished(&self) -> Option<DateTime<Utc>> {
        self.finished_at.and_then(epoch_to_datetime)
    }
}

/// Outcome of one request made during a test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub assertions_defined: u32,
    #[serde(deserialize_with = "nullable")]
    pub assertions_passed: u32,
    #[serde(deserialize_with = "nullable")]
    pub assertions_failed: u32,
    #[serde(deserialize_with = "nullable")]
    pub scripts_defined: u32,
    #[serde(deserialize_with = "nullable")]
    pub scripts_passed: u32,
    #[serde(deserialize_with = "nullable")]
    pub scripts_failed: u32,
    #[serde(deserialize_with = "nullable")]
    pub variables_defined: u32,
    #[serde(deserialize_with = "nullable")]
    pub variables_passed: u32,
    #[serde(deserialize_with = "nullable")]
    pub variables_failed: u32,
    #[serde(deserialize_with = "nullable")]
    pub assertions: Vec<Assertion>,
    #[serde(deserialize_with = "nullable")]
    pub scripts: Vec<Script>,
    #[serde(deserialize_with = "nullable")]
    pub variables: Vec<Variable>,
}

/// Filters for [`Client::list_results`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListResultsOptions {
    /// Number of results to return.
    pub count: Option<u32>,
    /// Only runs started after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Only runs started before this instant.
    pub before: Option<DateTime<Utc>>,
}

impl ListResultsOptions {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(c) = self.count {
            params.push(("count", c.to_string()));
        }
        if let Some(s) = self.since {
            params.push(("since", s.timestamp().to_string()));
        }
        if let Some(b) = self.before {
            params.push(("before", b.timestamp().to_string()));
        }
        params
    }
}

fn results_path(bucket_key: &str, test_id: &str) -> Result<String> {
    require(bucket_key, "bucket key")?;
    require(test_id, "test id")?;
    Ok(endpoint(&["buckets", bucket_key, "tests", test_id, "results"]))
}

impl Client {
    /// List recent results of a test.
    pub async fn list_results(
        &self,
        bucket_key: &str,
        test_id: &str,
        options: &ListResultsOptions,
    ) -> Result<Vec<TestResult>> {
        let path = with_query(results_path(bucket_key, test_id)?, &options.query());
        self.get(&path).await
    }

    /// Detailed result of one run, including per-request outcomes.
    pub async fn get_result(
        &self,
        bucket_key: &str,
        test_id: &str,
        test_run_id: &str,
    ) -> Result<TestResult> {
        require(test_run_id, "test run id")?;
        let path = format!(
            "{}/{}",
            results_path(bucket_key, test_id)?,
            endpoint(&[test_run_id])
        );
        self.get(&path).await
    }

    /// Last known result of a test.
    pub async fn get_latest_result(&self, bucket_key: &str, test_id: &str) -> Result<TestResult> {
        self.get_result(bucket_key, test_id, LATEST).await
    }
}
