//! Tests: ordered HTTP request steps with assertions, run under environments
//! on schedules.

use serde::{Deserialize, Serialize};

use crate::client::{endpoint, require, with_query, Client};
use crate::envelope::nullable;
use crate::environment::Environment;
use crate::error::Result;
use crate::schedule::Schedule;
use crate::step::Step;
use crate::team::Person;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Test {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Person>,
    /// Epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<i64>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<Environment>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub schedules: Vec<Schedule>,
}

impl Test {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Paging for [`Client::list_tests`]. Unset fields use the service defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListTestsOptions {
    pub count: Option<u32>,
    pub offset: Option<u32>,
}

impl ListTestsOptions {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(c) = self.count {
            params.push(("count", c.to_string()));
        }
        if let Some(o) = self.offset {
            params.push(("offset", o.to_string()));
        }
        params
    }
}

fn tests_path(bucket_key: &str) -> Result<String> {
    require(bucket_key, "bucket key")?;
    Ok(endpoint(&["buckets", bucket_key, "tests"]))
}

fn test_path(bucket_key: &str, test_id: &str) -> Result<String> {
    require(test_id, "test id")?;
    Ok(format!("{}/{}", tests_path(bucket_key)?, endpoint(&[test_id])))
}

impl Client {
    /// List tests in a bucket.
    pub async fn list_tests(
        &self,
        bucket_key: &str,
        options: &ListTestsOptions,
    ) -> Result<Vec<Test>> {
        let path = with_query(tests_path(bucket_key)?, &options.query());
        self.get(&path).await
    }

    /// Fetch a test with its steps, environments, and schedules.
    pub async fn get_test(&self, bucket_key: &str, test_id: &str) -> Result<Test> {
        self.get(&test_path(bucket_key, test_id)?).await
    }

    pub async fn create_test(&self, bucket_key: &str, test: &Test) -> Result<Test> {
        require(test.name.as_deref().unwrap_or(""), "test name")?;
        self.post(&tests_path(bucket_key)?, test).await
    }

    pub async fn update_test(&self, bucket_key: &str, test_id: &str, test: &Test) -> Result<Test> {
        self.put(&test_path(bucket_key, test_id)?, test).await
    }

    pub async fn delete_test(&self, bucket_key: &str, test_id: &str) -> Result<()> {
        self.delete(&test_path(bucket_key, test_id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_options_query() {
        assert!(ListTestsOptions::default().query().is_empty());
        let opts = ListTestsOptions {
            count: Some(50),
            offset: Some(100),
        };
        assert_eq!(
            with_query(tests_path("b").unwrap(), &opts.query()),
            "buckets/b/tests?count=50&offset=100"
        );
    }

    #[test]
    fn new_test_serializes_only_set_fields() {
        let v = serde_json::to_value(Test::new("Sample Test").description("A new sample test")).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"name": "Sample Test", "description": "A new sample test"})
        );
    }

    #[test]
    fn null_description_and_last_run_decode() {
        let t: Test = serde_json::from_str(
            r#"{"name":"x","description":null,"last_run":null,"schedules":[],"steps":null}"#,
        )
        .unwrap();
        assert!(t.description.is_none());
        assert!(t.last_run.is_none());
        assert!(t.steps.is_empty());
    }
}
