//! Environments: named variable/configuration contexts a test runs under.
//!
//! An environment is either attached to one test or shared by every test in
//! a bucket. Both kinds use the same record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::{endpoint, require, Client};
use crate::envelope::nullable;
use crate::error::Result;
use crate::integration::Integration;
use crate::team::Person;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_environment_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub preserve_cookies: bool,
    #[serde(deserialize_with = "nullable")]
    pub regions: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub remote_agents: Vec<RemoteAgent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Set for test environments, absent for shared ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub verify_ssl: bool,
    #[serde(deserialize_with = "nullable")]
    pub webhooks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Email>,
    #[serde(deserialize_with = "nullable")]
    pub initial_variables: BTreeMap<String, String>,
    #[serde(deserialize_with = "nullable")]
    pub integrations: Vec<Integration>,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            verify_ssl: true,
            ..Self::default()
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.initial_variables.insert(name.into(), value.into());
        self
    }

    pub fn is_shared(&self) -> bool {
        self.test_id.as_deref().unwrap_or("").is_empty()
    }
}

/// Email notification settings for an environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Email {
    #[serde(deserialize_with = "nullable")]
    pub notify_all: bool,
    /// `all`, `failures`, `threshold` or `switch`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_threshold: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub recipients: Vec<Person>,
}

/// An on-premises agent that can execute tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteAgent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

fn test_environments_path(bucket_key: &str, test_id: &str) -> Result<String> {
    require(bucket_key, "bucket key")?;
    require(test_id, "test id")?;
    Ok(endpoint(&["buckets", bucket_key, "tests", test_id, "environments"]))
}

fn test_environment_path(bucket_key: &str, test_id: &str, environment_id: &str) -> Result<String> {
    require(environment_id, "environment id")?;
    Ok(format!(
        "{}/{}",
        test_environments_path(bucket_key, test_id)?,
        endpoint(&[environment_id])
    ))
}

fn shared_environments_path(bucket_key: &str) -> Result<String> {
    require(bucket_key, "bucket key")?;
    Ok(endpoint(&["buckets", bucket_key, "environments"]))
}

fn shared_environment_path(bucket_key: &str, environment_id: &str) -> Result<String> {
    require(environment_id, "environment id")?;
    Ok(format!(
        "{}/{}",
        shared_environments_path(bucket_key)?,
        endpoint(&[environment_id])
    ))
}

impl Client {
    /// List environments attached to a test.
    pub async fn list_test_environments(
        &self,
        bucket_key: &str,
        test_id: &str,
    ) -> Result<Vec<Environment>> {
        self.get(&test_environments_path(bucket_key, test_id)?).await
    }

    /// List environments shared across a bucket.
    pub async fn list_shared_environments(&self, bucket_key: &str) -> Result<Vec<Environment>> {
        self.get(&shared_environments_path(bucket_key)?).await
    }

    pub async fn get_test_environment(
        &self,
        bucket_key: &str,
        test_id: &str,
        environment_id: &str,
    ) -> Result<Environment> {
        self.get(&test_environment_path(bucket_key, test_id, environment_id)?)
            .await
    }

    pub async fn get_shared_environment(
        &self,
        bucket_key: &str,
        environment_id: &str,
    ) -> Result<Environment> {
        self.get(&shared_environment_path(bucket_key, environment_id)?)
            .await
    }

    pub async fn create_test_environment(
        &self,
        bucket_key: &str,
        test_id: &str,
        environment: &Environment,
    ) -> Result<Environment> {
        self.post(&test_environments_path(bucket_key, test_id)?, environment)
            .await
    }

    pub async fn create_shared_environment(
        &self,
        bucket_key: &str,
        environment: &Environment,
    ) -> Result<Environment> {
        self.post(&shared_environments_path(bucket_key)?, environment)
            .await
    }

    pub async fn update_test_environment(
        &self,
        bucket_key: &str,
        test_id: &str,
        environment_id: &str,
        environment: &Environment,
    ) -> Result<Environment> {
        self.put(
            &test_environment_path(bucket_key, test_id, environment_id)?,
            environment,
        )
        .await
    }

    pub async fn update_shared_environment(
        &self,
        bucket_key: &str,
        environment_id: &str,
        environment: &Environment,
    ) -> Result<Environment> {
        self.put(&shared_environment_path(bucket_key, environment_id)?, environment)
            .await
    }

    /// Remove an environment attached to a test.
    pub async fn delete_test_environment(
        &self,
        bucket_key: &str,
        test_id: &str,
        environment_id: &str,
    ) -> Result<()> {
        self.delete(&test_environment_path(bucket_key, test_id, environment_id)?)
            .await
    }

    /// Remove a shared environment from a bucket.
    pub async fn delete_environment(&self, bucket_key: &str, environment_id: &str) -> Result<()> {
        self.delete(&shared_environment_path(bucket_key, environment_id)?)
            .await
    }
}
