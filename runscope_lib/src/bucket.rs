//! Buckets: named containers grouping related tests.

use serde::{Deserialize, Serialize};

use crate::client::{endpoint, require, Client};
use crate::error::{Error, Result};
use crate::team::Team;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bucket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(deserialize_with = "crate::envelope::nullable")]
    pub default: bool,
    #[serde(deserialize_with = "crate::envelope::nullable")]
    pub verify_ssl: bool,
    #[serde(deserialize_with = "crate::envelope::nullable")]
    pub team: Team,
}

/// Payload for `POST /buckets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBucketRequest {
    pub name: String,
    pub team_uuid: String,
}

impl Client {
    /// List all buckets visible to the token.
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        self.get("buckets").await
    }

    pub async fn get_bucket(&self, key: &str) -> Result<Bucket> {
        require(key, "bucket key")?;
        self.get(&endpoint(&["buckets", key])).await
    }

    /// Create a bucket owned by `team`.
    pub async fn create_bucket(&self, name: &str, team: &Team) -> Result<Bucket> {
        require(name, "bucket name")?;
        let team_uuid = team
            .uuid
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                Error::Validation("team UUID must not be empty when creating a bucket".to_string())
            })?;
        let data = NewBucketRequest {
            name: name.to_string(),
            team_uuid: team_uuid.to_string(),
        };
        self.post("buckets", &data).await
    }

    pub async fn delete_bucket(&self, key: &str) -> Result<()> {
        require(key, "bucket key")?;
        self.delete(&endpoint(&["buckets", key])).await
    }
}
