//! Third-party integrations (PagerDuty, Slack, ...) attached to a team.

use serde::{Deserialize, Serialize};

use crate::client::{endpoint, require, Client};
use crate::error::Result;

/// An integration. Team listings call the kind `type`; environments embed it
/// as `integration_type`. Both are accepted, `integration_type` is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Integration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "integration_type",
        alias = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub integration_type: Option<String>,
}

impl Client {
    /// List integrations configured for a team.
    pub async fn list_integrations(&self, team_id: &str) -> Result<Vec<Integration>> {
        require(team_id, "team id")?;
        self.get(&endpoint(&["teams", team_id, "integrations"])).await
    }
}
