//! The account that owns the API token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::helpers::epoch_to_datetime;
use crate::team::Team;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
    #[serde(deserialize_with = "crate::envelope::nullable")]
    pub teams: Vec<Team>,
}

impl Account {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.and_then(epoch_to_datetime)
    }
}

impl Client {
    /// Return the account associated with the token used for the request.
    pub async fn get_account(&self) -> Result<Account> {
        self.get("account").await
    }
}
