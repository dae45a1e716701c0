//! Regions tests can run from.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;

/// Wrapper returned by `GET /regions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regions {
    #[serde(deserialize_with = "crate::envelope::nullable")]
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl Client {
    /// List every region known to Runscope.
    pub async fn list_regions(&self) -> Result<Regions> {
        self.get("regions").await
    }
}
