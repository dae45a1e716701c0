//! The `{data, error, meta}` wrapper returned by every Runscope endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, Error, Result};

/// Uniform response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Error block of the envelope. `null` on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub status: Option<u16>,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
}

/// Metadata block of the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(deserialize_with = "nullable")]
    pub status: String,
}

/// Decode an envelope and return its `data`.
///
/// A non-empty `error.message` is an error even on a 2xx response. Missing or
/// `null` data decodes to `T::default()`.
pub fn decode<T>(body: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if let Some(err) = envelope.error.as_ref().filter(|e| !e.message.is_empty()) {
        let meta_status = envelope
            .meta
            .as_ref()
            .map(|m| m.status.clone())
            .filter(|s| !s.is_empty());
        return Err(Error::Api(
            ApiError::new(
                err.message.clone(),
                err.status,
                serde_json::from_str(body).ok(),
            )
            .with_meta_status(meta_status),
        ));
    }
    Ok(envelope.data.unwrap_or_default())
}

/// Best-effort extraction of `error.message` from a body that may not be an
/// envelope at all (e.g. an HTML error page).
pub(crate) fn error_message(body: &str) -> Option<String> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    envelope
        .error
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
