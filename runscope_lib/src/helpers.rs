//! Helpers for API token resolution, Runscope URL parsing, and timestamps.

use chrono::{DateTime, Local, TimeZone, Utc};
use url::Url;

use crate::secret::SecretBackend;

/// Environment variable holding a plain API token.
pub const TOKEN_ENV: &str = "RUNSCOPE_TOKEN";

/// Source from which the API token was obtained (for diagnostics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiTokenSource {
    Env,
    OnePassword,
    Bitwarden,
    Keepassxc,
}

impl From<SecretBackend> for ApiTokenSource {
    fn from(backend: SecretBackend) -> Self {
        match backend {
            SecretBackend::OnePassword => ApiTokenSource::OnePassword,
            SecretBackend::Bitwarden => ApiTokenSource::Bitwarden,
            SecretBackend::KeePassXc => ApiTokenSource::Keepassxc,
        }
    }
}

/// Resolve the API token: `RUNSCOPE_TOKEN` first, then the secret backends
/// in [`SecretBackend::ALL`] order.
pub fn get_api_token() -> Result<(String, ApiTokenSource), String> {
    if let Some(token) = std::env::var(TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        return Ok((token, ApiTokenSource::Env));
    }
    for backend in SecretBackend::ALL {
        if let Some(token) = backend.read() {
            tracing::debug!(?backend, "API token read from secret backend");
            return Ok((token, backend.into()));
        }
    }
    Err(
        "API token not found. Set RUNSCOPE_TOKEN or configure a secret backend: \
         RUNSCOPE_OP_ENTRY_PATH (1Password), RUNSCOPE_BW_ITEM_ID (Bitwarden), \
         or RUNSCOPE_KPXC_DB+RUNSCOPE_KPXC_ENTRY (KeePassXC)."
            .to_string(),
    )
}

/// Identifiers extracted from a Runscope dashboard or API URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParsedRunscopeUrl {
    pub bucket_key: Option<String>,
    pub test_id: Option<String>,
    pub test_run_id: Option<String>,
}

/// Parse a Runscope URL.
///
/// Understands dashboard links (`/radar/{bucket}/{test}/history/{run}`) and
/// API links (`/buckets/{bucket}/tests/{test}/results/{run}`), e.g. a
/// result's `test_run_url`.
pub fn parse_runscope_url(url: &str) -> Result<ParsedRunscopeUrl, String> {
    let parsed = Url::parse(url).map_err(|e| e.to_string())?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    let after = |name: &str| {
        segments
            .iter()
            .position(|s| *s == name)
            .and_then(|i| segments.get(i + 1))
            .map(|s| (*s).to_string())
    };

    if segments.first() == Some(&"radar") {
        // /radar/{bucket}/{test}/...; trigger URLs (/radar/{id}/trigger) carry no ids we know
        if segments.get(2) == Some(&"trigger") {
            return Ok(ParsedRunscopeUrl::default());
        }
        return Ok(ParsedRunscopeUrl {
            bucket_key: segments.get(1).map(|s| (*s).to_string()),
            test_id: segments.get(2).map(|s| (*s).to_string()),
            test_run_id: after("history"),
        });
    }

    Ok(ParsedRunscopeUrl {
        bucket_key: after("buckets"),
        test_id: after("tests"),
        test_run_id: after("results"),
    })
}

/// Convert epoch seconds (possibly fractional) to a UTC datetime.
pub fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        return Utc.timestamp_opt(whole as i64 + 1, 0).single();
    }
    Utc.timestamp_opt(whole as i64, nanos).single()
}

/// Format epoch seconds for display. UTC when `use_utc`, local time otherwise.
pub fn format_timestamp_display(secs: f64, use_utc: bool) -> String {
    let Some(dt) = epoch_to_datetime(secs) else {
        return secs.to_string();
    };
    if use_utc {
        dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    } else {
        dt.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string()
    }
}

/// Parse an ISO 8601 time string, or plain epoch seconds.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<f64>() {
        return epoch_to_datetime(secs).ok_or_else(|| format!("Invalid timestamp: {}", s));
    }
    let s = s.trim_end_matches('Z').trim_end_matches('z');
    let parsed = DateTime::parse_from_rfc3339(&format!("{}Z", s))
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map_err(|e| e.to_string())?;
    Ok(parsed.with_timezone(&Utc))
}
