//! HTTP client for the Runscope REST API.
//!
//! Resource methods (`list_buckets`, `get_test`, ...) live next to their types
//! in the resource modules; this module owns URL construction, auth headers,
//! and status/envelope handling.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientOptions;
use crate::envelope;
use crate::error::{ApiError, AuthError, Error, Result};

/// Runscope API client.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    headers: HeaderMap,
    http: HttpClient,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client from explicit options.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = options.resolved_base_url()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", options.token.trim()))
            .map_err(|_| Error::Config("API token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        let agent = HeaderValue::from_str(&options.user_agent)
            .map_err(|_| Error::Config("user agent contains invalid characters".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder().timeout(options.timeout).build()?;
        Ok(Self {
            base_url,
            headers,
            http,
        })
    }

    /// Create a client for the production API with the given token.
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::new(ClientOptions::new(token))
    }

    /// Create a client configured from the environment (see [`ClientOptions::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the envelope's data.
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let body = self.execute(self.request(Method::GET, path)).await?;
        envelope::decode(&body)
    }

    /// POST `body` as JSON to `path` and decode the envelope's data.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let req = self.request(Method::POST, path).json(body);
        let body = self.execute(req).await?;
        envelope::decode(&body)
    }

    /// PUT `body` as JSON to `path` and decode the envelope's data.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let req = self.request(Method::PUT, path).json(body);
        let body = self.execute(req).await?;
        envelope::decode(&body)
    }

    /// DELETE `path`. Only the status code is checked.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "runscope request");
        self.http
            .request(method, self.url(path))
            .headers(self.headers.clone())
    }

    async fn execute(&self, req: RequestBuilder) -> Result<String> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "runscope response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Auth(AuthError {
                message: envelope::error_message(&body)
                    .unwrap_or_else(|| "Authentication failed. Check your API token.".to_string()),
            }));
        }
        if !status.is_success() {
            let msg = envelope::error_message(&body)
                .unwrap_or_else(|| format!("Request did not match 2xx: {}", status.as_u16()));
            return Err(Error::Api(ApiError::new(
                msg,
                Some(status.as_u16()),
                serde_json::from_str(&body).ok(),
            )));
        }
        Ok(body)
    }
}

/// Join path segments, percent-encoding each one.
pub(crate) fn endpoint(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Append `?k=v&...` to `path`; a no-op when `params` is empty.
pub(crate) fn with_query(mut path: String, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path;
    }
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    path.push('?');
    path.push_str(&query.join("&"));
    path
}

/// Reject empty identifiers before they turn into a malformed path.
pub(crate) fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", what)));
    }
    Ok(())
}
