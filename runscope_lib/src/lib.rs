//! Runscope API client library.
//!
//! Provides a typed async client for the Runscope REST API: account, buckets,
//! tests, steps, environments, schedules, results, teams, integrations, and
//! regions. Every call is a single HTTP round trip whose `{data, error, meta}`
//! envelope is decoded into the matching type.
//!
//! ```no_run
//! # async fn demo() -> runscope_lib::Result<()> {
//! use runscope_lib::{Client, ListTestsOptions};
//!
//! let client = Client::with_token("my-token")?;
//! for bucket in client.list_buckets().await? {
//!     let key = bucket.key.unwrap_or_default();
//!     let tests = client.list_tests(&key, &ListTestsOptions::default()).await?;
//!     println!("{}: {} tests", key, tests.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod bucket;
pub mod client;
pub mod config;
pub mod envelope;
pub mod environment;
pub mod error;
pub mod helpers;
pub mod integration;
pub mod region;
pub mod result;
pub mod schedule;
pub mod secret;
pub mod step;
pub mod team;
pub mod test;

pub use account::Account;
pub use bucket::{Bucket, NewBucketRequest};
pub use client::Client;
pub use config::{ClientOptions, BASE_URL};
pub use envelope::{Envelope, ErrorBody, Meta};
pub use environment::{Email, Environment, RemoteAgent};
pub use error::{ApiError, AuthError, Error, Result};
pub use helpers::{
    format_timestamp_display, get_api_token, parse_runscope_url, parse_time, ApiTokenSource,
    ParsedRunscopeUrl,
};
pub use integration::Integration;
pub use region::{Region, Regions};
pub use result::{ListResultsOptions, RequestResult, TestResult};
pub use schedule::{Schedule, VALID_INTERVALS};
pub use secret::SecretBackend;
pub use step::{Assertion, Auth, Script, Step, Variable};
pub use team::{Person, Team};
pub use test::{ListTestsOptions, Test};

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
