//! Configuration store and keyed updates
//!
//! This module contains the store and everything `configure` dispatches on:
//! - `ConfigStore` - Settings for one execution scope
//! - `ConfigKey` - Closed set of keys accepted by `configure`
//! - Settings records (`SslSettings`, `ProxySettings`, `RetrySettings`, `ReportSettings`)
//! - `NonProxyHosts` - Proxy bypass patterns, compiled once per update

mod configure;
mod key;
mod store;
mod types;

pub use configure::ConfigureOutcome;
pub use key::ConfigKey;
pub use store::{ConfigStore, SharedValue};
pub use types::{
    DEFAULT_RETRY_COUNT, DEFAULT_RETRY_INTERVAL, DEFAULT_SSL_ALGORITHM, DEFAULT_TIMEOUT_MS,
    NonProxyHosts, ProxySettings, ReportSettings, RetrySettings, SslSettings,
};
