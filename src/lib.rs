//! # scopecfg - Scoped Configuration for HTTP Test Runs
//!
//! A hierarchical, dynamically-keyed settings store for an HTTP test
//! execution engine: TLS, proxying, timeouts, headers, retry policy, report
//! verbosity and user-defined data.
//!
//! ## Features
//!
//! - **Keyed Updates**: `configure(key, value)` coerces an untyped script value into each setting
//! - **Rebuild Signal**: every update reports whether a cached network client is now stale
//! - **Scoped Inheritance**: child stores copy their parent, so local overrides never leak upward
//! - **Strict Coercion**: only a literal boolean `true` switches a flag on
//!
//! ## Quick Start
//!
//! ```rust
//! use scopecfg::{ConfigStore, Value};
//! use serde_json::json;
//!
//! # fn example() -> scopecfg::Result<()> {
//! let mut suite = ConfigStore::new();
//!
//! // Transport settings invalidate the client
//! let rebuild = suite.configure("ssl", Value::from("TLSv1.2"))?;
//! assert!(rebuild);
//!
//! // Shaping settings do not
//! let rebuild = suite.configure("retry", Value::from(json!({"count": 5})))?;
//! assert!(!rebuild);
//! assert_eq!(suite.retry_interval(), 3000);
//!
//! // A scenario gets its own copy
//! let mut scenario = ConfigStore::from_parent(&suite);
//! scenario.configure("followRedirects", Value::from(false))?;
//! assert!(suite.is_follow_redirects());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Installing a Client
//!
//! ```rust
//! use scopecfg::{ClientHandle, ConfigStore, HttpClient, Value};
//!
//! struct MockClient;
//!
//! impl HttpClient for MockClient {
//!     fn name(&self) -> &str {
//!         "mock"
//!     }
//! }
//!
//! let mut store = ConfigStore::new();
//! let client = ClientHandle::new(MockClient);
//! store.configure("httpClientInstance", Value::from(client.clone())).unwrap();
//! assert!(store.client_instance().unwrap().ptr_eq(&client));
//! ```

// Core modules
mod charset;
mod client;
mod error;
mod value;

// Grouped modules
pub mod config;

// Re-exports from core
pub use charset::Charset;
pub use client::{ClientHandle, HttpClient};
pub use error::{Error, Result};
pub use value::{Handle, Mismatch, Value, ValueKind, ValueMap};

// Re-exports from config
pub use config::{
    ConfigKey, ConfigStore, ConfigureOutcome, NonProxyHosts, ProxySettings, ReportSettings,
    RetrySettings, SharedValue, SslSettings,
};
