//! Grouped settings records held by the store

use regex::RegexSet;
use serde::{Serialize, Serializer};
use std::fmt;

/// Default delay between retries, in milliseconds
pub const DEFAULT_RETRY_INTERVAL: u32 = 3000;

/// Default number of retry attempts
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Default connect and read timeout, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u32 = 30_000;

/// Default TLS protocol name
pub const DEFAULT_SSL_ALGORITHM: &str = "TLS";

fn mask_secret<S: Serializer>(secret: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match secret {
        Some(_) => serializer.serialize_str("*****"),
        None => serializer.serialize_none(),
    }
}

// =============================================================================
// TLS
// =============================================================================

/// TLS settings handed to the client builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SslSettings {
    pub enabled: bool,
    pub algorithm: String,
    pub key_store: Option<String>,
    #[serde(serialize_with = "mask_secret")]
    pub key_store_password: Option<String>,
    pub key_store_type: Option<String>,
    pub trust_store: Option<String>,
    #[serde(serialize_with = "mask_secret")]
    pub trust_store_password: Option<String>,
    pub trust_store_type: Option<String>,
    pub trust_all: bool,
}

impl Default for SslSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            algorithm: DEFAULT_SSL_ALGORITHM.to_string(),
            key_store: None,
            key_store_password: None,
            key_store_type: None,
            trust_store: None,
            trust_store_password: None,
            trust_store_type: None,
            trust_all: true,
        }
    }
}

// =============================================================================
// Proxy
// =============================================================================

/// Outbound proxy settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    pub uri: Option<String>,
    pub username: Option<String>,
    #[serde(serialize_with = "mask_secret")]
    pub password: Option<String>,
    pub non_proxy_hosts: Option<NonProxyHosts>,
}

impl ProxySettings {
    /// Whether requests to `host` should skip the proxy
    #[must_use]
    pub fn bypasses(&self, host: &str) -> bool {
        self.non_proxy_hosts
            .as_ref()
            .is_some_and(|hosts| hosts.matches(host))
    }
}

/// Host patterns that skip the proxy, compiled when the list is set
///
/// Entries follow the JVM `http.nonProxyHosts` convention: `*` matches any
/// run of characters, matching ignores case, and a single entry may hold
/// several patterns separated by `|`.
#[derive(Clone)]
pub struct NonProxyHosts {
    hosts: Vec<String>,
    matcher: RegexSet,
}

impl NonProxyHosts {
    /// Compile a host list
    ///
    /// # Errors
    ///
    /// Returns the `regex` error if the patterns exceed the compiled size limit.
    pub fn new(hosts: Vec<String>) -> Result<Self, regex::Error> {
        let patterns: Vec<String> = hosts
            .iter()
            .flat_map(|entry| entry.split('|'))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                let escaped = regex::escape(p).replace(r"\*", ".*");
                format!("(?i)^{escaped}$")
            })
            .collect();
        let matcher = RegexSet::new(&patterns)?;
        Ok(Self { hosts, matcher })
    }

    /// The entries as configured
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Whether `host` matches any entry
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        self.matcher.is_match(host.trim())
    }
}

impl PartialEq for NonProxyHosts {
    fn eq(&self, other: &Self) -> bool {
        self.hosts == other.hosts
    }
}

impl Eq for NonProxyHosts {}

impl fmt::Debug for NonProxyHosts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.hosts).finish()
    }
}

impl Serialize for NonProxyHosts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.hosts)
    }
}

// =============================================================================
// Retry
// =============================================================================

/// Polling retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrySettings {
    /// Delay between attempts, in milliseconds
    pub interval: u32,
    /// Maximum number of attempts
    pub count: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RETRY_INTERVAL,
            count: DEFAULT_RETRY_COUNT,
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// Report verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    pub show_log: bool,
    pub show_all_steps: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            show_log: true,
            show_all_steps: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hosts(entries: &[&str]) -> Option<NonProxyHosts> {
        let entries = entries.iter().map(|e| e.to_string()).collect();
        Some(NonProxyHosts::new(entries).unwrap())
    }

    #[test]
    fn test_defaults() {
        let ssl = SslSettings::default();
        assert!(!ssl.enabled);
        assert!(ssl.trust_all);
        assert_eq!(ssl.algorithm, "TLS");

        assert_eq!(RetrySettings::default().interval, 3000);
        assert_eq!(RetrySettings::default().count, 3);
        assert!(ReportSettings::default().show_log);
        assert!(ReportSettings::default().show_all_steps);
        assert_eq!(ProxySettings::default().uri, None);
    }

    #[test]
    fn test_bypasses_wildcards() {
        let proxy = ProxySettings {
            uri: Some("http://proxy:3128".into()),
            non_proxy_hosts: hosts(&["localhost", "*.internal.example.com"]),
            ..Default::default()
        };

        assert!(proxy.bypasses("localhost"));
        assert!(proxy.bypasses("LOCALHOST"));
        assert!(proxy.bypasses("api.internal.example.com"));
        assert!(!proxy.bypasses("internal.example.com"));
        assert!(!proxy.bypasses("example.org"));
    }

    #[test]
    fn test_bypasses_pipe_separated_entry() {
        let proxy = ProxySettings {
            non_proxy_hosts: hosts(&["127.0.0.1|*.local"]),
            ..Default::default()
        };

        assert!(proxy.bypasses("127.0.0.1"));
        assert!(!proxy.bypasses("127.0.0.10"));
        assert!(proxy.bypasses("printer.local"));
    }

    #[test]
    fn test_bypasses_without_hosts() {
        assert!(!ProxySettings::default().bypasses("localhost"));
    }

    #[test]
    fn test_host_list_keeps_entries_and_compares_by_them() {
        let compiled = hosts(&["*.local", "10.0.0.1"]).unwrap();

        assert_eq!(compiled.hosts(), ["*.local", "10.0.0.1"]);
        assert_eq!(Some(compiled.clone()), hosts(&["*.local", "10.0.0.1"]));
        assert_ne!(Some(compiled.clone()), hosts(&["*.local"]));
        assert_eq!(serde_json::to_value(&compiled).unwrap(), json!(["*.local", "10.0.0.1"]));
        assert!(compiled.matches(" nas.local "));
    }

    #[test]
    fn test_empty_host_list_matches_nothing() {
        let compiled = hosts(&["", " | "]).unwrap();
        assert!(!compiled.matches("localhost"));
        assert!(!compiled.matches(""));
    }

    #[test]
    fn test_passwords_are_masked_when_serialized() {
        let proxy = ProxySettings {
            uri: Some("http://proxy".into()),
            username: Some("bob".into()),
            password: Some("hunter2".into()),
            non_proxy_hosts: None,
        };
        let json = serde_json::to_value(&proxy).unwrap();

        assert_eq!(json["password"], json!("*****"));
        assert_eq!(json["username"], json!("bob"));
        assert_eq!(json["nonProxyHosts"], json!(null));
    }
}
