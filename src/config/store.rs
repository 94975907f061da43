//! The per-scope configuration store
//!
//! One [`ConfigStore`] exists per execution scope. A suite-level store is
//! built with [`ConfigStore::new`]; every nested scope (feature, scenario)
//! starts from [`ConfigStore::from_parent`] so its overrides never leak upward.
//!
//! # Sharing
//!
//! Owned settings (strings, lists, maps, flags) are copied into the child.
//! The client instance and the dynamic values (headers, cookies, response
//! headers and the lifecycle hooks) are `Arc`s: the child points at the same
//! objects as the parent until one of them replaces the field.

use serde::Serialize;
use std::sync::Arc;

use crate::charset::Charset;
use crate::client::ClientHandle;
use crate::config::types::{
    DEFAULT_TIMEOUT_MS, NonProxyHosts, ProxySettings, ReportSettings, RetrySettings, SslSettings,
};
use crate::error::Result;
use crate::value::{Value, ValueMap};

/// A dynamic value shared by reference between parent and child stores
pub type SharedValue = Arc<Value>;

/// Execution settings for one scope of a test run
#[derive(Debug, Clone)]
pub struct ConfigStore {
    // TLS and transport
    pub(crate) ssl: SslSettings,
    pub(crate) follow_redirects: bool,
    pub(crate) connect_timeout: u32,
    pub(crate) read_timeout: u32,
    pub(crate) charset: Option<Charset>,
    pub(crate) proxy: ProxySettings,

    // Client override
    pub(crate) client_class: Option<String>,
    pub(crate) client_instance: Option<ClientHandle>,

    // Request and response shaping
    pub(crate) headers: SharedValue,
    pub(crate) cookies: SharedValue,
    pub(crate) response_headers: SharedValue,
    pub(crate) lower_case_response_headers: bool,
    pub(crate) mask_request_headers: Vec<String>,
    pub(crate) cors_enabled: bool,

    // Logging
    pub(crate) log_pretty_request: bool,
    pub(crate) log_pretty_response: bool,
    pub(crate) print_enabled: bool,

    // Lifecycle hooks
    pub(crate) after_scenario: SharedValue,
    pub(crate) after_feature: SharedValue,

    pub(crate) retry: RetrySettings,
    pub(crate) report: ReportSettings,

    // Extensibility
    pub(crate) user_defined: Option<ValueMap>,
    pub(crate) driver_options: Option<ValueMap>,

    pub(crate) outline_variables_auto: bool,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            ssl: SslSettings::default(),
            follow_redirects: true,
            connect_timeout: DEFAULT_TIMEOUT_MS,
            read_timeout: DEFAULT_TIMEOUT_MS,
            charset: Some(Charset::UTF_8),
            proxy: ProxySettings::default(),
            client_class: None,
            client_instance: None,
            headers: Arc::new(Value::Null),
            cookies: Arc::new(Value::Null),
            response_headers: Arc::new(Value::Null),
            lower_case_response_headers: false,
            mask_request_headers: Vec::new(),
            cors_enabled: false,
            log_pretty_request: false,
            log_pretty_response: false,
            print_enabled: true,
            after_scenario: Arc::new(Value::Null),
            after_feature: Arc::new(Value::Null),
            retry: RetrySettings::default(),
            report: ReportSettings::default(),
            user_defined: None,
            driver_options: None,
            outline_variables_auto: true,
        }
    }
}

impl ConfigStore {
    /// Create a store with every setting at its default
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the store for a nested scope
    ///
    /// The child owns copies of every setting except the client instance and
    /// the dynamic values, which stay shared with `parent`.
    #[must_use]
    pub fn from_parent(parent: &ConfigStore) -> Self {
        log::trace!("Deriving child config store");
        parent.clone()
    }

    // =========================================================================
    // TLS
    // =========================================================================

    #[must_use]
    pub fn ssl(&self) -> &SslSettings {
        &self.ssl
    }

    #[must_use]
    pub fn is_ssl_enabled(&self) -> bool {
        self.ssl.enabled
    }

    #[must_use]
    pub fn ssl_algorithm(&self) -> &str {
        &self.ssl.algorithm
    }

    #[must_use]
    pub fn ssl_key_store(&self) -> Option<&str> {
        self.ssl.key_store.as_deref()
    }

    #[must_use]
    pub fn ssl_key_store_password(&self) -> Option<&str> {
        self.ssl.key_store_password.as_deref()
    }

    #[must_use]
    pub fn ssl_key_store_type(&self) -> Option<&str> {
        self.ssl.key_store_type.as_deref()
    }

    #[must_use]
    pub fn ssl_trust_store(&self) -> Option<&str> {
        self.ssl.trust_store.as_deref()
    }

    #[must_use]
    pub fn ssl_trust_store_password(&self) -> Option<&str> {
        self.ssl.trust_store_password.as_deref()
    }

    #[must_use]
    pub fn ssl_trust_store_type(&self) -> Option<&str> {
        self.ssl.trust_store_type.as_deref()
    }

    #[must_use]
    pub fn is_ssl_trust_all(&self) -> bool {
        self.ssl.trust_all
    }

    // =========================================================================
    // Transport
    // =========================================================================

    #[must_use]
    pub fn is_follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    /// Connect timeout in milliseconds
    #[must_use]
    pub fn connect_timeout(&self) -> u32 {
        self.connect_timeout
    }

    /// Read timeout in milliseconds
    #[must_use]
    pub fn read_timeout(&self) -> u32 {
        self.read_timeout
    }

    /// Body charset; `None` means the transport should use its platform default
    #[must_use]
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }

    #[must_use]
    pub fn proxy(&self) -> &ProxySettings {
        &self.proxy
    }

    #[must_use]
    pub fn proxy_uri(&self) -> Option<&str> {
        self.proxy.uri.as_deref()
    }

    #[must_use]
    pub fn proxy_username(&self) -> Option<&str> {
        self.proxy.username.as_deref()
    }

    #[must_use]
    pub fn proxy_password(&self) -> Option<&str> {
        self.proxy.password.as_deref()
    }

    #[must_use]
    pub fn non_proxy_hosts(&self) -> Option<&[String]> {
        self.proxy.non_proxy_hosts.as_ref().map(NonProxyHosts::hosts)
    }

    // =========================================================================
    // Client override
    // =========================================================================

    #[must_use]
    pub fn client_class(&self) -> Option<&str> {
        self.client_class.as_deref()
    }

    pub fn set_client_class(&mut self, client_class: Option<String>) {
        self.client_class = client_class;
    }

    /// Installed client, which takes precedence over [`client_class`](Self::client_class)
    #[must_use]
    pub fn client_instance(&self) -> Option<&ClientHandle> {
        self.client_instance.as_ref()
    }

    pub fn set_client_instance(&mut self, client: Option<ClientHandle>) {
        self.client_instance = client;
    }

    // =========================================================================
    // Request and response shaping
    // =========================================================================

    #[must_use]
    pub fn headers(&self) -> &SharedValue {
        &self.headers
    }

    #[must_use]
    pub fn cookies(&self) -> &SharedValue {
        &self.cookies
    }

    /// Replace the cookies without going through `configure`
    ///
    /// Accepts either a [`Value`] or an already shared [`SharedValue`].
    pub fn set_cookies(&mut self, cookies: impl Into<SharedValue>) {
        self.cookies = cookies.into();
    }

    #[must_use]
    pub fn response_headers(&self) -> &SharedValue {
        &self.response_headers
    }

    #[must_use]
    pub fn is_lower_case_response_headers(&self) -> bool {
        self.lower_case_response_headers
    }

    /// Request header names whose values are masked in logs, in configured order
    #[must_use]
    pub fn request_headers_to_mask(&self) -> &[String] {
        &self.mask_request_headers
    }

    /// Whether a request header's value must be masked when logged
    ///
    /// Header names compare case-insensitively.
    #[must_use]
    pub fn should_mask_request_header(&self, name: &str) -> bool {
        self.mask_request_headers
            .iter()
            .any(|masked| masked.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn is_cors_enabled(&self) -> bool {
        self.cors_enabled
    }

    // =========================================================================
    // Logging
    // =========================================================================

    #[must_use]
    pub fn is_log_pretty_request(&self) -> bool {
        self.log_pretty_request
    }

    #[must_use]
    pub fn is_log_pretty_response(&self) -> bool {
        self.log_pretty_response
    }

    #[must_use]
    pub fn is_print_enabled(&self) -> bool {
        self.print_enabled
    }

    // =========================================================================
    // Lifecycle hooks
    // =========================================================================

    #[must_use]
    pub fn after_scenario(&self) -> &SharedValue {
        &self.after_scenario
    }

    pub fn set_after_scenario(&mut self, hook: impl Into<SharedValue>) {
        self.after_scenario = hook.into();
    }

    #[must_use]
    pub fn after_feature(&self) -> &SharedValue {
        &self.after_feature
    }

    pub fn set_after_feature(&mut self, hook: impl Into<SharedValue>) {
        self.after_feature = hook.into();
    }

    // =========================================================================
    // Retry
    // =========================================================================

    #[must_use]
    pub fn retry(&self) -> RetrySettings {
        self.retry
    }

    /// Delay between retries in milliseconds
    #[must_use]
    pub fn retry_interval(&self) -> u32 {
        self.retry.interval
    }

    pub fn set_retry_interval(&mut self, interval: u32) {
        self.retry.interval = interval;
    }

    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.retry.count
    }

    pub fn set_retry_count(&mut self, count: u32) {
        self.retry.count = count;
    }

    // =========================================================================
    // Report
    // =========================================================================

    #[must_use]
    pub fn report(&self) -> ReportSettings {
        self.report
    }

    #[must_use]
    pub fn is_show_log(&self) -> bool {
        self.report.show_log
    }

    pub fn set_show_log(&mut self, show_log: bool) {
        self.report.show_log = show_log;
    }

    #[must_use]
    pub fn is_show_all_steps(&self) -> bool {
        self.report.show_all_steps
    }

    pub fn set_show_all_steps(&mut self, show_all_steps: bool) {
        self.report.show_all_steps = show_all_steps;
    }

    // =========================================================================
    // Extensibility
    // =========================================================================

    #[must_use]
    pub fn user_defined(&self) -> Option<&ValueMap> {
        self.user_defined.as_ref()
    }

    #[must_use]
    pub fn driver_options(&self) -> Option<&ValueMap> {
        self.driver_options.as_ref()
    }

    #[must_use]
    pub fn is_outline_variables_auto(&self) -> bool {
        self.outline_variables_auto
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Render the current settings as JSON for logs and debug output
    ///
    /// Passwords are masked; opaque handles render as their type name.
    ///
    /// # Errors
    ///
    /// Returns an error if a dynamic value cannot be represented as JSON.
    pub fn snapshot(&self) -> Result<serde_json::Value> {
        let view = Snapshot {
            ssl: &self.ssl,
            follow_redirects: self.follow_redirects,
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
            charset: self.charset,
            proxy: &self.proxy,
            http_client_class: self.client_class.as_deref(),
            http_client_instance: self.client_instance.as_ref().map(ClientHandle::name),
            headers: &self.headers,
            cookies: &self.cookies,
            response_headers: &self.response_headers,
            lower_case_response_headers: self.lower_case_response_headers,
            mask_request_headers: &self.mask_request_headers,
            cors: self.cors_enabled,
            log_pretty_request: self.log_pretty_request,
            log_pretty_response: self.log_pretty_response,
            print_enabled: self.print_enabled,
            after_scenario: &self.after_scenario,
            after_feature: &self.after_feature,
            retry: self.retry,
            report: self.report,
            user_defined: self.user_defined.as_ref(),
            driver: self.driver_options.as_ref(),
            outline_variables_auto: self.outline_variables_auto,
        };
        Ok(serde_json::to_value(view)?)
    }
}

/// Borrowed JSON view used by [`ConfigStore::snapshot`]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    ssl: &'a SslSettings,
    follow_redirects: bool,
    connect_timeout: u32,
    read_timeout: u32,
    charset: Option<Charset>,
    proxy: &'a ProxySettings,
    http_client_class: Option<&'a str>,
    http_client_instance: Option<&'a str>,
    headers: &'a Value,
    cookies: &'a Value,
    response_headers: &'a Value,
    lower_case_response_headers: bool,
    mask_request_headers: &'a [String],
    cors: bool,
    log_pretty_request: bool,
    log_pretty_response: bool,
    print_enabled: bool,
    after_scenario: &'a Value,
    after_feature: &'a Value,
    retry: RetrySettings,
    report: ReportSettings,
    user_defined: Option<&'a ValueMap>,
    driver: Option<&'a ValueMap>,
    outline_variables_auto: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let store = ConfigStore::new();

        assert!(!store.is_ssl_enabled());
        assert_eq!(store.ssl_algorithm(), "TLS");
        assert!(store.is_ssl_trust_all());
        assert!(store.is_follow_redirects());
        assert_eq!(store.connect_timeout(), 30_000);
        assert_eq!(store.read_timeout(), 30_000);
        assert_eq!(store.charset(), Some(Charset::UTF_8));
        assert!(store.proxy_uri().is_none());
        assert!(store.headers().is_null());
        assert!(store.request_headers_to_mask().is_empty());
        assert!(store.is_print_enabled());
        assert!(!store.is_log_pretty_request());
        assert_eq!(store.retry_interval(), 3000);
        assert_eq!(store.retry_count(), 3);
        assert!(store.is_show_log());
        assert!(store.is_show_all_steps());
        assert!(store.is_outline_variables_auto());
        assert!(store.user_defined().is_none());
        assert!(store.client_instance().is_none());
    }

    #[test]
    fn test_named_setters() {
        let mut store = ConfigStore::new();
        store.set_retry_interval(100);
        store.set_retry_count(9);
        store.set_show_log(false);
        store.set_show_all_steps(false);
        store.set_client_class(Some("com.example.Client".into()));
        store.set_cookies(Value::from(json!({"session": "abc"})));

        assert_eq!(store.retry(), RetrySettings { interval: 100, count: 9 });
        assert_eq!(
            store.report(),
            ReportSettings {
                show_log: false,
                show_all_steps: false
            }
        );
        assert_eq!(store.client_class(), Some("com.example.Client"));
        assert_eq!(
            store.cookies().get("session"),
            Some(&Value::from("abc"))
        );
    }

    #[test]
    fn test_set_hook_keeps_shared_reference() {
        let hook: SharedValue = Arc::new(Value::from("fn"));
        let mut store = ConfigStore::new();
        store.set_after_scenario(Arc::clone(&hook));

        assert!(Arc::ptr_eq(store.after_scenario(), &hook));
    }

    #[test]
    fn test_should_mask_request_header() {
        let mut store = ConfigStore::new();
        store.mask_request_headers = vec!["Authorization".into()];

        assert!(store.should_mask_request_header("authorization"));
        assert!(store.should_mask_request_header("AUTHORIZATION"));
        assert!(!store.should_mask_request_header("Accept"));
    }

    #[test]
    fn test_snapshot_masks_passwords() {
        let mut store = ConfigStore::new();
        store.ssl.key_store_password = Some("secret".into());
        store.proxy.password = Some("secret".into());

        let snapshot = store.snapshot().unwrap();

        assert_eq!(snapshot["ssl"]["keyStorePassword"], json!("*****"));
        assert_eq!(snapshot["proxy"]["password"], json!("*****"));
        assert_eq!(snapshot["charset"], json!("UTF-8"));
        assert_eq!(snapshot["retry"], json!({"interval": 3000, "count": 3}));
        assert_eq!(snapshot["report"]["showAllSteps"], json!(true));
        assert_eq!(snapshot["headers"], json!(null));
        assert!(!snapshot.to_string().contains("secret"));
    }
}
