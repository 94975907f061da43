//! Common test utilities for scopecfg integration tests
//!
//! Provides a stub network client, value builders and logger setup.

#![allow(dead_code)]

use scopecfg::{ClientHandle, ConfigKey, ConfigStore, HttpClient, Value};

// =============================================================================
// Logging
// =============================================================================

/// Route `log` output through the test harness (`RUST_LOG=debug` to see it)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Stub Client
// =============================================================================

/// A client the transport layer would have built
pub struct StubClient {
    pub label: String,
}

impl HttpClient for StubClient {
    fn name(&self) -> &str {
        &self.label
    }
}

pub fn stub_client(label: &str) -> ClientHandle {
    ClientHandle::new(StubClient {
        label: label.to_string(),
    })
}

// =============================================================================
// Values
// =============================================================================

/// Build a `Value` from a `json!` literal
pub fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// A valid value for every recognized key, differing from the default
pub fn sample_value(key: ConfigKey) -> Value {
    use serde_json::json;

    match key {
        ConfigKey::Headers => v(json!({"Accept": "application/json"})),
        ConfigKey::MaskRequestHeaders => v(json!(["Authorization"])),
        ConfigKey::Cookies => v(json!({"session": "abc"})),
        ConfigKey::ResponseHeaders => v(json!({"X-Trace": "1"})),
        ConfigKey::AfterScenario | ConfigKey::AfterFeature => Value::handle("hook"),
        ConfigKey::Report => v(json!({"showLog": false})),
        ConfigKey::Driver => v(json!({"type": "chrome"})),
        ConfigKey::Retry => v(json!({"interval": 100, "count": 10})),
        ConfigKey::HttpClientClass => Value::from("com.example.MockClient"),
        ConfigKey::HttpClientInstance => Value::from(stub_client("sample")),
        ConfigKey::Charset => Value::from("ISO-8859-2"),
        ConfigKey::Ssl => Value::from("TLSv1.3"),
        ConfigKey::ConnectTimeout | ConfigKey::ReadTimeout => Value::from(1234),
        ConfigKey::Proxy => Value::from("http://proxy:3128"),
        ConfigKey::UserDefined => v(json!({"tenant": "acme"})),
        ConfigKey::LowerCaseResponseHeaders
        | ConfigKey::Cors
        | ConfigKey::LogPrettyResponse
        | ConfigKey::LogPrettyRequest => Value::from(true),
        ConfigKey::PrintEnabled | ConfigKey::FollowRedirects | ConfigKey::OutlineVariablesAuto => {
            Value::from(false)
        }
    }
}

/// A store with something non-default in every field
pub fn populated_store() -> ConfigStore {
    use serde_json::json;

    let mut store = ConfigStore::new();
    store
        .configure_all(v(json!({
            "ssl": {
                "keyStore": "client.p12",
                "keyStorePassword": "ks-pass",
                "keyStoreType": "pkcs12",
                "trustStore": "trust.jks",
                "trustStorePassword": "ts-pass",
                "trustStoreType": "jks",
                "trustAll": false,
                "algorithm": "TLSv1.2"
            },
            "followRedirects": false,
            "connectTimeout": 1000,
            "readTimeout": 2000,
            "charset": "windows-1252",
            "proxy": {
                "uri": "http://proxy:3128",
                "username": "bob",
                "password": "pw",
                "nonProxyHosts": ["localhost"]
            },
            "headers": {"Accept": "text/plain"},
            "cookies": {"session": "abc"},
            "responseHeaders": {"X-Trace": "1"},
            "lowerCaseResponseHeaders": true,
            "maskRequestHeaders": ["Authorization"],
            "cors": true,
            "logPrettyRequest": true,
            "logPrettyResponse": true,
            "printEnabled": false,
            "httpClientClass": "com.example.MockClient",
            "userDefined": {"tenant": "acme"},
            "driver": {"type": "chrome"},
            "retry": {"interval": 100, "count": 9},
            "report": {"showLog": false, "showAllSteps": false},
            "outlineVariablesAuto": false
        })))
        .expect("populated store");
    store
        .configure("httpClientInstance", Value::from(stub_client("parent")))
        .expect("client instance");
    store
        .configure("afterScenario", Value::handle("after-scenario-fn"))
        .expect("after scenario");
    store
        .configure("afterFeature", Value::handle("after-feature-fn"))
        .expect("after feature");
    store
}
