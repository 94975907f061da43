//! Keyed configuration updates
//!
//! `configure` is the only generic way to change a store. Each recognized key
//! coerces its value into the field's own representation, and the outcome
//! tells the caller whether a cached network client has to be rebuilt.
//!
//! Coercion always finishes before a field is assigned, so a call that fails
//! leaves the store as it was.
//!
//! # Merge rules
//!
//! `retry`, `report` and the map form of `ssl` only overwrite the sub-fields
//! present in the map. The map form of `proxy` replaces all four proxy fields,
//! clearing the ones left out. A non-map `retry` is ignored rather than
//! rejected. These differences are relied on by existing test suites.

use log::{debug, info};
use std::sync::Arc;

use crate::charset::Charset;
use crate::client::ClientHandle;
use crate::config::key::ConfigKey;
use crate::config::store::ConfigStore;
use crate::config::types::{
    NonProxyHosts, ProxySettings, ReportSettings, RetrySettings, SslSettings,
};
use crate::error::{Error, Result};
use crate::value::{Value, ValueMap};

/// Result of applying one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureOutcome {
    pub key: ConfigKey,
    pub requires_rebuild: bool,
}

impl ConfigureOutcome {
    /// Whether the caller must discard and rebuild its network client
    #[must_use]
    pub fn requires_rebuild(&self) -> bool {
        self.requires_rebuild
    }
}

impl ConfigStore {
    /// Apply a setting by name
    ///
    /// Returns `true` when the change invalidates an already built network
    /// client.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownKey` if `key` (after trimming) is not recognized
    /// - `Error::TypeMismatch` if the value has the wrong shape for the key
    /// - `Error::InvalidValue` for out-of-range numbers
    /// - `Error::InvalidCharset` for an unknown charset name
    pub fn configure(&mut self, key: &str, value: Value) -> Result<bool> {
        let key = key
            .parse::<ConfigKey>()
            .inspect_err(|e| log::warn!("{e}"))?;
        self.apply(key, value).map(|outcome| outcome.requires_rebuild())
    }

    /// Apply every entry of a map, in the order the entries were written
    ///
    /// Returns `true` if any applied key requires a client rebuild. Stops at
    /// the first failing entry; entries applied before it stay applied.
    ///
    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if `values` is not a map, or the first
    /// error raised by an entry.
    pub fn configure_all(&mut self, values: Value) -> Result<bool> {
        let entries = values.into_map().map_err(|m| m.for_key("configure"))?;
        let mut rebuild = false;
        for (key, value) in entries {
            rebuild |= self.configure(&key, value)?;
        }
        Ok(rebuild)
    }

    /// Apply a setting for an already parsed key
    ///
    /// # Errors
    ///
    /// Same as [`configure`](Self::configure), minus `UnknownKey`.
    pub fn apply(&mut self, key: ConfigKey, value: Value) -> Result<ConfigureOutcome> {
        let name = key.as_str();
        match key {
            ConfigKey::Headers => self.headers = Arc::new(value),
            ConfigKey::MaskRequestHeaders => {
                self.mask_request_headers = string_list(name, &value)?;
            }
            ConfigKey::Cookies => self.cookies = Arc::new(value),
            ConfigKey::ResponseHeaders => self.response_headers = Arc::new(value),
            ConfigKey::LowerCaseResponseHeaders => {
                self.lower_case_response_headers = value.is_boolean_true();
            }
            ConfigKey::Cors => self.cors_enabled = value.is_boolean_true(),
            ConfigKey::LogPrettyResponse => self.log_pretty_response = value.is_boolean_true(),
            ConfigKey::LogPrettyRequest => self.log_pretty_request = value.is_boolean_true(),
            ConfigKey::PrintEnabled => self.print_enabled = value.is_boolean_true(),
            ConfigKey::AfterScenario => self.after_scenario = Arc::new(value),
            ConfigKey::AfterFeature => self.after_feature = Arc::new(value),
            ConfigKey::Report => self.report = self.coerce_report(&value)?,
            ConfigKey::Driver => self.driver_options = optional_map(name, value)?,
            ConfigKey::Retry => match self.coerce_retry(&value)? {
                Some(retry) => self.retry = retry,
                None => debug!("Ignoring non-map 'retry' value ({})", value.kind()),
            },
            ConfigKey::OutlineVariablesAuto => {
                self.outline_variables_auto = value.is_boolean_true();
            }
            ConfigKey::HttpClientClass => {
                self.client_class = if value.is_null() {
                    None
                } else {
                    Some(string(name, &value)?.to_string())
                };
            }
            ConfigKey::HttpClientInstance => {
                let instance = client_instance(&value)?;
                if let Some(client) = &instance {
                    info!("Installed http client instance '{}'", client.name());
                }
                self.client_instance = instance;
            }
            ConfigKey::Charset => {
                self.charset = if value.is_null() {
                    None
                } else {
                    Some(Charset::for_name(string(name, &value)?)?)
                };
            }
            ConfigKey::Ssl => self.ssl = self.coerce_ssl(&value)?,
            ConfigKey::FollowRedirects => self.follow_redirects = value.is_boolean_true(),
            ConfigKey::ConnectTimeout => self.connect_timeout = non_negative_int(name, &value)?,
            ConfigKey::ReadTimeout => self.read_timeout = non_negative_int(name, &value)?,
            ConfigKey::Proxy => self.proxy = self.coerce_proxy(&value)?,
            ConfigKey::UserDefined => self.user_defined = optional_map(name, value)?,
        }

        let outcome = ConfigureOutcome {
            key,
            requires_rebuild: key.requires_rebuild(),
        };
        debug!(
            "Configured '{key}' (client rebuild: {})",
            outcome.requires_rebuild
        );
        Ok(outcome)
    }

    // =========================================================================
    // Structured coercions
    // =========================================================================

    fn coerce_report(&self, value: &Value) -> Result<ReportSettings> {
        match value {
            Value::Map(map) => Ok(ReportSettings {
                show_log: optional_bool(map, "report", "showLog")?
                    .unwrap_or(self.report.show_log),
                show_all_steps: optional_bool(map, "report", "showAllSteps")?
                    .unwrap_or(self.report.show_all_steps),
            }),
            other => {
                let enabled = other.is_boolean_true();
                Ok(ReportSettings {
                    show_log: enabled,
                    show_all_steps: enabled,
                })
            }
        }
    }

    /// `None` when the value is not a map and the key is to be ignored
    fn coerce_retry(&self, value: &Value) -> Result<Option<RetrySettings>> {
        let Value::Map(map) = value else {
            return Ok(None);
        };
        Ok(Some(RetrySettings {
            interval: optional_int(map, "retry", "interval")?.unwrap_or(self.retry.interval),
            count: optional_int(map, "retry", "count")?.unwrap_or(self.retry.count),
        }))
    }

    fn coerce_ssl(&self, value: &Value) -> Result<SslSettings> {
        let mut ssl = self.ssl.clone();
        match value {
            Value::String(algorithm) => {
                ssl.enabled = true;
                ssl.algorithm.clone_from(algorithm);
            }
            Value::Map(map) => {
                ssl.enabled = true;
                for (name, slot) in [
                    ("keyStore", &mut ssl.key_store),
                    ("keyStorePassword", &mut ssl.key_store_password),
                    ("keyStoreType", &mut ssl.key_store_type),
                    ("trustStore", &mut ssl.trust_store),
                    ("trustStorePassword", &mut ssl.trust_store_password),
                    ("trustStoreType", &mut ssl.trust_store_type),
                ] {
                    if let Some(text) = optional_string(map, "ssl", name)? {
                        *slot = Some(text);
                    }
                }
                if let Some(algorithm) = optional_string(map, "ssl", "algorithm")? {
                    ssl.algorithm = algorithm;
                }
                if let Some(trust_all) = optional_bool(map, "ssl", "trustAll")? {
                    ssl.trust_all = trust_all;
                }
            }
            other => ssl.enabled = other.is_boolean_true(),
        }
        Ok(ssl)
    }

    fn coerce_proxy(&self, value: &Value) -> Result<ProxySettings> {
        match value {
            Value::Null => Ok(ProxySettings {
                uri: None,
                ..self.proxy.clone()
            }),
            Value::String(uri) => Ok(ProxySettings {
                uri: Some(uri.clone()),
                ..self.proxy.clone()
            }),
            other => {
                let map = other.get_as_map().map_err(|m| m.for_key("proxy"))?;
                Ok(ProxySettings {
                    uri: optional_string(map, "proxy", "uri")?,
                    username: optional_string(map, "proxy", "username")?,
                    password: optional_string(map, "proxy", "password")?,
                    non_proxy_hosts: field(map, "nonProxyHosts")
                        .map(non_proxy_hosts)
                        .transpose()?,
                })
            }
        }
    }
}

// =============================================================================
// Value helpers
// =============================================================================

/// A map entry, treating an explicit `null` like a missing key
fn field<'a>(map: &'a ValueMap, name: &str) -> Option<&'a Value> {
    map.get(name).filter(|v| !v.is_null())
}

fn string<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value.get_as_string().map_err(|m| m.for_key(key))
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>> {
    let items = value.get_as_list().map_err(|m| m.for_key(key))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.get_as_string()
                .map(str::to_string)
                .map_err(|m| m.for_key(format!("{key}[{i}]")))
        })
        .collect()
}

fn non_proxy_hosts(value: &Value) -> Result<NonProxyHosts> {
    const KEY: &str = "proxy.nonProxyHosts";
    NonProxyHosts::new(string_list(KEY, value)?).map_err(|e| Error::InvalidValue {
        key: KEY.to_string(),
        reason: e.to_string(),
    })
}

fn optional_map(key: &str, value: Value) -> Result<Option<ValueMap>> {
    if value.is_null() {
        return Ok(None);
    }
    value.into_map().map(Some).map_err(|m| m.for_key(key))
}

fn optional_string(map: &ValueMap, parent: &str, name: &str) -> Result<Option<String>> {
    field(map, name)
        .map(|v| string(&format!("{parent}.{name}"), v).map(str::to_string))
        .transpose()
}

fn optional_bool(map: &ValueMap, parent: &str, name: &str) -> Result<Option<bool>> {
    field(map, name)
        .map(|v| {
            v.get_as_bool()
                .map_err(|m| m.for_key(format!("{parent}.{name}")))
        })
        .transpose()
}

fn optional_int(map: &ValueMap, parent: &str, name: &str) -> Result<Option<u32>> {
    field(map, name)
        .map(|v| non_negative_int(&format!("{parent}.{name}"), v))
        .transpose()
}

fn non_negative_int(key: &str, value: &Value) -> Result<u32> {
    let n = value.get_as_int().map_err(|m| m.for_key(key))?;
    u32::try_from(n).map_err(|_| Error::InvalidValue {
        key: key.to_string(),
        reason: format!("expected a whole number between 0 and {}, got {n}", u32::MAX),
    })
}

fn client_instance(value: &Value) -> Result<Option<ClientHandle>> {
    if value.is_null() {
        return Ok(None);
    }
    value
        .get_value::<ClientHandle>()
        .map(|handle| Some(ClientHandle::clone(&handle)))
        .map_err(|m| m.for_key(ConfigKey::HttpClientInstance.as_str()))
}

// =============================================================================
// Tests
// =============================================================================
