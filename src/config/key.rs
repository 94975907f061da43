//! Recognized `configure` keys
//!
//! Raw keys are parsed into [`ConfigKey`] before dispatch, so an unknown key
//! is rejected at the boundary and the dispatcher can match exhaustively.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A key accepted by [`ConfigStore::configure`](crate::ConfigStore::configure)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Headers,
    MaskRequestHeaders,
    Cookies,
    ResponseHeaders,
    LowerCaseResponseHeaders,
    Cors,
    LogPrettyResponse,
    LogPrettyRequest,
    PrintEnabled,
    AfterScenario,
    AfterFeature,
    Report,
    Driver,
    Retry,
    OutlineVariablesAuto,
    HttpClientClass,
    HttpClientInstance,
    Charset,
    Ssl,
    FollowRedirects,
    ConnectTimeout,
    ReadTimeout,
    Proxy,
    UserDefined,
}

impl ConfigKey {
    /// Every recognized key, in dispatch order
    pub const ALL: [ConfigKey; 24] = [
        ConfigKey::Headers,
        ConfigKey::MaskRequestHeaders,
        ConfigKey::Cookies,
        ConfigKey::ResponseHeaders,
        ConfigKey::LowerCaseResponseHeaders,
        ConfigKey::Cors,
        ConfigKey::LogPrettyResponse,
        ConfigKey::LogPrettyRequest,
        ConfigKey::PrintEnabled,
        ConfigKey::AfterScenario,
        ConfigKey::AfterFeature,
        ConfigKey::Report,
        ConfigKey::Driver,
        ConfigKey::Retry,
        ConfigKey::OutlineVariablesAuto,
        ConfigKey::HttpClientClass,
        ConfigKey::HttpClientInstance,
        ConfigKey::Charset,
        ConfigKey::Ssl,
        ConfigKey::FollowRedirects,
        ConfigKey::ConnectTimeout,
        ConfigKey::ReadTimeout,
        ConfigKey::Proxy,
        ConfigKey::UserDefined,
    ];

    /// The key as written in test scripts
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Headers => "headers",
            ConfigKey::MaskRequestHeaders => "maskRequestHeaders",
            ConfigKey::Cookies => "cookies",
            ConfigKey::ResponseHeaders => "responseHeaders",
            ConfigKey::LowerCaseResponseHeaders => "lowerCaseResponseHeaders",
            ConfigKey::Cors => "cors",
            ConfigKey::LogPrettyResponse => "logPrettyResponse",
            ConfigKey::LogPrettyRequest => "logPrettyRequest",
            ConfigKey::PrintEnabled => "printEnabled",
            ConfigKey::AfterScenario => "afterScenario",
            ConfigKey::AfterFeature => "afterFeature",
            ConfigKey::Report => "report",
            ConfigKey::Driver => "driver",
            ConfigKey::Retry => "retry",
            ConfigKey::OutlineVariablesAuto => "outlineVariablesAuto",
            ConfigKey::HttpClientClass => "httpClientClass",
            ConfigKey::HttpClientInstance => "httpClientInstance",
            ConfigKey::Charset => "charset",
            ConfigKey::Ssl => "ssl",
            ConfigKey::FollowRedirects => "followRedirects",
            ConfigKey::ConnectTimeout => "connectTimeout",
            ConfigKey::ReadTimeout => "readTimeout",
            ConfigKey::Proxy => "proxy",
            ConfigKey::UserDefined => "userDefined",
        }
    }

    /// Whether changing this key invalidates an already built network client
    #[must_use]
    pub fn requires_rebuild(self) -> bool {
        matches!(
            self,
            ConfigKey::HttpClientClass
                | ConfigKey::HttpClientInstance
                | ConfigKey::Charset
                | ConfigKey::Ssl
                | ConfigKey::FollowRedirects
                | ConfigKey::ConnectTimeout
                | ConfigKey::ReadTimeout
                | ConfigKey::Proxy
                | ConfigKey::UserDefined
        )
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    /// Parse a raw key. Surrounding whitespace is ignored; matching is
    /// case-sensitive.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim();
        ConfigKey::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| Error::UnknownKey(key.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
