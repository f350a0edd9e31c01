//! Engine Configuration
//!
//! Selects the tree hashing rule and the canonical message layout.

use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::proof::merkle::HashMode;
use crate::statement::canonical::MessageFormat;

/// Environment variable selecting the hash mode.
pub const HASH_MODE_ENV: &str = "PROVENANCE_HASH_MODE";

/// Environment variable selecting the canonical message format.
pub const MESSAGE_FORMAT_ENV: &str = "PROVENANCE_MESSAGE_FORMAT";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Unknown hash mode name.
    #[error("unknown hash mode '{0}' (expected compat or domain-separated)")]
    UnknownHashMode(String),
    /// Unknown message format name.
    #[error("unknown message format '{0}' (expected length-prefixed or delimited)")]
    UnknownMessageFormat(String),
}

impl FromStr for HashMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compat" => Ok(Self::Compat),
            "domain-separated" | "domain" => Ok(Self::DomainSeparated),
            other => Err(ConfigError::UnknownHashMode(other.to_string())),
        }
    }
}

impl FromStr for MessageFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length-prefixed" => Ok(Self::LengthPrefixed),
            "delimited" => Ok(Self::Delimited),
            other => Err(ConfigError::UnknownMessageFormat(other.to_string())),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Leaf/node hashing rule.
    pub hash_mode: HashMode,
    /// Canonical message layout for signed statements.
    pub message_format: MessageFormat,
}

impl EngineConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(mode) = lookup(HASH_MODE_ENV) {
            config.hash_mode = mode.parse()?;
        }
        if let Some(format) = lookup(MESSAGE_FORMAT_ENV) {
            config.message_format = format.parse()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.hash_mode, HashMode::Compat);
        assert_eq!(config.message_format, MessageFormat::LengthPrefixed);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            (HASH_MODE_ENV, "Domain-Separated"),
            (MESSAGE_FORMAT_ENV, " delimited "),
        ]))
        .unwrap();
        assert_eq!(config.hash_mode, HashMode::DomainSeparated);
        assert_eq!(config.message_format, MessageFormat::Delimited);
    }

    #[test]
    fn test_unknown_values() {
        let result = EngineConfig::from_lookup(lookup_from(&[(HASH_MODE_ENV, "sorted")]));
        assert_eq!(result, Err(ConfigError::UnknownHashMode("sorted".into())));

        let result = EngineConfig::from_lookup(lookup_from(&[(MESSAGE_FORMAT_ENV, "json")]));
        assert_eq!(result, Err(ConfigError::UnknownMessageFormat("json".into())));
    }

    #[test]
    fn test_names_roundtrip() {
        for mode in [HashMode::Compat, HashMode::DomainSeparated] {
            assert_eq!(mode.as_str().parse::<HashMode>().unwrap(), mode);
        }
        for format in [MessageFormat::LengthPrefixed, MessageFormat::Delimited] {
            assert_eq!(format.as_str().parse::<MessageFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_json_config() {
        let config: EngineConfig = serde_json::from_str(r#"{"hash_mode":"domain-separated"}"#).unwrap();
        assert_eq!(config.hash_mode, HashMode::DomainSeparated);
        assert_eq!(config.message_format, MessageFormat::LengthPrefixed);
    }
}
