//! Validation configuration.
//!
//! Configuration controls how constraint violations are reported: which
//! language their messages use and whether checking stops at the first
//! violation. It can be loaded from a TOML file or from the environment.

use crate::core::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Environment variable selecting the message locale.
pub const LOCALE_ENV: &str = "PARAMBIND_LOCALE";

/// Environment variable toggling fail-fast constraint checking.
pub const FAIL_FAST_ENV: &str = "PARAMBIND_FAIL_FAST";

/// Language used for constraint violation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "zh")]
    Chinese,
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" | "en_us" | "en-us" => Ok(Locale::English),
            "zh" | "chinese" | "zh_cn" | "zh-cn" | "simplified_chinese" => Ok(Locale::Chinese),
            other => Err(ConfigError::UnknownLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::English => write!(f, "en"),
            Locale::Chinese => write!(f, "zh"),
        }
    }
}

/// Options for the default constraint engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Locale for violation messages.
    pub locale: Locale,
    /// Stop checking a record after its first violation.
    pub fail_fast: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            locale: Locale::English,
            fail_fast: true,
        }
    }
}

impl ValidationConfig {
    /// Parse a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Build a configuration from `PARAMBIND_LOCALE` and `PARAMBIND_FAIL_FAST`.
    ///
    /// Unknown or unparsable values are logged and replaced by defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(locale) = std::env::var(LOCALE_ENV) {
            if !locale.trim().is_empty() {
                match locale.parse() {
                    Ok(locale) => config.locale = locale,
                    Err(_) => log::warn!("{} language not found.", locale),
                }
            }
        }

        if let Ok(fail_fast) = std::env::var(FAIL_FAST_ENV) {
            match fail_fast.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.fail_fast = true,
                "0" | "false" | "no" | "off" => config.fail_fast = false,
                other => log::warn!("Ignoring {}={}", FAIL_FAST_ENV, other),
            }
        }

        config
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set fail-fast checking.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::English);
        assert_eq!("zh_CN".parse::<Locale>().unwrap(), Locale::Chinese);
        assert!("klingon".parse::<Locale>().is_err());
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = ValidationConfig::from_toml_str("").unwrap();
        assert_eq!(config, ValidationConfig::default());

        let config = ValidationConfig::from_toml_str("locale = \"zh\"\nfail_fast = false").unwrap();
        assert_eq!(config.locale, Locale::Chinese);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(ValidationConfig::from_toml_str("locale = 3").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "locale = \"chinese\"").unwrap();

        let config = ValidationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.locale, Locale::Chinese);
        assert!(config.fail_fast);
    }

    #[test]
    fn test_missing_file() {
        let result = ValidationConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
