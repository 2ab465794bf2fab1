//! Ledger configuration loaded from a TOML file.
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::ledger::{ChangeOrder, PriceMultipliers};

/// Ledger settings. Every field falls back to its default when absent.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Order used when breaking payment change into coins.
    pub change_order: ChangeOrder,
    /// Merchant multipliers overriding the defaults.
    pub multipliers: MultiplierOverrides,
}

/// Per-category multiplier overrides, keyed by category name.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MultiplierOverrides {
    pub buy: HashMap<String, f64>,
    pub sell: HashMap<String, f64>,
}

/// Errors that can occur while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl LedgerConfig {
    /// Reads and parses a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Default multipliers with the configured overrides applied.
    pub fn price_multipliers(&self) -> PriceMultipliers {
        PriceMultipliers::default().with_overrides(&self.multipliers.buy, &self.multipliers.sell)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::ledger::{ChangeOrder, ConfigError, LedgerConfig};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LedgerConfig::from_toml_str("").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.change_order, ChangeOrder::Ascending);
    }

    #[test]
    fn test_parse_config() {
        let config = LedgerConfig::from_toml_str(
            r#"
            change_order = "descending"

            [multipliers.buy]
            Weapon = 2.0

            [multipliers.sell]
            "Daily Food and Lodging" = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.change_order, ChangeOrder::Descending);

        let multipliers = config.price_multipliers();
        assert_eq!(multipliers.buy_multiplier("Weapon", false), 2.0);
        assert_eq!(multipliers.buy_multiplier("Armor", false), 1.0);
        assert_eq!(multipliers.sell_multiplier("Daily Food and Lodging", false), 0.0);
        assert_eq!(multipliers.sell_multiplier("Armor", false), 0.5);
    }

    #[test]
    fn test_invalid_change_order() {
        let result = LedgerConfig::from_toml_str(r#"change_order = "sideways""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = LedgerConfig::from_path(Path::new("/nonexistent/ledger.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
