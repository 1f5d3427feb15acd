//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Configuration for the balance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Category summed as total assets
    pub assets_category: String,

    /// Category summed as total liabilities
    pub liabilities_category: String,

    /// Category summed as total equity
    pub equity_category: String,

    /// Allowed |A - (L + E)| as a fraction of total assets
    pub balance_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            assets_category: "Assets".to_string(),
            liabilities_category: "Liabilities".to_string(),
            equity_category: "Equity".to_string(),
            balance_tolerance: 0.05,
        }
    }
}

impl ValidationConfig {
    /// Create a strict configuration (1% tolerance)
    pub fn strict() -> Self {
        Self {
            balance_tolerance: 0.01,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if !self.balance_tolerance.is_finite() || self.balance_tolerance < 0.0 {
            return Err(GatekeeperError::Config(format!(
                "balance_tolerance must be a non-negative number, got {}",
                self.balance_tolerance
            )));
        }
        for (field, value) in [
            ("assets_category", &self.assets_category),
            ("liabilities_category", &self.liabilities_category),
            ("equity_category", &self.equity_category),
        ] {
            if value.trim().is_empty() {
                return Err(GatekeeperError::Config(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, GatekeeperError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| GatekeeperError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.balance_tolerance, 0.05);
        assert_eq!(config.assets_category, "Assets");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = ValidationConfig::strict();
        assert_eq!(config.balance_tolerance, 0.01);
        assert_eq!(config.equity_category, "Equity");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ValidationConfig::from_toml("balance_tolerance = 0.1").unwrap();
        assert_eq!(config.balance_tolerance, 0.1);
        assert_eq!(config.liabilities_category, "Liabilities");
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let result = ValidationConfig::from_toml("balance_tolerance = -0.5");
        assert!(matches!(result, Err(GatekeeperError::Config(_))));
    }

    #[test]
    fn test_empty_category_rejected() {
        let config = ValidationConfig {
            equity_category: " ".to_string(),
            ..ValidationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
