use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::app::View;

/// Timings and outcome odds for the simulated wallet flows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Wallet extension detection
    pub detect_ms: u64,
    /// Approval prompt base delay
    pub approve_ms: u64,
    /// Upper bound of the random extra approval delay
    pub approve_jitter_ms: u64,
    /// Signing challenge
    pub sign_ms: u64,
    pub switch_chain_ms: u64,
    /// Probability in 0..=1 that a connect attempt is rejected
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            detect_ms: 400,
            approve_ms: 800,
            approve_jitter_ms: 700,
            sign_ms: 400,
            switch_chain_ms: 600,
            failure_rate: 0.1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// No delays, no failures
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            detect_ms: 0,
            approve_ms: 0,
            approve_jitter_ms: 0,
            sign_ms: 0,
            switch_chain_ms: 0,
            failure_rate: 0.0,
            seed: Some(7),
        }
    }

    pub fn detect_delay(&self) -> Duration {
        Duration::from_millis(self.detect_ms)
    }

    pub fn sign_delay(&self) -> Duration {
        Duration::from_millis(self.sign_ms)
    }

    pub fn switch_chain_delay(&self) -> Duration {
        Duration::from_millis(self.switch_chain_ms)
    }
}

/// Hex colour overrides, e.g. `accent = "#00D4FF"`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Wallet simulation timings
    pub simulation: SimulationConfig,

    /// Persisted sessions older than this are discarded
    pub session_max_age_days: u32,

    /// View shown after connecting
    pub default_view: View,

    /// Start with balances masked in the asset vault
    pub hide_balances: bool,

    /// Token ids starred in the assets table
    pub favorites: Vec<String>,

    /// Desktop notifications for CLI connect/disconnect
    pub notifications: bool,

    pub theme: ThemeOverrides,

    /// File this config was read from; `None` means the default location
    #[serde(skip)]
    pub path: Option<PathBuf>,

    /// Set when the file on disk could not be parsed; `save` leaves it alone
    #[serde(skip)]
    pub read_only: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            session_max_age_days: crate::wallet::session::DEFAULT_MAX_AGE_DAYS as u32,
            default_view: View::Overview,
            hide_balances: false,
            favorites: vec!["1".to_string(), "3".to_string()],
            notifications: true,
            theme: ThemeOverrides::default(),
            path: None,
            read_only: false,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("kinetifi");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Ok(Self::load_from(path)),
            Err(_) => Ok(AppConfig::default()),
        }
    }

    pub fn load_from(path: PathBuf) -> Self {
        if !path.exists() {
            let config = AppConfig {
                path: Some(path),
                ..AppConfig::default()
            };
            let _ = config.save();
            return config;
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    return AppConfig {
                        path: Some(path),
                        ..config
                    }
                }
                Err(e) => tracing::warn!("Failed to parse config: {}", e),
            },
            Err(e) => tracing::warn!("Failed to read config: {}", e),
        }

        // Keep the user's broken file around for them to fix
        AppConfig {
            path: Some(path),
            read_only: true,
            ..AppConfig::default()
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(p) => p.clone(),
            None => Self::config_path()?,
        };
        if self.read_only {
            anyhow::bail!("{} has errors, fix it to save changes", path.display());
        }
        let content = toml::to_string_pretty(&self.clone().sanitized())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clamp out-of-range values and drop duplicate favourites
    fn sanitized(mut self) -> Self {
        let rate = self.simulation.failure_rate;
        self.simulation.failure_rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };

        if self.session_max_age_days == 0 {
            self.session_max_age_days = 1;
        }

        let mut seen = std::collections::HashSet::new();
        self.favorites.retain(|id| !id.is_empty() && seen.insert(id.clone()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            simulation: SimulationConfig {
                failure_rate: 0.25,
                seed: Some(42),
                ..SimulationConfig::default()
            },
            default_view: View::Defi,
            hide_balances: true,
            favorites: vec!["2".to_string()],
            theme: ThemeOverrides {
                accent: Some("#FF00AA".to_string()),
                ..ThemeOverrides::default()
            },
            ..AppConfig::default()
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::parse(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::parse("hide_balances = true\n[simulation]\nsign_ms = 10\n").unwrap();

        assert!(config.hide_balances);
        assert_eq!(config.simulation.sign_ms, 10);
        assert_eq!(config.simulation.detect_ms, 400);
        assert_eq!(config.session_max_age_days, 7);
        assert_eq!(config.favorites, vec!["1", "3"]);
        assert_eq!(config.default_view, View::Overview);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from(path.clone());
        assert!(!config.read_only);
        let written = AppConfig::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.favorites, config.favorites);
    }

    #[test]
    fn test_broken_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let original = "hide_balances = tru\n# my notes\n[theme]\naccent = \"#FF00AA\"\n";
        std::fs::write(&path, original).unwrap();

        let mut config = AppConfig::load_from(path.clone());
        assert!(config.read_only);
        assert_eq!(config.favorites, vec!["1", "3"]);

        config.favorites.push("5".to_string());
        assert!(config.save().is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = AppConfig::parse(
            "session_max_age_days = 0\nfavorites = [\"1\", \"1\", \"\"]\n[simulation]\nfailure_rate = 3.5\n",
        )
        .unwrap();

        assert_eq!(config.simulation.failure_rate, 1.0);
        assert_eq!(config.session_max_age_days, 1);
        assert_eq!(config.favorites, vec!["1"]);
    }
}
