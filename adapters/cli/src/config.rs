//! TOML configuration of the command-line driver.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use pomo_patch_core::{EconomyRules, GardenLayout, SessionRules};
use pomo_patch_service::LocalConfig;
use serde::{Deserialize, Serialize};

/// Complete driver configuration. Every section may be omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GardenConfig {
    pub(crate) account: AccountSection,
    pub(crate) rules: EconomyRules,
    pub(crate) session: SessionRules,
    pub(crate) layout: GardenLayout,
    pub(crate) sync: SyncSection,
    pub(crate) local: LocalConfig,
}

impl GardenConfig {
    /// Reads and parses a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse TOML")
    }
}

/// Identity the driver plays as.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AccountSection {
    pub(crate) email: String,
}

impl Default for AccountSection {
    fn default() -> Self {
        Self {
            email: "gardener@example.com".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SyncSection {
    /// Seconds of game time between full resyncs; zero disables them.
    pub(crate) resync_interval_secs: u64,
}

impl SyncSection {
    pub(crate) const fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            resync_interval_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sections_keep_defaults() {
        let config = GardenConfig::from_toml(
            r#"
            [account]
            email = "tester@example.com"

            [rules]
            seed_price = 80

            [sync]
            resync_interval_secs = 0
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.account.email, "tester@example.com");
        assert_eq!(config.rules.seed_price, 80);
        assert_eq!(config.rules.water_price, 25, "unnamed fields keep defaults");
        assert!(config.sync.resync_interval().is_zero());
        assert_eq!(config.session, SessionRules::default());
        assert_eq!(config.local, LocalConfig::default());
    }

    #[test]
    fn bundled_config_parses() {
        let config = GardenConfig::from_toml(include_str!("../../../config/garden.toml"))
            .expect("bundled config parses");
        assert_eq!(config.layout, GardenLayout::default());
        assert_eq!(config.rules, EconomyRules::default());
    }

    #[test]
    fn unknown_types_are_reported() {
        let error = GardenConfig::from_toml("[rules]\nseed_price = \"cheap\"")
            .expect_err("string price is invalid");
        assert!(format!("{error:#}").contains("cheap"), "{error:#}");
    }
}
