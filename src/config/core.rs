use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::{Path, PathBuf};

use super::{MonitorConfig, home_dir, smart_load};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Repository-local config file name, without extension
const LOCAL_CONFIG_STEM: &str = "path-monitor";

impl MonitorConfig {
    /// Load the merged configuration.
    ///
    /// A custom config file replaces the user and local files; environment
    /// variables always win.
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(custom_config);
        let config: Self = figment.extract().context("Invalid path-monitor configuration")?;
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn figment(custom_config: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !custom_path.exists() {
                tracing::warn!("Config file {} not found, using defaults", custom_path.display());
            }
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            let user_config = Self::user_config_path();
            figment = figment
                .merge(Toml::file(&user_config))
                .merge(Json::file(user_config.with_extension("json")))
                .merge(Yaml::file(user_config.with_extension("yaml")))
                .merge(Yaml::file(user_config.with_extension("yml")))
                .merge(Toml::file(format!("{LOCAL_CONFIG_STEM}.toml")))
                .merge(Json::file(format!("{LOCAL_CONFIG_STEM}.json")))
                .merge(Yaml::file(format!("{LOCAL_CONFIG_STEM}.yaml")))
                .merge(Yaml::file(format!("{LOCAL_CONFIG_STEM}.yml")));
        }

        figment.merge(Env::prefixed("PATH_MONITOR_").split("__"))
    }

    pub fn user_config_path() -> PathBuf {
        home_dir().join(".config/path-monitor/config.toml")
    }
}
