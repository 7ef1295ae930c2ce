//! Theme preference settings
//!
//! Built once from `_config.yml` at startup and handed to the views. The
//! visitor's choice is persisted in a cookie named by `storage_key`.

use serde::Serialize;

use crate::config::ThemeConfig;
use crate::helpers::{encode_segment, theme_path};

/// Recognized themes, the default, and where the preference is stored
#[derive(Debug, Clone)]
pub struct ThemeSettings {
    default: String,
    storage_key: String,
    available: Vec<String>,
}

/// One entry of the theme switcher
#[derive(Debug, Clone, Serialize)]
pub struct ThemeOption {
    pub name: String,
    pub path: String,
    pub active: bool,
}

impl ThemeSettings {
    /// Normalize the configured themes.
    ///
    /// Blank names are dropped and duplicates removed; the default is always
    /// one of the available themes.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let default = match config.default.trim() {
            "" => "light".to_string(),
            name => name.to_string(),
        };

        let mut available: Vec<String> = Vec::with_capacity(config.available.len() + 1);
        for name in config.available.iter().map(|n| n.trim()) {
            if !name.is_empty() && !available.iter().any(|a| a == name) {
                available.push(name.to_string());
            }
        }
        if !available.contains(&default) {
            tracing::warn!(
                "Default theme {:?} is not listed in theme.available, adding it",
                default
            );
            available.insert(0, default.clone());
        }

        let storage_key = match config.storage_key.trim() {
            "" => ThemeConfig::default().storage_key,
            key => key.to_string(),
        };

        Self {
            default,
            storage_key,
            available,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn default_theme(&self) -> &str {
        &self.default
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.available.iter().any(|a| a == name)
    }

    /// The theme to apply for a stored preference; unknown values use the default
    pub fn resolve<'a>(&'a self, stored: Option<&'a str>) -> &'a str {
        match stored.map(str::trim) {
            Some(name) if self.is_known(name) => name,
            Some(name) => {
                tracing::debug!("Ignoring unknown theme preference {:?}", name);
                &self.default
            }
            None => &self.default,
        }
    }

    /// Switcher entries; each link persists that theme and returns to `return_to`
    pub fn options(&self, current: &str, return_to: &str) -> Vec<ThemeOption> {
        self.available
            .iter()
            .map(|name| ThemeOption {
                name: name.clone(),
                path: format!("{}?to={}", theme_path(name), encode_segment(return_to)),
                active: name == current,
            })
            .collect()
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
