//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub language: String,

    // Chrome
    #[serde(default)]
    pub footer: FooterConfig,

    // Content service
    #[serde(default)]
    pub cms: CmsConfig,

    // Theme
    #[serde(default)]
    pub theme: ThemeConfig,

    // Post previews on the list page
    #[serde(default)]
    pub preview: PreviewConfig,

    // Server
    #[serde(default)]
    pub server: ServerConfig,

    // Directory for `generate` output
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "xorbi's kitchen".to_string(),
            subtitle: "Covering programming, tech and much more :)".to_string(),
            language: "en".to_string(),
            footer: FooterConfig::default(),
            cms: CmsConfig::default(),
            theme: ThemeConfig::default(),
            preview: PreviewConfig::default(),
            server: ServerConfig::default(),
            public_dir: "public".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Pick up the CMS credential from the environment.
    ///
    /// The token is never read from `_config.yml`; deployments inject it
    /// through the variable named by `cms.token_env`.
    pub fn apply_env(&mut self) {
        if self.cms.token_env.is_empty() {
            return;
        }
        match std::env::var(&self.cms.token_env) {
            Ok(token) if !token.trim().is_empty() => {
                self.cms.token = Some(token.trim().to_string());
                tracing::debug!("Loaded CMS token from ${}", self.cms.token_env);
            }
            Ok(_) => {}
            Err(std::env::VarError::NotPresent) => {
                tracing::debug!(
                    "${} not set, querying the CMS anonymously",
                    self.cms.token_env
                );
            }
            Err(e) => {
                tracing::warn!("Could not read ${}: {}", self.cms.token_env, e);
            }
        }
    }
}

/// Footer link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub link_text: String,
    pub link_url: String,
    pub tagline: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            link_text: "Powered by Sanity".to_string(),
            link_url: "https://www.sanity.io".to_string(),
            tagline: "Content management made simple".to_string(),
        }
    }
}

/// Content service coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Name of the environment variable holding the bearer token
    pub token_env: String,
    /// Image CDN host
    pub image_host: String,
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            timeout: 10,
            token_env: "KITCHEN_CMS_TOKEN".to_string(),
            image_host: "https://cdn.sanity.io".to_string(),
            token: None,
        }
    }
}

/// Theme preference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub default: String,
    pub storage_key: String,
    pub available: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: "light".to_string(),
            storage_key: "xorbi-kitchen-theme".to_string(),
            available: vec!["light".to_string(), "dark".to_string()],
        }
    }
}

/// List page preview configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Maximum preview length in characters
    pub length: usize,
    pub omission: String,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            length: 150,
            omission: "...".to_string(),
            image_width: 300,
            image_height: 200,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.theme.default, "light");
        assert_eq!(config.theme.storage_key, "xorbi-kitchen-theme");
        assert_eq!(config.preview.length, 150);
        assert_eq!(config.cms.api_version, "2024-01-01");
        assert!(config.cms.token.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Kitchen
cms:
  project_id: abc123
  dataset: blogdataset
  use_cdn: false
theme:
  default: dark
preview:
  length: 80
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Kitchen");
        assert_eq!(config.cms.project_id, "abc123");
        assert_eq!(config.cms.dataset, "blogdataset");
        assert!(!config.cms.use_cdn);
        // Unspecified fields keep their defaults
        assert_eq!(config.cms.api_version, "2024-01-01");
        assert_eq!(config.theme.default, "dark");
        assert_eq!(config.theme.available, vec!["light", "dark"]);
        assert_eq!(config.preview.length, 80);
        assert_eq!(config.preview.omission, "...");
    }

    #[test]
    fn test_token_is_not_read_from_file() {
        let yaml = r#"
cms:
  project_id: abc123
  token: should-be-ignored
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.cms.token.is_none());
    }

    #[test]
    fn test_apply_env_reads_token() {
        let mut config = SiteConfig::default();
        config.cms.token_env = "KITCHEN_RS_TEST_TOKEN_VAR".to_string();
        std::env::set_var("KITCHEN_RS_TEST_TOKEN_VAR", " secret ");
        config.apply_env();
        std::env::remove_var("KITCHEN_RS_TEST_TOKEN_VAR");
        assert_eq!(config.cms.token.as_deref(), Some("secret"));
    }
}
