//! kitchen-rs: a server-rendered blog front-end for a headless CMS
//!
//! Posts are fetched from a Sanity-compatible query API and rendered to HTML
//! with embedded Tera templates, either per request by the server or once
//! into static files by the generator.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod theme;
pub mod view;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::path::Path;

/// The main application
#[derive(Clone)]
pub struct Kitchen {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Kitchen {
    /// Create a new instance from a directory.
    ///
    /// Reads `_config.yml` when present, then picks up the CMS token from
    /// the environment.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Export the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_reads_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Test Kitchen\npublic_dir: out\ncms:\n  project_id: abc\n",
        )
        .unwrap();

        let kitchen = Kitchen::new(dir.path()).unwrap();
        assert_eq!(kitchen.config.title, "Test Kitchen");
        assert_eq!(kitchen.config.cms.project_id, "abc");
        assert_eq!(kitchen.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_new_without_config() {
        let dir = TempDir::new().unwrap();
        let kitchen = Kitchen::new(dir.path()).unwrap();
        assert_eq!(kitchen.config.title, "xorbi's kitchen");
        assert_eq!(kitchen.public_dir, dir.path().join("public"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: [unclosed").unwrap();
        assert!(Kitchen::new(dir.path()).is_err());
    }
}
