//! Configuration file support for SkillPath.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/skillpath/config.toml`.

use crate::{Error, Result, SortKey};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub shop: ShopConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Snapshot file locations; relative paths resolve against the data dir
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_products_file")]
    pub products: PathBuf,

    #[serde(default = "default_progress_file")]
    pub progress: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            products: default_products_file(),
            progress: default_progress_file(),
        }
    }
}

/// Shop behaviour configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default = "default_featured_min_rating")]
    pub featured_min_rating: f64,

    #[serde(default)]
    pub default_sort: SortKey,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            featured_min_rating: default_featured_min_rating(),
            default_sort: SortKey::default(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("skillpath")
}

fn default_products_file() -> PathBuf {
    PathBuf::from("products.json")
}

fn default_progress_file() -> PathBuf {
    PathBuf::from("progress.json")
}

fn default_featured_min_rating() -> f64 {
    4.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("skillpath").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let rating = self.shop.featured_min_rating;
        if !(0.0..=5.0).contains(&rating) {
            return Err(Error::Config(format!(
                "shop.featured_min_rating must be between 0 and 5, got {}",
                rating
            )));
        }
        Ok(())
    }

    /// Products snapshot path
    pub fn products_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.files.products)
    }

    /// Progress file path
    pub fn progress_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.files.progress)
    }
}
