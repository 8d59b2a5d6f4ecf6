use crate::constants;
use crate::error::{CartError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            constants::BACKEND_FILE => Ok(StorageBackend::File),
            constants::BACKEND_SQLITE => Ok(StorageBackend::Sqlite),
            constants::BACKEND_MEMORY => Ok(StorageBackend::Memory),
            other => Err(CartError::Config(format!(
                "Unknown storage backend '{}'. Available: {}",
                other,
                constants::get_supported_backends().join(", ")
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::File => constants::BACKEND_FILE,
            StorageBackend::Sqlite => constants::BACKEND_SQLITE,
            StorageBackend::Memory => constants::BACKEND_MEMORY,
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_root: PathBuf,
    pub cart_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_root: PathBuf::from("data"),
            cart_key: constants::CART_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "food_cart.log".to_string(),
            default_directive: "food_cart=info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `FOOD_CART_CONFIG` (or `config.toml`), then applies
    /// environment overrides. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("FOOD_CART_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&path))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            CartError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.storage.cart_key.trim().is_empty() {
            return Err(CartError::Config("storage.cart_key must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(backend) = std::env::var("FOOD_CART_STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Ok(root) = std::env::var("FOOD_CART_DATA_ROOT") {
            self.storage.data_root = PathBuf::from(root);
        }
        if let Ok(key) = std::env::var("FOOD_CART_CART_KEY") {
            if !key.trim().is_empty() {
                self.storage.cart_key = key;
            }
        }
        if let Ok(dir) = std::env::var("FOOD_CART_LOG_DIR") {
            self.logging.directory = PathBuf::from(dir);
        }
        Ok(())
    }
}
