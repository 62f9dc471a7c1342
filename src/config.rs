//! Config module - Quản lý cấu hình CryptoBridge (cryptobridge.toml).
//!
//! File cấu hình chứa:
//! - Backend API URL (override được bằng env var CRYPTOBRIDGE_API_URL)
//! - Thư mục lưu artifacts đã download

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var override cho backend URL
pub const API_URL_ENV: &str = "CRYPTOBRIDGE_API_URL";

/// Cấu hình chính của CryptoBridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Phiên bản config (để migrate trong tương lai)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Base URL của backend API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Thư mục lưu artifacts (encrypted files, keys, hash files)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_version() -> u32 {
    1
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

/// Thư mục download mặc định (fallback về current dir)
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            api_url: default_api_url(),
            output_dir: default_output_dir(),
        }
    }
}

/// Lấy đường dẫn config directory mặc định (~/.config/cryptobridge/)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cryptobridge"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Lấy đường dẫn config file mặc định
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("cryptobridge.toml")
}

/// Lấy đường dẫn credentials file mặc định
pub fn default_credentials_path() -> PathBuf {
    default_config_dir().join(".credentials.json")
}

impl Config {
    /// Load config từ file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Cannot parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config từ đường dẫn mặc định, dùng defaults nếu chưa có file
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Lưu config ra file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Cannot serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Cannot write config file: {}", path.display()))?;

        Ok(())
    }

    /// Base URL thực tế: env var thắng file config
    pub fn resolved_api_url(&self) -> String {
        std::env::var(API_URL_ENV).unwrap_or_else(|_| self.api_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.api_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("test.toml");

        let mut config = Config::default();
        config.api_url = "https://crypto.example.com/api".to_string();
        config.output_dir = temp_dir.path().join("downloads");
        config.save(&config_path)?;

        let loaded = Config::load(&config_path)?;
        assert_eq!(loaded.api_url, "https://crypto.example.com/api");
        assert_eq!(loaded.output_dir, temp_dir.path().join("downloads"));

        Ok(())
    }

    #[test]
    fn test_partial_toml_gets_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "api_url = \"http://10.0.0.2:5000/api\"\n")?;

        let loaded = Config::load(&config_path)?;
        assert_eq!(loaded.api_url, "http://10.0.0.2:5000/api");
        assert_eq!(loaded.version, 1);

        Ok(())
    }
}
