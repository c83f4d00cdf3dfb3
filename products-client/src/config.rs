use serde::Deserialize;
use std::path::PathBuf;

use crate::table::PageSize;

pub const CONFIG_ENV: &str = "PRODUCTS_CONFIG";
pub const API_URL_ENV: &str = "PRODUCTS_API_URL";
pub const LOG_DIR_ENV: &str = "PRODUCTS_LOG_DIR";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub log_dir: PathBuf,
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
            log_dir: std::env::temp_dir(),
            page_size: PageSize::default().get(),
        }
    }
}

impl ClientConfig {
    /// Reads the JSON file named by `PRODUCTS_CONFIG` (if any), then applies
    /// the `PRODUCTS_API_URL` and `PRODUCTS_LOG_DIR` overrides.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)?;
                Self::from_json(&raw)?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.base_url = url;
        }
        if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
            config.log_dir = PathBuf::from(dir);
        }

        config.initial_page_size()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: ClientConfig =
            serde_json::from_str(raw).map_err(|e| format!("bad config json: {e}"))?;
        config.initial_page_size()?;
        Ok(config)
    }

    pub fn initial_page_size(&self) -> Result<PageSize, String> {
        PageSize::try_from(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{"base_url": "http://api:8080"}"#).unwrap();
        assert_eq!(config.base_url, "http://api:8080");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        assert!(ClientConfig::from_json(r#"{"page_size": 7}"#).is_err());
        let ok = ClientConfig::from_json(r#"{"page_size": 20}"#).unwrap();
        assert_eq!(ok.initial_page_size(), Ok(PageSize::Twenty));
    }
}
