use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::Category;

/// Environment variable that overrides `gateway.api_key`
pub const API_KEY_ENV: &str = "EXRATE_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub gateway: GatewaySettings,
    pub preferences: UserPreferences,
    pub storage: StorageSettings,
}

/// Which rate source backs currency conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Ask a pass-through `/api/convert-currency` endpoint
    Proxy,
    /// Fetch the exchangerate-api feed directly
    Direct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub mode: GatewayMode,
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub default_currency_from: String,
    pub default_currency_to: String,
    /// Category listed by `units` when none is given
    pub default_category: Category,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Database file; defaults to the platform data directory
    pub db_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            gateway: GatewaySettings::default(),
            preferences: UserPreferences::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            mode: GatewayMode::Proxy,
            base_url: "http://127.0.0.1:5000".to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_currency_from: "USD".to_string(),
            default_currency_to: "INR".to_string(),
            default_category: Category::Length,
        }
    }
}

fn project_dirs() -> AppResult<ProjectDirs> {
    ProjectDirs::from("com", "antigravity", "unit-converter")
        .ok_or_else(|| AppError::Config("Failed to determine project directories".to_string()))
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("settings.json"))
    }

    /// Default location of the history/preference database
    pub fn default_db_path() -> AppResult<PathBuf> {
        Ok(project_dirs()?.data_dir().join("converter.redb"))
    }

    pub fn db_path(&self) -> AppResult<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => Self::default_db_path(),
        }
    }

    /// Load from the platform config directory
    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    /// Load from `path`; a missing file yields defaults.
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        let mut settings = if !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(path).await
                .map_err(|e| AppError::Config(format!("Failed to read settings file: {}", e)))?;
            Self::parse(&content)?
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            let key = key.trim();
            if !key.is_empty() {
                settings.gateway.api_key = key.to_string();
            }
        }

        Ok(settings)
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize settings: {}", e)))?;

        fs::write(path, content).await
            .map_err(|e| AppError::Config(format!("Failed to write settings file: {}", e)))
    }

    /// Copy with the API key masked, for printing
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if !copy.gateway.api_key.is_empty() {
            copy.gateway.api_key = "********".to_string();
        }
        copy
    }
}
