//! Settings command module
//!
//! Shows and persists the effective application settings.

use std::path::Path;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

/// Pretty JSON of `settings` with the API key masked
pub async fn show_settings_command(settings: &AppSettings) -> AppResult<String> {
    serde_json::to_string_pretty(&settings.masked())
        .map_err(|e| AppError::Config(format!("Failed to serialize settings: {}", e)))
}

/// Write `settings` to `path`
pub async fn save_settings_command(settings: &AppSettings, path: &Path) -> AppResult<()> {
    settings.save_to(path).await?;
    eprintln!("[Settings] Saved to {}", path.display());
    Ok(())
}
