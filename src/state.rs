use std::sync::Arc;

use crate::core::features::currency::service::DirectGateway;
use crate::core::features::currency::{CurrencyGateway, ProxyGateway};
use crate::core::history::HistoryLog;
use crate::core::preferences::Preferences;
use crate::core::storage::{open_store, KeyValueStore};
use crate::shared::error::AppResult;
use crate::shared::settings::{AppSettings, GatewayMode, GatewaySettings};

/// Everything a command needs, owned in one place
pub struct AppState {
    pub history: HistoryLog,
    pub preferences: Preferences,
    pub gateway: Arc<dyn CurrencyGateway>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, gateway: Arc<dyn CurrencyGateway>) -> Self {
        Self {
            history: HistoryLog::new(store.clone()),
            preferences: Preferences::new(store),
            gateway,
        }
    }

    /// Open the configured database and build the configured gateway
    pub fn from_settings(settings: &AppSettings) -> AppResult<Self> {
        let store = open_store(&settings.db_path()?);
        let gateway = build_gateway(&settings.gateway)?;
        Ok(Self::new(store, gateway))
    }
}

pub fn build_gateway(settings: &GatewaySettings) -> AppResult<Arc<dyn CurrencyGateway>> {
    Ok(match settings.mode {
        GatewayMode::Proxy => Arc::new(ProxyGateway::new(settings.base_url.clone())?),
        GatewayMode::Direct => Arc::new(DirectGateway::new(settings.api_key.clone())?),
    })
}
