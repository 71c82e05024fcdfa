pub mod api;
pub mod cli;
pub mod core;
pub mod shared;
pub mod state;

use api::commands::{catalog, convert, history, preferences, settings as settings_cmd};
use cli::{units_filter, App, Command};
use shared::error::AppResult;
use shared::settings::AppSettings;
use shared::types::{ConvertCurrencyRequest, ConvertUnitsRequest};
use state::AppState;

/// Load settings, apply command-line overrides and run one command
pub async fn run(app: App) -> AppResult<()> {
    let mut settings = match &app.global.config {
        Some(path) => AppSettings::load_from(path).await?,
        None => AppSettings::load().await.unwrap_or_else(|e| {
            eprintln!("Failed to load settings: {}", e);
            AppSettings::default()
        }),
    };

    if let Some(db) = app.global.db {
        settings.storage.db_path = Some(db);
    }
    if let Some(mode) = app.global.gateway {
        settings.gateway.mode = mode;
    }
    if let Some(base_url) = app.global.base_url {
        settings.gateway.base_url = base_url;
    }

    let state = AppState::from_settings(&settings)?;

    match app.command {
        Command::Convert { value, from, to, category } => {
            let request = ConvertUnitsRequest { category, value, from, to };
            let response = convert::convert_units_command(&state, request).await?;
            println!("{}", response.display);
        }
        Command::Currency { amount, from, to } => {
            let request = ConvertCurrencyRequest {
                amount,
                from: from.unwrap_or_else(|| settings.preferences.default_currency_from.clone()),
                to: to.unwrap_or_else(|| settings.preferences.default_currency_to.clone()),
            };
            let response = convert::convert_currency_command(&state, request).await?;
            println!("{}", response.display);
        }
        Command::Units { category, all } => {
            let filter = units_filter(category, all, settings.preferences.default_category);
            let response = catalog::list_units_command(filter).await?;
            for unit in response.units {
                println!("{:<12} {:<12} {}", unit.category, unit.id, unit.label);
            }
        }
        Command::Currencies => {
            for code in catalog::list_currencies_command().await? {
                println!("{}", code);
            }
        }
        Command::History => {
            let entries = history::get_history_command(&state).await?;
            if entries.is_empty() {
                println!("No conversions yet");
            }
            for (index, entry) in entries.iter().enumerate() {
                println!(
                    "{:>2}  {}  [{}]  {}",
                    index,
                    entry.title,
                    entry.kind,
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        Command::Replay { index } => match history::replay_command(&state, index).await? {
            Some(outcome) => println!("{}", outcome.display()),
            None => println!("Nothing to replay at index {}", index),
        },
        Command::Clear => {
            history::clear_history_command(&state).await?;
            println!("History cleared");
        }
        Command::Theme { toggle } => {
            let theme = if toggle {
                preferences::toggle_theme_command(&state).await?
            } else {
                preferences::get_theme_command(&state).await?
            };
            println!("{}", theme);
        }
        Command::Settings { save } => {
            if save {
                let path = match &app.global.config {
                    Some(path) => path.clone(),
                    None => AppSettings::get_settings_path()?,
                };
                settings_cmd::save_settings_command(&settings, &path).await?;
            }
            println!("{}", settings_cmd::show_settings_command(&settings).await?);
        }
    }

    Ok(())
}
