use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::shared::settings::GatewayMode;
use crate::shared::types::Category;

#[derive(Parser, Debug)]
#[command(name = "unit-converter", version, about, long_about = None)]
pub struct App {
    #[command(flatten)]
    pub global: Global,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct Global {
    #[arg(long, global = true, help = "history database file")]
    pub db: Option<PathBuf>,
    #[arg(long, global = true, help = "settings file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_parser = parse_gateway, help = "rate source: proxy or direct")]
    pub gateway: Option<GatewayMode>,
    #[arg(long, global = true, help = "proxy gateway base URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a value between two units
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,
        #[arg(short, long, value_parser = parse_category, help = "unit category")]
        category: Option<Category>,
    },
    /// Convert an amount between two currencies
    Currency {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        #[arg(help = "source currency, defaults to the configured one")]
        from: Option<String>,
        #[arg(help = "target currency, defaults to the configured one")]
        to: Option<String>,
    },
    /// List units of a category, the configured one by default
    Units {
        #[arg(value_parser = parse_category)]
        category: Option<Category>,
        #[arg(long, conflicts_with = "category", help = "list every category")]
        all: bool,
    },
    /// List selectable currency codes
    Currencies,
    /// Show recorded conversions, newest first
    History,
    /// Re-run a recorded conversion
    Replay { index: usize },
    /// Delete all recorded conversions
    Clear,
    /// Show or flip the theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },
    /// Show the effective settings, API key masked
    Settings {
        #[arg(long, help = "write the effective settings to the settings file")]
        save: bool,
    },
}

/// Category filter for `units`: explicit, all, or the configured default
pub fn units_filter(category: Option<Category>, all: bool, default: Category) -> Option<Category> {
    if all {
        None
    } else {
        Some(category.unwrap_or(default))
    }
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse::<Category>().map_err(|e| e.to_string())
}

fn parse_gateway(s: &str) -> Result<GatewayMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "proxy" => Ok(GatewayMode::Proxy),
        "direct" => Ok(GatewayMode::Direct),
        other => Err(format!("unknown gateway '{}', expected proxy or direct", other)),
    }
}
