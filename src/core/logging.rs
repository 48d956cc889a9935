//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Backend/bot-token configuration validation and logging
//! - Startup diagnostics

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs catalog configuration at application startup
///
/// Validates and logs:
/// - SUPABASE_URL / SUPABASE_ANON_KEY presence (live catalog)
/// - BOT_TOKEN presence (Telegram photo resolution)
/// - Which catalog source will be used
///
/// Never logs secret values, only presence.
pub fn log_catalog_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🛒 Catalog Configuration Check");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let url = config::SUPABASE_URL.as_str();
    if url.is_empty() {
        log::warn!("⚠️  SUPABASE_URL: not set");
    } else if url::Url::parse(url).is_err() {
        log::error!("❌ SUPABASE_URL is not a valid URL: {}", url);
    } else {
        log::info!("✅ SUPABASE_URL: {}", url);
    }

    if config::SUPABASE_ANON_KEY.is_empty() {
        log::warn!("⚠️  SUPABASE_ANON_KEY: not set");
    } else {
        log::info!("✅ SUPABASE_ANON_KEY: present");
    }

    if config::BOT_TOKEN.is_empty() {
        log::warn!("⚠️  BOT_TOKEN: not set — Telegram photos will render as placeholders");
    } else {
        log::info!("✅ BOT_TOKEN: present");
    }

    match config::CATALOG_SOURCE.as_str() {
        "seed" => {
            log::info!("📦 CATALOG_SOURCE=seed — serving the fixed development product set");
        }
        "live" => {
            if url.is_empty() || config::SUPABASE_ANON_KEY.is_empty() {
                log::error!("❌ CATALOG_SOURCE=live but Supabase is not configured");
                log::error!("   The catalog will come up empty. Either set SUPABASE_URL and");
                log::error!("   SUPABASE_ANON_KEY, or run with CATALOG_SOURCE=seed for development.");
            } else {
                log::info!("🌐 CATALOG_SOURCE=live — serving products from Supabase");
            }
        }
        other => {
            log::warn!("⚠️  Unknown CATALOG_SOURCE '{}', falling back to live", other);
        }
    }

    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
