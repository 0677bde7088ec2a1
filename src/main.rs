//! STLVault: desktop browser for an indexed 3D-model library.
//!
//! Thin binary entry point. All logic lives in the `stlvault-core`
//! and `stlvault-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use std::sync::Arc;
use stlvault_core::api::HttpClient;
use stlvault_core::browse::JsonFileStore;
use stlvault_core::config::{session_dir_override, ApiConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging; `RUST_LOG` overrides the default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("STLVault starting");

    let config = ApiConfig::from_env();
    tracing::info!("Using backend at {}", config.base_url);

    let store = match session_dir_override() {
        Some(dir) => JsonFileStore::open(&dir)
            .with_context(|| format!("cannot open session store at {}", dir.display()))?,
        None => JsonFileStore::temporary().context("cannot create session directory")?,
    };
    tracing::debug!("Session store at {}", store.dir().display());
    // Held until exit so a temporary session directory is removed last.
    let store = Arc::new(store);
    let api = HttpClient::new(config.clone());

    // Build state before opening the window so the first requests are
    // already in flight when it appears.
    let state = stlvault_gui::StlVaultState::build(Arc::new(api), store.clone(), &config);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("STLVault")
            .with_inner_size([1200.0, 780.0])
            .with_min_inner_size([760.0, 480.0])
            .with_icon(stlvault_gui::icon::generate_icon(64)),
        ..Default::default()
    };

    eframe::run_native(
        "STLVault",
        options,
        Box::new(|cc| Ok(Box::new(stlvault_gui::StlVaultApp::with_state(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    drop(store);
    Ok(())
}
