/// Main `eframe::App` implementation for STLVault.
///
/// The top-level layout that composes all panels and widgets.
use crate::panels;
use crate::state::{AppState, View};
use crate::theme::VaultTheme;
use crate::widgets;
use std::sync::Arc;
use std::time::{Duration, Instant};
use stlvault_core::api::VaultApi;
use stlvault_core::browse::SessionStore;
use stlvault_core::config::{ApiConfig, ELAPSED_TICK_INTERVAL};

/// Pre-built application state.
///
/// Construct this before calling `eframe::run_native` so the first
/// requests are already in flight when the window appears.
pub struct StlVaultState {
    pub(crate) inner: AppState,
}

impl StlVaultState {
    pub fn build(api: Arc<dyn VaultApi>, store: Arc<dyn SessionStore>, config: &ApiConfig) -> Self {
        Self {
            inner: AppState::new(api, store, config),
        }
    }
}

/// The STLVault application.
pub struct StlVaultApp {
    state: AppState,
    /// Palette last applied, to avoid restyling every frame.
    applied_dark_mode: Option<bool>,
}

impl StlVaultApp {
    /// Create the application from state built by [`StlVaultState::build`].
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: StlVaultState) -> Self {
        VaultTheme::for_mode(state.inner.dark_mode).apply(&cc.egui_ctx);
        Self {
            applied_dark_mode: Some(state.inner.dark_mode),
            state: state.inner,
        }
    }
}

impl eframe::App for StlVaultApp {
    /// Clear with the panel colour to avoid a flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        if self.applied_dark_mode != Some(self.state.dark_mode) {
            VaultTheme::for_mode(self.state.dark_mode).apply(ctx);
            self.applied_dark_mode = Some(self.state.dark_mode);
        }

        // ── Window visibility and focus ───────────────────────────────────
        let (minimized, focused) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.minimized.unwrap_or(false),
                viewport.focused.unwrap_or(true),
            )
        });
        self.state.observe_window(minimized, focused);

        // ── Process background messages ───────────────────────────────────
        let now = Instant::now();
        let changed = self.state.process_messages(now);

        match repaint_after(changed, self.state.is_busy(), self.state.scan_view().active) {
            Some(after) if after.is_zero() => ctx.request_repaint(),
            Some(after) => ctx.request_repaint_after(after),
            None => {}
        }
        // Wake up for the next connectivity check even when idle.
        ctx.request_repaint_after(self.state.health.next_check_in(now));

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state);
                ui.add_space(2.0);
            });

        // ── Central panel ─────────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view() {
            View::Dashboard => panels::dashboard_panel::dashboard_panel(ui, &mut self.state),
            View::Home => panels::home_panel::home_panel(ui, &mut self.state),
            View::Folder => panels::folder_panel::folder_panel(ui, &mut self.state),
            View::Files => panels::files_panel::files_panel(ui, &mut self.state),
            View::Categories => panels::categories_panel::categories_panel(ui, &mut self.state),
        });

        // ── Scan progress dialog ──────────────────────────────────────────
        panels::scan_panel::scan_dialog(ctx, &mut self.state);
    }
}

/// When the next frame is needed.
///
/// Fresh results repaint at once. In-flight work keeps frames coming; the
/// elapsed clock of a live scan only needs one per second.
fn repaint_after(changed: bool, busy: bool, live_scan: bool) -> Option<Duration> {
    if changed {
        Some(Duration::ZERO)
    } else if busy && live_scan {
        Some(ELAPSED_TICK_INTERVAL.min(Duration::from_millis(250)))
    } else if busy {
        Some(Duration::from_millis(100))
    } else {
        None
    }
}
