/// Bottom status bar: connectivity, backend address, scan summary, last
/// fetch error.
use crate::state::AppState;
use crate::theme::VaultTheme;
use egui::{Color32, Ui};
use stlvault_core::health::Connectivity;
use stlvault_core::model::ScanStatus;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_warning = ui.visuals().warn_fg_color;

    let view = state.scan_view();

    ui.horizontal(|ui| {
        let theme = VaultTheme::for_mode(state.dark_mode);
        let (dot, tip) = connectivity_badge(state.health.state(), &theme);
        ui.label(egui::RichText::new("●").size(12.0).color(dot))
            .on_hover_text(tip);
        ui.label(
            egui::RichText::new(truncate(&state.base_url, 60))
                .size(12.0)
                .color(color_weak),
        );

        ui.separator();

        if !view.active {
            ui.label(egui::RichText::new("Ready").size(12.0).color(color_weak));
        } else {
            if !view.status.is_terminal() {
                ui.spinner();
            }
            let summary = match view.status {
                ScanStatus::Pending | ScanStatus::Running => format!(
                    "{} · {} / {} files · {}",
                    view.headline, view.processed, view.found, view.formatted_elapsed
                ),
                ScanStatus::Completed | ScanStatus::Failed => {
                    format!("{} · {}", view.headline, view.formatted_elapsed)
                }
            };
            ui.label(egui::RichText::new(summary).size(12.0).color(color_normal));
        }

        if let Some(err) = &view.fetch_error {
            ui.separator();
            ui.label(
                egui::RichText::new(format!("⚠ {}", truncate(err, 80)))
                    .size(12.0)
                    .color(color_warning),
            );
        }
    });
}

/// Dot colour and hover text for the connectivity indicator.
fn connectivity_badge(state: &Connectivity, theme: &VaultTheme) -> (Color32, String) {
    match state {
        Connectivity::Unknown => (theme.text_muted, "Checking backend...".to_string()),
        Connectivity::Online => (theme.success, "Backend online".to_string()),
        Connectivity::Offline(err) => (theme.error, format!("Backend offline: {err}")),
    }
}

/// Shorten `s` to at most `max_chars` characters, replacing the middle
/// with "...".
fn truncate(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars || max_chars < 5 {
        return s.to_string();
    }
    let half = (max_chars - 3) / 2;
    let head: String = s.chars().take(half).collect();
    let tail: String = s.chars().skip(count - half).collect();
    format!("{head}...{tail}")
}
