/// Top action bar: branding, section tabs, scan action, theme toggle.
use crate::state::{AppState, Section, View};
use egui::Ui;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("▣ STLVault")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        let can_scan = state.can_start_scan();
        let scan_label = if state.is_starting_scan() {
            "⏳ Starting..."
        } else {
            "▶ Scan"
        };
        let scan_btn = ui
            .add_enabled(
                can_scan,
                egui::Button::new(scan_label).min_size(egui::vec2(70.0, 28.0)),
            )
            .on_hover_text("Index the configured library paths")
            .on_disabled_hover_text("A scan is already in progress");
        if scan_btn.clicked() {
            state.start_scan();
        }

        ui.separator();

        for section in Section::ALL {
            let active = state.section() == section;
            if ui.selectable_label(active, section.label()).clicked() {
                match (section, active) {
                    // The active Library tab doubles as the home button.
                    (Section::Library, true) if state.view() == View::Folder => state.go_home(),
                    (Section::Library, true) => {}
                    _ => state.show(section),
                }
            }
        }

        if let Some(err) = &state.scan_start_error {
            ui.separator();
            ui.label(
                egui::RichText::new(format!("Could not start scan: {err}"))
                    .size(12.0)
                    .color(ui.visuals().error_fg_color),
            );
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let theme_label = if state.dark_mode { "☀" } else { "🌙" };
            let theme_tip = if state.dark_mode {
                "Switch to light mode"
            } else {
                "Switch to dark mode"
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.dark_mode = !state.dark_mode;
            }
        });
    });
}
