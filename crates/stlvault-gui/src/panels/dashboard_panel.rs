/// Dashboard: library totals and recent scans.
use crate::state::AppState;
use crate::theme::VaultTheme;
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use stlvault_core::browse::ListLoad;
use stlvault_core::format::{format_count, format_size};
use stlvault_core::library::{Dashboard, LibraryStats};
use stlvault_core::model::{display_timestamp, ScanRecord};

pub fn dashboard_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = VaultTheme::for_mode(state.dark_mode);
    let can_scan = state.can_start_scan();
    let mut refresh = false;
    let mut scan = false;

    let Some(dashboard) = state.dashboard.as_ref() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.heading("Dashboard");
        if dashboard.is_loading() {
            ui.spinner();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            refresh = ui.button("⟳ Refresh").clicked();
        });
    });
    ui.add_space(8.0);

    stats_section(ui, dashboard, &theme);
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        ui.strong("Recent scans");
        scan = ui
            .add_enabled(can_scan, egui::Button::new("▶ Start scan"))
            .clicked();
    });
    ui.add_space(4.0);
    match dashboard.recent() {
        ListLoad::Loading => {
            ui.spinner();
        }
        ListLoad::Failed(err) => {
            ui.label(egui::RichText::new(format!("Could not load scans: {err}")).color(theme.error));
        }
        ListLoad::Loaded(list) if list.items.is_empty() => {
            ui.label(egui::RichText::new("No scans yet.").color(theme.text_muted));
        }
        ListLoad::Loaded(list) => scan_table(ui, &list.items, &theme),
    }

    if scan {
        state.start_scan();
    }
    if refresh {
        if let Some(dashboard) = state.dashboard.as_mut() {
            dashboard.reload();
        }
    }
}

fn stats_section(ui: &mut Ui, dashboard: &Dashboard, theme: &VaultTheme) {
    match dashboard.stats() {
        ListLoad::Loading => {
            ui.spinner();
        }
        ListLoad::Failed(err) => {
            ui.label(
                egui::RichText::new(format!("Could not load statistics: {err}")).color(theme.error),
            );
        }
        ListLoad::Loaded(stats) => stat_cards(ui, stats, theme),
    }
}

fn stat_cards(ui: &mut Ui, stats: &LibraryStats, theme: &VaultTheme) {
    let size = if stats.size_complete {
        format_size(stats.total_size)
    } else {
        format!("{}+", format_size(stats.total_size))
    };
    let cards = [
        ("Total files", format_count(stats.total_files), theme.accent),
        ("STL", format_count(stats.stl), theme.stl),
        ("ZIP", format_count(stats.zip), theme.zip),
        ("RAR", format_count(stats.rar), theme.rar),
        ("Size", size, theme.text_primary),
    ];

    ui.horizontal_wrapped(|ui| {
        for (title, value, color) in cards {
            egui::Frame::group(ui.style())
                .fill(theme.surface)
                .inner_margin(egui::Margin::same(10))
                .show(ui, |ui| {
                    ui.set_min_width(120.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(title).size(11.0).color(theme.text_muted));
                        ui.label(egui::RichText::new(value).size(22.0).strong().color(color));
                    });
                })
                .response
                .on_hover_text(if title == "Size" && !stats.size_complete {
                    "Summed over the first files only"
                } else {
                    title
                });
        }
    });
}

fn scan_table(ui: &mut Ui, scans: &[ScanRecord], theme: &VaultTheme) {
    TableBuilder::new(ui)
        .id_salt("recent_scans")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder().at_least(120.0).clip(true))
        .header(20.0, |mut header| {
            for title in ["Status", "Found", "Processed", "Started", "Error"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for scan in scans {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(scan.status.as_str())
                                .color(theme.status_color(scan.status)),
                        )
                        .on_hover_text(&scan.id);
                    });
                    row.col(|ui| {
                        ui.label(format_count(scan.found));
                    });
                    row.col(|ui| {
                        ui.label(format_count(scan.processed));
                    });
                    row.col(|ui| {
                        ui.label(display_timestamp(scan.created_at.as_deref()));
                    });
                    row.col(|ui| {
                        if let Some(err) = &scan.error {
                            ui.label(egui::RichText::new(err).color(theme.error));
                        }
                    });
                });
            }
        });
}
