/// Scan progress dialog.
///
/// Shown while a scan is observed. It cannot be closed until the scan is
/// terminal; after completion it lists the per-path results.
use crate::state::AppState;
use crate::theme::VaultTheme;
use egui_extras::{Column, TableBuilder};
use stlvault_core::format::format_count;
use stlvault_core::model::{ScanPath, ScanPathTotals, ScanStatus};
use stlvault_core::scan::{PathResults, TrackerView};

/// Draw the dialog if a scan is active.
pub fn scan_dialog(ctx: &egui::Context, state: &mut AppState) {
    let view = state.scan_view();
    if !view.active {
        return;
    }
    let theme = VaultTheme::for_mode(state.dark_mode);

    let mut open = true;
    let mut close_clicked = false;
    let mut retry_paths = false;

    let mut window = egui::Window::new("Scan Progress")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([460.0, 0.0]);
    if view.closable {
        window = window.open(&mut open);
    }

    window.show(ctx, |ui| {
        progress_section(ui, &view, &theme);

        if view.status == ScanStatus::Completed {
            ui.add_space(8.0);
            ui.separator();
            retry_paths = results_section(ui, state.scan.paths());
        }

        if view.closable {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("Close").clicked() {
                    close_clicked = true;
                }
            });
        }
    });

    if retry_paths {
        state.scan.retry_paths();
    }
    if !open || close_clicked {
        state.dismiss_scan();
    }
}

fn progress_section(ui: &mut egui::Ui, view: &TrackerView, theme: &VaultTheme) {
    ui.horizontal(|ui| {
        if !view.status.is_terminal() {
            ui.spinner();
        }
        ui.label(
            egui::RichText::new(view.headline)
                .size(18.0)
                .strong()
                .color(theme.status_color(view.status)),
        );
    });
    ui.label(
        egui::RichText::new(format!("Elapsed: {}", view.formatted_elapsed))
            .color(theme.text_muted),
    );
    ui.add_space(6.0);

    if view.loading {
        ui.label("Waiting for the server...");
    }

    if let Some(percent) = view.percent {
        let fraction = (percent as f32 / 100.0).clamp(0.0, 1.0);
        ui.add(egui::ProgressBar::new(fraction).text(format!("{percent}%")));
        ui.add_space(4.0);
    }

    egui::Grid::new("scan_counters")
        .num_columns(2)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            ui.label("Files found");
            ui.label(format_count(view.found));
            ui.end_row();
            ui.label("Processed");
            ui.label(format_count(view.processed));
            ui.end_row();
            if let Some(remaining) = view.remaining {
                ui.label("Remaining");
                ui.label(format_count(remaining));
                ui.end_row();
            }
        });

    if let Some(message) = &view.error_message {
        ui.add_space(6.0);
        ui.label(egui::RichText::new(message).color(theme.error));
    }
    if let Some(err) = &view.fetch_error {
        ui.add_space(6.0);
        ui.label(
            egui::RichText::new(format!("⚠ Could not refresh progress: {err}"))
                .size(12.0)
                .color(theme.warning),
        );
    }
}

/// Returns `true` if the user asked to retry loading the results.
fn results_section(ui: &mut egui::Ui, paths: &PathResults) -> bool {
    match paths {
        PathResults::NotRequested => false,
        PathResults::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading results...");
            });
            false
        }
        PathResults::Failed(err) => {
            ui.label(
                egui::RichText::new(format!("Could not load results: {err}"))
                    .color(ui.visuals().error_fg_color),
            );
            ui.button("Retry").clicked()
        }
        PathResults::Loaded(paths) => {
            paths_table(ui, paths);
            false
        }
    }
}

fn paths_table(ui: &mut egui::Ui, paths: &[ScanPath]) {
    if paths.is_empty() {
        ui.label("No library paths were scanned.");
        return;
    }
    let totals = ScanPathTotals::from_paths(paths);

    TableBuilder::new(ui)
        .id_salt("scan_paths")
        .striped(true)
        .column(Column::remainder().at_least(160.0).clip(true))
        .columns(Column::auto().at_least(60.0), 4)
        .header(20.0, |mut header| {
            for title in ["Path", "Files", "New files", "Folders", "New folders"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for p in paths {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&p.root_path).on_hover_text(&p.root_path);
                    });
                    for n in [p.files_found, p.files_inserted, p.folders_found, p.folders_inserted] {
                        row.col(|ui| {
                            ui.label(format_count(n));
                        });
                    }
                });
            }
            body.row(20.0, |mut row| {
                row.col(|ui| {
                    ui.strong("Total");
                });
                for n in [
                    totals.files_found,
                    totals.files_inserted,
                    totals.folders_found,
                    totals.folders_inserted,
                ] {
                    row.col(|ui| {
                        ui.strong(format_count(n));
                    });
                }
            });
        });
}
