/// Folder screen: breadcrumbs, filters, category assignment, subfolders and
/// files.
use crate::state::AppState;
use crate::theme::VaultTheme;
use crate::widgets::breadcrumb_bar::breadcrumb_bar;
use crate::widgets::category_picker::category_picker;
use crate::widgets::pagination::{pagination, PageChange};
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use std::time::{Duration, Instant};
use stlvault_core::browse::{FolderLoad, FolderView, SegmentTarget};
use stlvault_core::format::{format_count, format_size};
use stlvault_core::library::AssignTarget;
use stlvault_core::model::{
    display_timestamp, Category, FileKind, Folder, FolderDetail, ModelFile,
    Propagation,
};

/// Everything the user can ask for on this screen in one frame.
enum FolderAction {
    Navigate(SegmentTarget),
    Open(String),
    Retry,
    Home,
    Search(String),
    Kind(Option<FileKind>),
    Category(Option<String>),
    Page(PageChange),
    Propagation(Propagation),
    /// New categories for `target`.
    Assign(AssignTarget, Vec<String>),
    Sync,
}

/// Category state shared by every picker on the screen.
struct Assignment<'a> {
    /// Catalog plus anything only this response knows about.
    known: &'a [Category],
    busy: bool,
    error: Option<&'a str>,
}

pub fn folder_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = VaultTheme::for_mode(state.dark_mode);
    let now = Instant::now();
    let mut actions = Vec::new();

    if let Some(target) = breadcrumb_bar(ui, &state.trail.segments()) {
        actions.push(FolderAction::Navigate(target));
    }
    ui.separator();

    let catalog = state.categories.categories();
    let busy = state.assigner.is_busy();
    let error = state.assign_error();

    if let Some(folder) = state.folder.as_ref() {
        match folder.state() {
            FolderLoad::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            FolderLoad::NotFound => not_found(ui, folder, now, &theme, &mut actions),
            FolderLoad::Failed(err) => {
                ui.label(
                    egui::RichText::new("Could not load this folder")
                        .size(16.0)
                        .strong()
                        .color(theme.error),
                );
                ui.label(err);
                ui.add_space(8.0);
                if ui.button("Retry").clicked() {
                    actions.push(FolderAction::Retry);
                }
            }
            FolderLoad::Loaded(detail) => {
                let known = merge_known(catalog, detail);
                let assignment = Assignment {
                    known: &known,
                    busy,
                    error,
                };
                loaded(ui, folder, detail, &assignment, &theme, &mut actions);
            }
        }
    }

    for action in actions {
        match action {
            FolderAction::Navigate(target) => state.navigate(target),
            FolderAction::Open(id) => state.open_folder(&id),
            FolderAction::Home => state.go_home(),
            FolderAction::Retry => {
                state.retry_folder(now);
            }
            FolderAction::Assign(target, ids) => state.assign_categories(target, ids),
            FolderAction::Sync => state.sync_open_folder(),
            other => {
                if let Some(folder) = state.folder.as_mut() {
                    apply_filter(folder, other, now);
                }
            }
        }
    }
}

fn apply_filter(folder: &mut FolderView, action: FolderAction, now: Instant) {
    match action {
        FolderAction::Search(text) => folder.search_input(&text, now),
        FolderAction::Kind(kind) => folder.set_kind(kind),
        FolderAction::Category(category) => folder.set_category(category),
        FolderAction::Page(PageChange::Page(page)) => folder.set_page(page),
        FolderAction::Page(PageChange::PageSize(size)) => folder.set_page_size(size),
        FolderAction::Propagation(propagation) => folder.set_propagation(propagation),
        FolderAction::Navigate(_)
        | FolderAction::Open(_)
        | FolderAction::Retry
        | FolderAction::Home
        | FolderAction::Assign(..)
        | FolderAction::Sync => {}
    }
}

/// The catalog, extended with categories only this folder response names.
fn merge_known(catalog: &[Category], detail: &FolderDetail) -> Vec<Category> {
    let mut known = catalog.to_vec();
    for category in detail.known_categories() {
        if !known.iter().any(|k| k.id == category.id) {
            known.push(category);
        }
    }
    known
}

fn not_found(
    ui: &mut Ui,
    folder: &FolderView,
    now: Instant,
    theme: &VaultTheme,
    actions: &mut Vec<FolderAction>,
) {
    ui.vertical_centered(|ui| {
        ui.add_space(32.0);
        ui.label(
            egui::RichText::new("Folder not found")
                .size(20.0)
                .strong()
                .color(theme.warning),
        );
        ui.label(
            egui::RichText::new("It may have been removed or moved by a recent scan.")
                .color(theme.text_muted),
        );
        ui.add_space(12.0);

        let remaining = folder.cooldown().remaining_secs(now);
        let retry_label = if remaining > 0 {
            // Keep the countdown ticking.
            ui.ctx().request_repaint_after(Duration::from_secs(1));
            format!("Retry ({remaining}s)")
        } else {
            "Retry".to_string()
        };
        ui.horizontal(|ui| {
            if ui
                .add_enabled(remaining == 0, egui::Button::new(retry_label))
                .clicked()
            {
                actions.push(FolderAction::Retry);
            }
            if ui.button("🏠 Back to Home").clicked() {
                actions.push(FolderAction::Home);
            }
        });
    });
}

fn loaded(
    ui: &mut Ui,
    folder: &FolderView,
    detail: &FolderDetail,
    assignment: &Assignment<'_>,
    theme: &VaultTheme,
    actions: &mut Vec<FolderAction>,
) {
    let known = assignment.known;

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("📁").size(20.0).color(theme.folder_icon));
        ui.heading(&detail.folder.name);
        if folder.is_loading() || assignment.busy {
            ui.spinner();
        }
    });
    ui.label(egui::RichText::new(&detail.folder.path).color(theme.text_muted));
    ui.add_space(4.0);
    folder_categories(ui, folder, detail, assignment, actions);
    ui.add_space(6.0);

    filters(ui, folder, known, actions);
    ui.separator();

    if let Some(change) = pagination(
        ui,
        "folder_page_size",
        folder.query().page,
        folder.query().page_size,
        detail.pagination.total,
    ) {
        actions.push(FolderAction::Page(change));
    }
    ui.add_space(4.0);

    if detail.subfolders.is_empty() && detail.files.is_empty() {
        ui.label(egui::RichText::new("This folder is empty.").color(theme.text_muted));
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        if !detail.subfolders.is_empty() {
            ui.strong(format!("Subfolders ({})", detail.subfolders.len()));
            subfolder_table(ui, &detail.subfolders, assignment, theme, actions);
            ui.add_space(8.0);
        }
        if !detail.files.is_empty() {
            ui.strong(format!("Files ({})", detail.files.len()));
            file_table(ui, &detail.files, assignment, theme, actions);
        }
    });
}

/// The folder's own categories, what they propagate to, and a sync action.
fn folder_categories(
    ui: &mut Ui,
    folder: &FolderView,
    detail: &FolderDetail,
    assignment: &Assignment<'_>,
    actions: &mut Vec<FolderAction>,
) {
    let current = folder.propagation();
    let mut propagation = current;

    ui.horizontal_wrapped(|ui| {
        ui.label("Categories:");
        if let Some(ids) = category_picker(
            ui,
            "folder_categories",
            &detail.folder.categories,
            assignment.known,
            !assignment.busy,
        ) {
            actions.push(FolderAction::Assign(
                AssignTarget::Folder {
                    id: detail.folder.id.clone(),
                    propagation: current,
                },
                ids,
            ));
        }

        ui.separator();
        ui.label("Apply to:");
        ui.checkbox(&mut propagation.stl, "STL");
        ui.checkbox(&mut propagation.zip, "ZIP");
        ui.checkbox(&mut propagation.rar, "RAR");
        ui.checkbox(&mut propagation.subfolders, "Subfolders");

        let has_categories = !detail.folder.categories.is_empty();
        if ui
            .add_enabled(has_categories && !assignment.busy, egui::Button::new("⇣ Sync"))
            .on_hover_text("Apply this folder's categories to its contents")
            .on_disabled_hover_text("Assign categories to the folder first")
            .clicked()
        {
            actions.push(FolderAction::Sync);
        }
    });
    if propagation != current {
        actions.push(FolderAction::Propagation(propagation));
    }

    if let Some(err) = assignment.error {
        ui.label(
            egui::RichText::new(format!("Category update failed: {err}"))
                .color(ui.visuals().error_fg_color),
        );
    }
}

fn filters(ui: &mut Ui, folder: &FolderView, known: &[Category], actions: &mut Vec<FolderAction>) {
    ui.horizontal(|ui| {
        let mut text = folder.search_text().to_owned();
        let search = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text("🔍 Search files...")
                .desired_width(220.0),
        );
        if search.changed() {
            actions.push(FolderAction::Search(text));
        }

        let current = folder.query().kind;
        let mut kind = current;
        egui::ComboBox::from_id_salt("kind_filter")
            .selected_text(kind.map(FileKind::label).unwrap_or("All types"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut kind, None, "All types");
                for k in FileKind::FILTERABLE {
                    ui.selectable_value(&mut kind, Some(k), k.label());
                }
            });
        if kind != current {
            actions.push(FolderAction::Kind(kind));
        }

        let current = folder.query().category.clone();
        let mut category = current.clone();
        egui::ComboBox::from_id_salt("category_filter")
            .selected_text(category.as_deref().unwrap_or("All categories"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut category, None, "All categories");
                for c in known {
                    ui.selectable_value(&mut category, Some(c.name.clone()), &c.name);
                }
            });
        if category != current {
            actions.push(FolderAction::Category(category));
        }
    });
}

fn subfolder_table(
    ui: &mut Ui,
    subfolders: &[Folder],
    assignment: &Assignment<'_>,
    theme: &VaultTheme,
    actions: &mut Vec<FolderAction>,
) {
    TableBuilder::new(ui)
        .id_salt("subfolders")
        .striped(true)
        .vscroll(false)
        .column(Column::initial(260.0).at_least(120.0).clip(true))
        .column(Column::auto().at_least(50.0))
        .column(Column::remainder().at_least(120.0).clip(true))
        .header(20.0, |mut header| {
            for title in ["Name", "Files", "Categories"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for sub in subfolders {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(egui::RichText::new("📁").color(theme.folder_icon));
                        if ui.link(&sub.name).on_hover_text(&sub.path).clicked() {
                            actions.push(FolderAction::Open(sub.id.clone()));
                        }
                    });
                    row.col(|ui| {
                        ui.label(sub.file_count.map(format_count).unwrap_or_default());
                    });
                    row.col(|ui| {
                        // Row pickers only touch the subfolder itself.
                        if let Some(ids) = category_picker(
                            ui,
                            ("subfolder", &sub.id),
                            &sub.categories,
                            assignment.known,
                            !assignment.busy,
                        ) {
                            actions.push(FolderAction::Assign(
                                AssignTarget::Folder {
                                    id: sub.id.clone(),
                                    propagation: Propagation::NONE,
                                },
                                ids,
                            ));
                        }
                    });
                });
            }
        });
}

fn file_table(
    ui: &mut Ui,
    files: &[ModelFile],
    assignment: &Assignment<'_>,
    theme: &VaultTheme,
    actions: &mut Vec<FolderAction>,
) {
    TableBuilder::new(ui)
        .id_salt("files")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(44.0))
        .column(Column::initial(260.0).at_least(120.0).clip(true))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::remainder().at_least(120.0).clip(true))
        .header(20.0, |mut header| {
            for title in ["Type", "Name", "Size", "Modified", "Categories"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for file in files {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(file.kind.label())
                                .size(11.0)
                                .strong()
                                .color(theme.kind_color(file.kind)),
                        );
                    });
                    row.col(|ui| {
                        ui.label(&file.file_name).on_hover_text(&file.path);
                    });
                    row.col(|ui| {
                        ui.label(format_size(file.size));
                    });
                    row.col(|ui| {
                        ui.label(display_timestamp(file.modified_at.as_deref()));
                    });
                    row.col(|ui| {
                        if let Some(ids) = category_picker(
                            ui,
                            ("file", &file.id),
                            &file.categories,
                            assignment.known,
                            !assignment.busy,
                        ) {
                            actions.push(FolderAction::Assign(AssignTarget::File(file.id.clone()), ids));
                        }
                    });
                });
            }
        });
}
