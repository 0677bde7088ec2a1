/// Files screen: every indexed file, searchable and filterable, with
/// per-file category assignment.
use crate::state::AppState;
use crate::theme::VaultTheme;
use crate::widgets::category_picker::category_picker;
use crate::widgets::pagination::{pagination, PageChange};
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use stlvault_core::browse::ListLoad;
use stlvault_core::format::format_size;
use stlvault_core::library::{AssignTarget, FileListView};
use stlvault_core::model::{display_timestamp, Category, FileKind, ModelFile};

enum FilesAction {
    Search(String),
    Kind(Option<FileKind>),
    Category(Option<String>),
    Page(PageChange),
    Reload,
    Assign(String, Vec<String>),
}

pub fn files_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = VaultTheme::for_mode(state.dark_mode);
    let catalog = state.categories.categories();
    let assign_busy = state.assigner.is_busy();
    let mut actions = Vec::new();

    let Some(files) = state.files.as_ref() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.heading("Files");
        if files.is_loading() || assign_busy {
            ui.spinner();
        }
    });
    ui.add_space(4.0);
    toolbar(ui, files, catalog, &mut actions);
    if let Some(err) = state.assign_error() {
        ui.label(
            egui::RichText::new(format!("Category update failed: {err}")).color(theme.error),
        );
    }
    ui.separator();

    match files.state() {
        ListLoad::Loading => {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
        }
        ListLoad::Failed(err) => {
            ui.label(egui::RichText::new(format!("Could not load files: {err}")).color(theme.error));
            if ui.button("Retry").clicked() {
                actions.push(FilesAction::Reload);
            }
        }
        ListLoad::Loaded(list) => {
            if let Some(change) = pagination(
                ui,
                "files_page_size",
                files.query().page,
                files.query().page_size,
                list.total,
            ) {
                actions.push(FilesAction::Page(change));
            }
            ui.add_space(4.0);
            if list.items.is_empty() {
                ui.label(egui::RichText::new("No files match.").color(theme.text_muted));
            } else {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    file_table(ui, &list.items, catalog, !assign_busy, &theme, &mut actions);
                });
            }
        }
    }

    for action in actions {
        match action {
            FilesAction::Assign(id, ids) => state.assign_categories(AssignTarget::File(id), ids),
            other => {
                if let Some(files) = state.files.as_mut() {
                    apply(files, other);
                }
            }
        }
    }
}

fn apply(files: &mut FileListView, action: FilesAction) {
    match action {
        FilesAction::Search(text) => files.set_text(&text),
        FilesAction::Kind(kind) => files.set_kind(kind),
        FilesAction::Category(category) => files.set_category(category),
        FilesAction::Page(PageChange::Page(page)) => files.set_page(page),
        FilesAction::Page(PageChange::PageSize(size)) => files.set_page_size(size),
        FilesAction::Reload => files.reload(),
        FilesAction::Assign(..) => {}
    }
}

fn toolbar(ui: &mut Ui, files: &FileListView, catalog: &[Category], actions: &mut Vec<FilesAction>) {
    ui.horizontal(|ui| {
        // Draft text lives in egui memory until submitted.
        let id = ui.make_persistent_id("files_search");
        let mut text = ui
            .data_mut(|d| d.get_temp::<String>(id))
            .unwrap_or_else(|| files.query().text.clone().unwrap_or_default());
        let edit = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text("🔍 Search files...")
                .desired_width(220.0),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Search").clicked() || submitted {
            actions.push(FilesAction::Search(text.clone()));
        }
        ui.data_mut(|d| d.insert_temp(id, text));

        let current = files.query().kind;
        let mut kind = current;
        egui::ComboBox::from_id_salt("files_kind_filter")
            .selected_text(kind.map(FileKind::label).unwrap_or("All types"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut kind, None, "All types");
                for k in FileKind::FILTERABLE {
                    ui.selectable_value(&mut kind, Some(k), k.label());
                }
            });
        if kind != current {
            actions.push(FilesAction::Kind(kind));
        }

        let current = files.query().category.clone();
        let mut category = current.clone();
        egui::ComboBox::from_id_salt("files_category_filter")
            .selected_text(category.as_deref().unwrap_or("All categories"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut category, None, "All categories");
                for c in catalog {
                    ui.selectable_value(&mut category, Some(c.name.clone()), &c.name);
                }
            });
        if category != current {
            actions.push(FilesAction::Category(category));
        }

        if ui.button("⟳").on_hover_text("Reload").clicked() {
            actions.push(FilesAction::Reload);
        }
    });
}

fn file_table(
    ui: &mut Ui,
    files: &[ModelFile],
    catalog: &[Category],
    can_assign: bool,
    theme: &VaultTheme,
    actions: &mut Vec<FilesAction>,
) {
    TableBuilder::new(ui)
        .id_salt("all_files")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(44.0))
        .column(Column::initial(240.0).at_least(120.0).clip(true))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::remainder().at_least(160.0).clip(true))
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
                        if let Some(ids) =
                            category_picker(ui, &file.id, &file.categories, catalog, can_assign)
                        {
                            actions.push(FilesAction::Assign(file.id.clone(), ids));
                        }
                    });
                });
            }
        });
}
