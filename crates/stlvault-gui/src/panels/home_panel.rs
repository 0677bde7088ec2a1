/// Home screen: paginated list of top-level folders.
use crate::state::AppState;
use crate::theme::VaultTheme;
use crate::widgets::category_picker::category_picker;
use crate::widgets::pagination::{pagination, PageChange};
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use stlvault_core::browse::ListLoad;
use stlvault_core::format::format_count;
use stlvault_core::library::AssignTarget;
use stlvault_core::model::{display_timestamp, Category, Folder, Propagation};

/// What a click in the folder table asked for.
enum RowAction {
    Open(String),
    Assign(String, Vec<String>),
}

pub fn home_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = VaultTheme::for_mode(state.dark_mode);

    ui.horizontal(|ui| {
        ui.heading("Library");
        if state.home.is_loading() {
            ui.spinner();
        }
    });
    ui.add_space(4.0);

    let catalog = state.categories.categories();
    let can_assign = !state.assigner.is_busy();
    let mut row_action = None;
    let mut change = None;
    let mut retry = false;

    match state.home.state() {
        ListLoad::Loading => {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
        }
        ListLoad::Failed(err) => {
            ui.label(
                egui::RichText::new(format!("Could not load folders: {err}")).color(theme.error),
            );
            retry = ui.button("Retry").clicked();
        }
        ListLoad::Loaded(list) => {
            if list.items.is_empty() {
                ui.label(
                    egui::RichText::new("No folders indexed yet. Run a scan to populate the library.")
                        .color(theme.text_muted),
                );
            } else {
                change = pagination(
                    ui,
                    "home_page_size",
                    state.home.page(),
                    state.home.page_size(),
                    list.total,
                );
                ui.separator();
                row_action = folder_table(ui, &list.items, catalog, can_assign, &theme);
            }
        }
    }

    if retry {
        state.home.reload();
    }
    match change {
        Some(PageChange::Page(page)) => state.home.set_page(page),
        Some(PageChange::PageSize(size)) => state.home.set_page_size(size),
        None => {}
    }
    match row_action {
        Some(RowAction::Open(id)) => state.open_folder(&id),
        Some(RowAction::Assign(id, ids)) => state.assign_categories(
            AssignTarget::Folder {
                id,
                propagation: Propagation::NONE,
            },
            ids,
        ),
        None => {}
    }
}

fn folder_table(
    ui: &mut Ui,
    folders: &[Folder],
    catalog: &[Category],
    can_assign: bool,
    theme: &VaultTheme,
) -> Option<RowAction> {
    let mut clicked = None;
    TableBuilder::new(ui)
        .id_salt("home_folders")
        .striped(true)
        .resizable(true)
        .column(Column::initial(240.0).at_least(120.0).clip(true))
        .column(Column::remainder().at_least(160.0).clip(true))
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(140.0))
        .header(20.0, |mut header| {
            for title in ["Name", "Path", "Files", "Updated", "Categories"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(22.0, folders.len(), |mut row| {
                let folder = &folders[row.index()];
                row.col(|ui| {
                    ui.label(egui::RichText::new("📁").color(theme.folder_icon));
                    if ui.link(&folder.name).clicked() {
                        clicked = Some(RowAction::Open(folder.id.clone()));
                    }
                });
                row.col(|ui| {
                    ui.label(egui::RichText::new(&folder.path).color(theme.text_muted))
                        .on_hover_text(&folder.path);
                });
                row.col(|ui| {
                    ui.label(folder.file_count.map(format_count).unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(display_timestamp(folder.updated_at.as_deref()));
                });
                row.col(|ui| {
                    if let Some(ids) =
                        category_picker(ui, &folder.id, &folder.categories, catalog, can_assign)
                    {
                        clicked = Some(RowAction::Assign(folder.id.clone(), ids));
                    }
                });
            });
        });
    clicked
}
