/// Categories screen: paged list with create, rename and delete.
use crate::state::AppState;
use crate::theme::VaultTheme;
use crate::widgets::pagination::{pagination, PageChange};
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use stlvault_core::browse::ListLoad;
use stlvault_core::library::CategoryManager;
use stlvault_core::model::{display_timestamp, Category};

enum CategoryAction {
    Create,
    Edit(Category),
    AskDelete(Category),
    Page(PageChange),
    Reload,
}

pub fn categories_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = VaultTheme::for_mode(state.dark_mode);
    let mut actions = Vec::new();

    let Some(admin) = state.category_admin.as_ref() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.heading("Categories");
        if admin.is_loading() {
            ui.spinner();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("＋ New Category").clicked() {
                actions.push(CategoryAction::Create);
            }
        });
    });
    if let Some(err) = admin.action_error() {
        ui.label(egui::RichText::new(err).color(theme.error));
    }
    ui.separator();

    match admin.state() {
        ListLoad::Loading => {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
        }
        ListLoad::Failed(err) => {
            ui.label(
                egui::RichText::new(format!("Could not load categories: {err}")).color(theme.error),
            );
            if ui.button("Retry").clicked() {
                actions.push(CategoryAction::Reload);
            }
        }
        ListLoad::Loaded(list) => {
            if let Some(change) =
                pagination(ui, "categories_page_size", admin.page(), admin.page_size(), list.total)
            {
                actions.push(CategoryAction::Page(change));
            }
            ui.add_space(4.0);
            if list.items.is_empty() {
                ui.label(
                    egui::RichText::new("No categories yet. Create one to start tagging models.")
                        .color(theme.text_muted),
                );
            } else {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    category_table(ui, admin, &list.items, &theme, &mut actions);
                });
            }
        }
    }

    let ctx = ui.ctx().clone();
    editor_window(&ctx, state);
    delete_window(&ctx, state, &theme);

    let Some(admin) = state.category_admin.as_mut() else {
        return;
    };
    for action in actions {
        match action {
            CategoryAction::Create => admin.open_create(),
            CategoryAction::Edit(category) => admin.open_edit(category),
            CategoryAction::AskDelete(category) => state.confirm_delete = Some(category),
            CategoryAction::Page(PageChange::Page(page)) => admin.set_page(page),
            CategoryAction::Page(PageChange::PageSize(size)) => admin.set_page_size(size),
            CategoryAction::Reload => admin.reload(),
        }
    }
}

fn category_table(
    ui: &mut Ui,
    admin: &CategoryManager,
    categories: &[Category],
    theme: &VaultTheme,
    actions: &mut Vec<CategoryAction>,
) {
    TableBuilder::new(ui)
        .id_salt("categories")
        .striped(true)
        .vscroll(false)
        .column(Column::initial(260.0).at_least(120.0).clip(true))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder().at_least(140.0))
        .header(20.0, |mut header| {
            for title in ["Name", "Created", ""] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for category in categories {
                let deleting = admin.deleting() == Some(category.id.as_str());
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(egui::RichText::new(&category.name).color(theme.accent));
                    });
                    row.col(|ui| {
                        ui.label(display_timestamp(category.created_at.as_deref()));
                    });
                    row.col(|ui| {
                        if ui.small_button("✏ Edit").clicked() {
                            actions.push(CategoryAction::Edit(category.clone()));
                        }
                        if deleting {
                            ui.spinner();
                        } else if ui
                            .add_enabled(
                                admin.deleting().is_none(),
                                egui::Button::new("🗑 Delete").small(),
                            )
                            .clicked()
                        {
                            actions.push(CategoryAction::AskDelete(category.clone()));
                        }
                    });
                });
            }
        });
}

/// Create/rename form.
fn editor_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(admin) = state.category_admin.as_mut() else {
        return;
    };
    let saving = admin.is_saving();
    let Some(editor) = admin.editor_mut() else {
        return;
    };

    let mut open = true;
    let mut submit = false;
    let mut cancel = false;
    egui::Window::new(editor.title())
        .id(egui::Id::new("category_editor"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label("Name");
            let edit = ui.add(
                egui::TextEdit::singleline(&mut editor.name)
                    .hint_text("e.g. Terrain")
                    .desired_width(260.0),
            );
            if !edit.has_focus() && editor.name.is_empty() {
                edit.request_focus();
            }
            submit = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if let Some(err) = &editor.error {
                ui.label(egui::RichText::new(err).color(ui.visuals().error_fg_color));
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if editor.editing.is_some() { "Save" } else { "Create" };
                submit |= ui.add_enabled(!saving, egui::Button::new(label)).clicked();
                cancel = ui.button("Cancel").clicked();
                if saving {
                    ui.spinner();
                }
            });
        });

    if cancel || !open {
        admin.close_editor();
    } else if submit {
        admin.submit();
    }
}

/// Confirmation before deleting.
fn delete_window(ctx: &egui::Context, state: &mut AppState, theme: &VaultTheme) {
    let Some(category) = state.confirm_delete.as_ref() else {
        return;
    };

    let mut confirm = false;
    let mut cancel = false;
    egui::Window::new("Delete Category")
        .id(egui::Id::new("category_delete"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(format!("Delete \"{}\"?", category.name));
            ui.label(
                egui::RichText::new("It is removed from every folder and file that carries it.")
                    .color(theme.text_muted),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                confirm = ui
                    .button(egui::RichText::new("Delete").color(theme.error))
                    .clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });

    if confirm {
        state.confirm_category_delete();
    } else if cancel {
        state.confirm_delete = None;
    }
}
