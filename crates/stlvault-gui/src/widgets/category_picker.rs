/// Drop-down checklist for assigning categories to a folder or file.
use egui::Ui;
use stlvault_core::model::{
    category_labels, extract_category_ids, Category, CategoryRef, MAX_ASSIGNED_CATEGORIES,
};

/// Draw the picker for an item carrying `current`.
///
/// Returns the new id list when the user changed it. Boxes beyond
/// [`MAX_ASSIGNED_CATEGORIES`] are disabled rather than refused later.
pub fn category_picker(
    ui: &mut Ui,
    id_salt: impl std::hash::Hash,
    current: &[CategoryRef],
    catalog: &[Category],
    enabled: bool,
) -> Option<Vec<String>> {
    let selected = extract_category_ids(current);
    let labels = category_labels(current, catalog);
    let button_text = if labels.is_empty() {
        "＋ Categories".to_string()
    } else {
        labels.join(", ")
    };

    let mut changed = None;
    ui.push_id(id_salt, |ui| {
        ui.add_enabled_ui(enabled, |ui| {
            ui.menu_button(button_text, |ui| {
                if catalog.is_empty() {
                    ui.label(
                        egui::RichText::new("No categories yet")
                            .color(ui.visuals().weak_text_color()),
                    );
                    return;
                }
                ui.label(
                    egui::RichText::new(format!(
                        "{} of {} selected",
                        selected.len(),
                        MAX_ASSIGNED_CATEGORIES
                    ))
                    .size(11.0)
                    .color(ui.visuals().weak_text_color()),
                );
                ui.separator();
                egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    for category in catalog {
                        let mut checked = selected.contains(&category.id);
                        let allowed = checked || selected.len() < MAX_ASSIGNED_CATEGORIES;
                        if ui
                            .add_enabled(allowed, egui::Checkbox::new(&mut checked, &category.name))
                            .changed()
                        {
                            changed = Some(toggle(&selected, &category.id));
                        }
                    }
                });
                if !selected.is_empty() {
                    ui.separator();
                    if ui.button("Clear").clicked() {
                        changed = Some(Vec::new());
                        ui.close_menu();
                    }
                }
            });
        });
    });
    changed
}

/// `selected` with `id` added or removed.
pub fn toggle(selected: &[String], id: &str) -> Vec<String> {
    if selected.iter().any(|s| s == id) {
        selected.iter().filter(|s| *s != id).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(id.to_owned());
        next
    }
}
