/// Page navigation with a page-size selector.
use egui::Ui;
use stlvault_core::format::format_count;
use stlvault_core::model::PAGE_SIZE_OPTIONS;

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    Page(u32),
    PageSize(u32),
}

/// Draw `‹ page / pages ›`, the item total and a page-size combo box.
pub fn pagination(
    ui: &mut Ui,
    id_salt: &str,
    page: u32,
    page_size: u32,
    total: u64,
) -> Option<PageChange> {
    let pages = total_pages(total, page_size);
    let mut change = None;

    ui.horizontal(|ui| {
        if ui.add_enabled(page > 1, egui::Button::new("‹")).clicked() {
            change = Some(PageChange::Page(page - 1));
        }
        ui.label(format!("Page {page} of {pages}"));
        if ui.add_enabled(page < pages, egui::Button::new("›")).clicked() {
            change = Some(PageChange::Page(page + 1));
        }

        ui.separator();
        ui.label(
            egui::RichText::new(format!("{} items", format_count(total)))
                .color(ui.visuals().weak_text_color()),
        );

        ui.separator();
        let mut selected = page_size;
        egui::ComboBox::from_id_salt(id_salt)
            .selected_text(format!("{selected} / page"))
            .show_ui(ui, |ui| {
                for size in PAGE_SIZE_OPTIONS {
                    ui.selectable_value(&mut selected, size, format!("{size} / page"));
                }
            });
        if selected != page_size {
            change = Some(PageChange::PageSize(selected));
        }
    });

    change
}

/// Pages needed for `total` items, at least one.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let pages = total.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}
