/// Breadcrumb bar: `Home › Models › Dragons`, every segment but the
/// current folder clickable.
use egui::Ui;
use stlvault_core::browse::{BreadcrumbSegment, SegmentTarget};

/// Draw `segments` and return the target of a clicked segment.
pub fn breadcrumb_bar(ui: &mut Ui, segments: &[BreadcrumbSegment]) -> Option<SegmentTarget> {
    let mut clicked = None;
    ui.horizontal_wrapped(|ui| {
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                ui.label(egui::RichText::new("›").color(ui.visuals().weak_text_color()));
            }
            let label = match segment.target {
                SegmentTarget::Home => format!("🏠 {}", segment.label),
                SegmentTarget::Folder(_) => segment.label.clone(),
            };
            if segment.clickable {
                if ui.link(label).clicked() {
                    clicked = Some(segment.target.clone());
                }
            } else {
                ui.label(egui::RichText::new(label).strong());
            }
        }
    });
    clicked
}
