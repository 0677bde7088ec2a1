/// Colour scheme for STLVault.
///
/// Dark and light palettes with semantically named colours, so panels never
/// reference raw hex values.
use egui::{Color32, Stroke, Visuals};
use stlvault_core::model::{FileKind, ScanStatus};

/// Semantic colour palette.
pub struct VaultTheme {
    pub background: Color32,
    pub surface: Color32,
    pub surface_hover: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub folder_icon: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub separator: Color32,
    pub selection: Color32,
    pub stl: Color32,
    pub zip: Color32,
    pub rar: Color32,
}

impl VaultTheme {
    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            surface: Color32::from_rgb(0x2a, 0x2a, 0x3c),
            surface_hover: Color32::from_rgb(0x35, 0x35, 0x4a),
            text_primary: Color32::from_rgb(0xe4, 0xe4, 0xe8),
            text_muted: Color32::from_rgb(0x6c, 0x70, 0x86),
            accent: Color32::from_rgb(0x89, 0xb4, 0xfa),
            folder_icon: Color32::from_rgb(0xf9, 0xe2, 0xaf),
            error: Color32::from_rgb(0xf3, 0x8b, 0xa8),
            warning: Color32::from_rgb(0xfa, 0xb3, 0x87),
            success: Color32::from_rgb(0xa6, 0xe3, 0xa1),
            separator: Color32::from_rgb(0x3a, 0x3a, 0x50),
            selection: Color32::from_rgb(0x28, 0x3a, 0x5c),
            stl: Color32::from_rgb(0x89, 0xb4, 0xfa),
            zip: Color32::from_rgb(0xa6, 0xe3, 0xa1),
            rar: Color32::from_rgb(0xfa, 0xb3, 0x87),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(0xf5, 0xf5, 0xf5),
            surface: Color32::from_rgb(0xff, 0xff, 0xff),
            surface_hover: Color32::from_rgb(0xe8, 0xe8, 0xef),
            text_primary: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            text_muted: Color32::from_rgb(0x8a, 0x8a, 0x9a),
            accent: Color32::from_rgb(0x3a, 0x6f, 0xd8),
            folder_icon: Color32::from_rgb(0xc0, 0x98, 0x20),
            error: Color32::from_rgb(0xd0, 0x40, 0x50),
            warning: Color32::from_rgb(0xd0, 0x80, 0x20),
            success: Color32::from_rgb(0x30, 0x98, 0x30),
            separator: Color32::from_rgb(0xd0, 0xd0, 0xd8),
            selection: Color32::from_rgba_premultiplied(0x3a, 0x6f, 0xd8, 0x30),
            stl: Color32::from_rgb(0x3a, 0x6f, 0xd8),
            zip: Color32::from_rgb(0x30, 0x98, 0x30),
            rar: Color32::from_rgb(0xd0, 0x80, 0x20),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Apply this palette to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        let mut visuals = if self.background.r() < 128 {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        visuals.panel_fill = self.background;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.surface;
        visuals.hyperlink_color = self.accent;
        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.hovered.bg_fill = self.surface_hover;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.accent);

        visuals.window_stroke = Stroke::new(1.0, self.separator);

        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);

        ctx.set_style(style);
    }

    /// Badge colour for a file type.
    pub fn kind_color(&self, kind: FileKind) -> Color32 {
        match kind {
            FileKind::Stl => self.stl,
            FileKind::Zip => self.zip,
            FileKind::Rar => self.rar,
            FileKind::Other => self.text_muted,
        }
    }

    /// Headline colour for a scan status.
    pub fn status_color(&self, status: ScanStatus) -> Color32 {
        match status {
            ScanStatus::Pending => self.text_muted,
            ScanStatus::Running => self.accent,
            ScanStatus::Completed => self.success,
            ScanStatus::Failed => self.error,
        }
    }
}
