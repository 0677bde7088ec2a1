/// Top-level screens and dialogs.
pub mod categories_panel;
pub mod dashboard_panel;
pub mod files_panel;
pub mod folder_panel;
pub mod home_panel;
pub mod scan_panel;
