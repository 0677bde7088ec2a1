/// UI widgets for STLVault.
pub mod breadcrumb_bar;
pub mod category_picker;
pub mod pagination;
pub mod status_bar;
pub mod toolbar;
