/// STLVault GUI: egui-based desktop frontend.
///
/// This crate contains all UI code. Client logic lives in `stlvault-core`.
pub mod app;
pub mod icon;
pub mod panels;
pub mod state;
pub mod theme;
pub mod widgets;

pub use app::{StlVaultApp, StlVaultState};
