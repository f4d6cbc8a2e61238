//! UI layer for the inventory window.

pub mod app;

pub use app::InventoryApp;
