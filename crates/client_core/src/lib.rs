pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod list_view;
pub mod page;
pub mod session;

pub use api::{HttpVehicleApi, VehicleApi};
pub use config::{load_settings, ClientSettings};
pub use error::{ClientError, ClientResult};
pub use form::{submit_to, FormMode, SubmitOutcome, TypeFieldInputs, VehicleFormController};
pub use list_view::{RowAction, VehicleListView, VehicleRow};
pub use page::{delete_prompt, DeleteOutcome, InventoryPage};
pub use session::EditSession;

#[cfg(test)]
mod tests;
