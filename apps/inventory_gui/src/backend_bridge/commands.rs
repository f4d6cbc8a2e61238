//! Backend commands queued from UI to backend worker.

use shared::{
    domain::VehicleId,
    protocol::{ListFilter, VehicleSubmission},
};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    List { filter: ListFilter },
    FetchForEdit { id: VehicleId },
    Submit(VehicleSubmission),
    Delete { id: VehicleId },
    LoadJson,
    SaveJson,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::List { .. } => "list",
            BackendCommand::FetchForEdit { .. } => "fetch_for_edit",
            BackendCommand::Submit(submission) if submission.is_update() => "update",
            BackendCommand::Submit(_) => "add",
            BackendCommand::Delete { .. } => "delete",
            BackendCommand::LoadJson => "load_json",
            BackendCommand::SaveJson => "save_json",
        }
    }
}
