//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. Returns the status line to show when
/// the command could not be queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err("UI command queue is full; please retry".to_string()),
        Err(TrySendError::Disconnected(_)) => Err(
            "Backend worker disconnected (possible startup failure); restart the app".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn full_queue_reports_retry_hint() {
        let (tx, _rx) = bounded(1);
        assert!(dispatch_backend_command(&tx, BackendCommand::SaveJson).is_ok());
        let err = dispatch_backend_command(&tx, BackendCommand::LoadJson).expect_err("full");
        assert!(err.contains("full"));
    }

    #[test]
    fn dropped_worker_is_reported() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let err = dispatch_backend_command(&tx, BackendCommand::SaveJson).expect_err("gone");
        assert!(err.contains("disconnected"));
    }
}
