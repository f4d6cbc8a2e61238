//! Backend worker: owns the HTTP client and a tokio runtime, executes queued
//! commands in order and reports results as [`UiEvent`]s.

use std::thread;

use client_core::{submit_to, ClientError, HttpVehicleApi, VehicleApi};
use crossbeam_channel::{Receiver, Sender};
use shared::protocol::ListFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let api = match HttpVehicleApi::new(&server_url) {
            Ok(api) => api,
            Err(err) => {
                tracing::error!(%server_url, "backend worker startup failure: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                api.server_url()
            )));
            while let Ok(cmd) = cmd_rx.recv() {
                let (context, result) = run_command(&api, cmd, &ui_tx).await;
                if let Err(err) = result {
                    tracing::warn!(context = context.label(), "backend command failed: {err}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(context, &err)));
                }
            }
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}

async fn run_command(
    api: &dyn VehicleApi,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) -> (UiErrorContext, Result<(), ClientError>) {
    match cmd {
        BackendCommand::List { filter } => (UiErrorContext::List, list(api, filter, ui_tx).await),
        BackendCommand::FetchForEdit { id } => {
            let result = api.get(&id).await.map(|vehicle| {
                let _ = ui_tx.try_send(UiEvent::EditLoaded(vehicle));
            });
            (UiErrorContext::Edit, result)
        }
        BackendCommand::Submit(submission) => {
            let result = async {
                let outcome = submit_to(api, &submission).await?;
                let _ = ui_tx.try_send(UiEvent::Submitted(outcome));
                list(api, ListFilter::default(), ui_tx).await
            }
            .await;
            (UiErrorContext::Submit, result)
        }
        BackendCommand::Delete { id } => {
            let result = async {
                let ack = api.delete(&id).await?;
                let _ = ui_tx.try_send(UiEvent::Deleted { id, ack });
                list(api, ListFilter::default(), ui_tx).await
            }
            .await;
            (UiErrorContext::Delete, result)
        }
        BackendCommand::LoadJson => {
            let result = async {
                let ack = api.load_json().await?;
                let _ = ui_tx.try_send(UiEvent::StoreLoaded(ack));
                list(api, ListFilter::default(), ui_tx).await
            }
            .await;
            (UiErrorContext::Store, result)
        }
        BackendCommand::SaveJson => {
            let result = api.save_json().await.map(|ack| {
                let _ = ui_tx.try_send(UiEvent::StoreSaved(ack));
            });
            (UiErrorContext::Store, result)
        }
    }
}

async fn list(
    api: &dyn VehicleApi,
    filter: ListFilter,
    ui_tx: &Sender<UiEvent>,
) -> Result<(), ClientError> {
    let vehicles = api.list(&filter).await?;
    let _ = ui_tx.try_send(UiEvent::VehiclesLoaded { filter, vehicles });
    Ok(())
}
