//! The inventory screen: list, filter inputs, modal form and edit session,
//! wired to a [`VehicleApi`].

use shared::{
    domain::{VehicleId, VehicleKind},
    protocol::{ListFilter, MutationAck},
};
use tracing::info;

use crate::{
    api::VehicleApi,
    error::ClientResult,
    form::{FormMode, SubmitOutcome, VehicleFormController},
    list_view::VehicleListView,
    session::EditSession,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted(MutationAck),
}

pub fn delete_prompt(id: &VehicleId) -> String {
    format!("Delete vehicle with id {id}?")
}

pub struct InventoryPage<A: VehicleApi> {
    api: A,
    pub list: VehicleListView,
    pub form: VehicleFormController,
    pub session: EditSession,
    pub filter: ListFilter,
}

impl<A: VehicleApi> InventoryPage<A> {
    pub fn new(api: A, show_ids: bool) -> Self {
        Self {
            api,
            list: VehicleListView::new(show_ids),
            form: VehicleFormController::default(),
            session: EditSession::Idle,
            filter: ListFilter::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn mode(&self) -> FormMode {
        FormMode::of(&self.session)
    }

    pub fn set_show_ids(&mut self, show_ids: bool) {
        self.list.set_show_ids(show_ids);
    }

    /// Reloads the list with the current filter.
    pub async fn refresh(&mut self) -> ClientResult<usize> {
        self.list.load(&self.api, &self.filter).await
    }

    pub async fn apply_filter(
        &mut self,
        brand: Option<&str>,
        vehicle_type: Option<&str>,
    ) -> ClientResult<usize> {
        self.filter = ListFilter::new(brand, vehicle_type);
        self.refresh().await
    }

    pub async fn clear_filter(&mut self) -> ClientResult<usize> {
        self.filter = ListFilter::default();
        self.refresh().await
    }

    /// Mutations reload the whole collection, dropping any filter.
    async fn reload_unfiltered(&mut self) -> ClientResult<usize> {
        self.clear_filter().await
    }

    pub fn open_for_add(&mut self) {
        self.form.open_for_add(&mut self.session);
    }

    pub async fn open_for_edit(&mut self, id: &VehicleId) -> ClientResult<()> {
        self.form
            .open_for_edit(&self.api, id, &mut self.session)
            .await
    }

    pub fn change_type(&mut self, kind: VehicleKind) {
        self.form.on_type_changed(kind);
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel(&mut self.session);
    }

    pub async fn submit_form(&mut self) -> ClientResult<SubmitOutcome> {
        let outcome = self.form.submit(&self.api, &mut self.session).await?;
        match &outcome {
            SubmitOutcome::Added(_) => info!("vehicle added"),
            SubmitOutcome::Updated { id, .. } => info!(%id, "vehicle updated"),
        }
        self.reload_unfiltered().await?;
        Ok(outcome)
    }

    /// Deletes `id` after `confirm` accepts the prompt; nothing is sent when
    /// it declines.
    pub async fn delete(
        &mut self,
        id: &VehicleId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> ClientResult<DeleteOutcome> {
        if !confirm(&delete_prompt(id)) {
            return Ok(DeleteOutcome::Declined);
        }
        let ack = self.api.delete(id).await?;
        self.reload_unfiltered().await?;
        Ok(DeleteOutcome::Deleted(ack))
    }

    /// Asks the service to reload its JSON store, then refreshes the list.
    pub async fn load_json(&mut self) -> ClientResult<MutationAck> {
        let ack = self.api.load_json().await?;
        self.reload_unfiltered().await?;
        Ok(ack)
    }

    pub async fn save_json(&mut self) -> ClientResult<MutationAck> {
        self.api.save_json().await
    }
}
