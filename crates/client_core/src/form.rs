//! The add/edit modal form shared by both modes.
//!
//! Inputs are kept as the raw text the user typed; they only become a typed
//! [`VehicleSubmission`] on submit, where blank type-specific inputs fall
//! back to the per-type defaults.

use shared::{
    domain::{
        Vehicle, VehicleId, VehicleKind, VehicleSpec, DEFAULT_BIKE_CATEGORY, DEFAULT_CAR_DOORS,
        DEFAULT_CAR_FUEL, DEFAULT_MOTORCYCLE_CATEGORY, DEFAULT_MOTORCYCLE_CC,
        DEFAULT_TRUCK_PAYLOAD,
    },
    error::DomainError,
    protocol::{MutationAck, VehicleSubmission},
};
use tracing::{debug, warn};

use crate::{api::VehicleApi, error::ClientResult, session::EditSession};

/// Type-specific inputs currently shown. Switching type swaps the whole
/// variant, so inputs of the previous type cannot leak into a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFieldInputs {
    Car { doors: String, fuel: String },
    Bike { sidecar: bool, category: String },
    Truck { payload: String, trailer: bool },
    Motorcycle { cc: String, category: String },
}

impl TypeFieldInputs {
    pub fn defaults(kind: VehicleKind) -> Self {
        Self::from_spec(&VehicleSpec::defaults_for(kind))
    }

    pub fn from_spec(spec: &VehicleSpec) -> Self {
        match spec {
            VehicleSpec::Car { doors, fuel } => TypeFieldInputs::Car {
                doors: doors.to_string(),
                fuel: fuel.clone(),
            },
            VehicleSpec::Bike { sidecar, category } => TypeFieldInputs::Bike {
                sidecar: *sidecar,
                category: category.clone(),
            },
            VehicleSpec::Truck { payload, trailer } => TypeFieldInputs::Truck {
                payload: payload.to_string(),
                trailer: *trailer,
            },
            VehicleSpec::Motorcycle { cc, category } => TypeFieldInputs::Motorcycle {
                cc: cc.to_string(),
                category: category.clone(),
            },
        }
    }

    pub fn kind(&self) -> VehicleKind {
        match self {
            TypeFieldInputs::Car { .. } => VehicleKind::Car,
            TypeFieldInputs::Bike { .. } => VehicleKind::Bike,
            TypeFieldInputs::Truck { .. } => VehicleKind::Truck,
            TypeFieldInputs::Motorcycle { .. } => VehicleKind::Motorcycle,
        }
    }

    /// Names of the inputs rendered for this type.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            TypeFieldInputs::Car { .. } => &["doors", "fuel"],
            TypeFieldInputs::Bike { .. } => &["sidecar", "category"],
            TypeFieldInputs::Truck { .. } => &["payload", "trailer"],
            TypeFieldInputs::Motorcycle { .. } => &["cc", "category"],
        }
    }

    pub fn to_spec(&self) -> Result<VehicleSpec, DomainError> {
        let spec = match self {
            TypeFieldInputs::Car { doors, fuel } => VehicleSpec::Car {
                doors: whole_number_or("doors", doors, DEFAULT_CAR_DOORS)?,
                fuel: text_or(fuel, DEFAULT_CAR_FUEL),
            },
            TypeFieldInputs::Bike { sidecar, category } => VehicleSpec::Bike {
                sidecar: *sidecar,
                category: text_or(category, DEFAULT_BIKE_CATEGORY),
            },
            TypeFieldInputs::Truck { payload, trailer } => VehicleSpec::Truck {
                payload: whole_number_or("payload", payload, DEFAULT_TRUCK_PAYLOAD)?,
                trailer: *trailer,
            },
            TypeFieldInputs::Motorcycle { cc, category } => VehicleSpec::Motorcycle {
                cc: whole_number_or("cc", cc, DEFAULT_MOTORCYCLE_CC)?,
                category: text_or(category, DEFAULT_MOTORCYCLE_CATEGORY),
            },
        };
        Ok(spec)
    }
}

fn whole_number_or(field: &'static str, raw: &str, default: u32) -> Result<u32, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse().map_err(|_| DomainError::invalid_number(field, raw))
}

fn text_or(raw: &str, default: &str) -> String {
    if raw.is_empty() {
        default.to_string()
    } else {
        raw.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

impl FormMode {
    pub fn of(session: &EditSession) -> Self {
        if session.is_editing() {
            FormMode::Edit
        } else {
            FormMode::Add
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormMode::Add => "Add Vehicle",
            FormMode::Edit => "Edit Vehicle",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            FormMode::Add => "Add",
            FormMode::Edit => "Save",
        }
    }
}

/// Sends `submission` as an update when it carries an id, otherwise as an add.
pub async fn submit_to(
    api: &dyn VehicleApi,
    submission: &VehicleSubmission,
) -> ClientResult<SubmitOutcome> {
    Ok(match &submission.id {
        Some(id) => SubmitOutcome::Updated {
            id: id.clone(),
            ack: api.update(submission).await?,
        },
        None => SubmitOutcome::Added(api.add(submission).await?),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(MutationAck),
    Updated { id: VehicleId, ack: MutationAck },
}

impl SubmitOutcome {
    pub fn ack(&self) -> &MutationAck {
        match self {
            SubmitOutcome::Added(ack) | SubmitOutcome::Updated { ack, .. } => ack,
        }
    }
}

/// State of the modal form plus the actions that drive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleFormController {
    pub visible: bool,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub type_fields: TypeFieldInputs,
}

impl Default for VehicleFormController {
    fn default() -> Self {
        Self {
            visible: false,
            brand: String::new(),
            model: String::new(),
            year: String::new(),
            type_fields: TypeFieldInputs::defaults(VehicleKind::Car),
        }
    }
}

impl VehicleFormController {
    pub fn kind(&self) -> VehicleKind {
        self.type_fields.kind()
    }

    /// Resets every input and shows the form in add mode with car fields.
    pub fn open_for_add(&mut self, session: &mut EditSession) {
        if let Some(abandoned) = session.reset() {
            debug!(%abandoned, "edit session dropped for a fresh add");
        }
        *self = Self {
            visible: true,
            ..Self::default()
        };
    }

    /// Fetches `id` and opens the form in edit mode populated from it.
    pub async fn open_for_edit(
        &mut self,
        api: &dyn VehicleApi,
        id: &VehicleId,
        session: &mut EditSession,
    ) -> ClientResult<()> {
        let vehicle = api.get(id).await?;
        self.populate(&vehicle, session);
        Ok(())
    }

    /// Fills the inputs from a fetched record and makes it the edit session.
    pub fn populate(&mut self, vehicle: &Vehicle, session: &mut EditSession) {
        self.brand = vehicle.brand.clone();
        self.model = vehicle.model.clone();
        self.year = vehicle.year.to_string();
        self.type_fields = TypeFieldInputs::from_spec(&vehicle.spec);
        self.visible = true;
        if let Some(replaced) = session.begin(vehicle.id.clone()) {
            warn!(%replaced, editing = %vehicle.id, "edit session replaced");
        }
    }

    /// Swaps the type-specific inputs for the defaults of `kind`.
    pub fn on_type_changed(&mut self, kind: VehicleKind) {
        if self.kind() != kind {
            self.type_fields = TypeFieldInputs::defaults(kind);
        }
    }

    pub fn cancel(&mut self, session: &mut EditSession) {
        self.visible = false;
        if let Some(id) = session.reset() {
            debug!(%id, "edit cancelled");
        }
    }

    /// Request body for the current inputs; carries the session id in edit
    /// mode.
    pub fn build_submission(
        &self,
        session: &EditSession,
    ) -> Result<VehicleSubmission, DomainError> {
        let year = self.year.trim();
        let year = year
            .parse::<i32>()
            .map_err(|_| DomainError::invalid_number("year", year))?;
        Ok(VehicleSubmission {
            id: session.editing_id().cloned(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            year,
            spec: self.type_fields.to_spec()?,
        })
    }

    /// Clears the free-text inputs, hides the form and ends any edit session.
    pub fn complete_submission(&mut self, session: &mut EditSession) {
        self.brand.clear();
        self.model.clear();
        self.year.clear();
        self.visible = false;
        session.reset();
    }

    /// Sends an add, or an update when an edit session is active.
    pub async fn submit(
        &mut self,
        api: &dyn VehicleApi,
        session: &mut EditSession,
    ) -> ClientResult<SubmitOutcome> {
        let submission = self.build_submission(session)?;
        let outcome = submit_to(api, &submission).await?;
        self.complete_submission(session);
        Ok(outcome)
    }
}
