use thiserror::Error;

use crate::domain::VehicleKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown vehicle type '{0}'")]
    UnknownVehicleKind(String),
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{kind} record is missing '{field}'")]
    MissingField {
        kind: VehicleKind,
        field: &'static str,
    },
}

impl DomainError {
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
        }
    }
}
