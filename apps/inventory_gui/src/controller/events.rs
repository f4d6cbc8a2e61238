//! Backend-to-UI events and error modeling for the inventory window.

use client_core::{ClientError, SubmitOutcome};
use shared::{
    domain::{Vehicle, VehicleId},
    protocol::{ListFilter, MutationAck},
};

pub enum UiEvent {
    Info(String),
    VehiclesLoaded {
        filter: ListFilter,
        vehicles: Vec<Vehicle>,
    },
    EditLoaded(Vehicle),
    Submitted(SubmitOutcome),
    Deleted {
        id: VehicleId,
        ack: MutationAck,
    },
    StoreLoaded(MutationAck),
    StoreSaved(MutationAck),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Response,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    List,
    Edit,
    Submit,
    Delete,
    Store,
}

impl UiErrorContext {
    pub fn label(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Startup",
            UiErrorContext::List => "Loading vehicles",
            UiErrorContext::Edit => "Loading vehicle",
            UiErrorContext::Submit => "Saving vehicle",
            UiErrorContext::Delete => "Deleting vehicle",
            UiErrorContext::Store => "JSON store",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("connection")
            || lower.contains("timed out")
            || lower.contains("dns")
            || lower.contains("disconnected")
            || lower.contains("request to")
        {
            UiErrorCategory::Transport
        } else if lower.contains("invalid") || lower.contains("must be") {
            UiErrorCategory::Validation
        } else if lower.contains("unexpected response") {
            UiErrorCategory::Response
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::Decode { .. } => UiErrorCategory::Response,
            ClientError::InvalidServerUrl { .. } | ClientError::Form(_) => {
                UiErrorCategory::Validation
            }
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Form validation problems are shown next to the form, not in the banner.
    pub fn belongs_in_banner(&self) -> bool {
        self.category != UiErrorCategory::Validation
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Response => "Response",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use shared::error::DomainError;

    use super::*;

    #[test]
    fn classifies_worker_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::List,
            "Backend worker disconnected (possible startup failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.belongs_in_banner());
    }

    #[test]
    fn form_errors_stay_out_of_the_banner() {
        let err = UiError::from_client_error(
            UiErrorContext::Submit,
            &ClientError::Form(DomainError::invalid_number("year", "soon")),
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::Submit);
        assert!(!err.belongs_in_banner());
        assert!(err.message().contains("soon"));
    }

    #[test]
    fn decode_failures_are_response_errors() {
        let source = serde_json_error();
        let err = UiError::from_client_error(
            UiErrorContext::Edit,
            &ClientError::Decode {
                url: "http://127.0.0.1:8000/api/vehicles/7".to_string(),
                source,
            },
        );
        assert_eq!(err.category(), UiErrorCategory::Response);
        assert_eq!(err_label(err.category()), "Response");
    }

    fn serde_json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("").expect_err("empty body")
    }
}
