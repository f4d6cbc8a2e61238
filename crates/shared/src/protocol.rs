use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::domain::{VehicleId, VehicleSpec};

pub const VEHICLES_ROUTE: &str = "/api/vehicles";
pub const ADD_ROUTE: &str = "/api/vehicles/add";
pub const UPDATE_ROUTE: &str = "/api/vehicles/update";
pub const DELETE_ROUTE: &str = "/api/vehicles/delete";
pub const LOAD_JSON_ROUTE: &str = "/api/vehicles/loadJson";
pub const SAVE_JSON_ROUTE: &str = "/api/vehicles/saveJson";

pub fn vehicle_route(id: &VehicleId) -> String {
    format!("{VEHICLES_ROUTE}/{}", encode_component(id.as_str()))
}

/// Bytes escaped by `encodeURIComponent`: everything except ASCII
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a query or path component the way browsers'
/// `encodeURIComponent` does: spaces become `%20`, not `+`.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Brand/type filter for the list request. Blank inputs mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub brand: Option<String>,
    pub vehicle_type: Option<String>,
}

impl ListFilter {
    pub fn new(brand: Option<&str>, vehicle_type: Option<&str>) -> Self {
        fn non_blank(value: Option<&str>) -> Option<String> {
            value
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        }

        Self {
            brand: non_blank(brand),
            vehicle_type: non_blank(vehicle_type),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brand.is_none() && self.vehicle_type.is_none()
    }

    /// `brand=..&type=..` without the leading `?`, or `None` when unfiltered.
    pub fn query_string(&self) -> Option<String> {
        let mut params = Vec::new();
        if let Some(brand) = &self.brand {
            params.push(format!("brand={}", encode_component(brand)));
        }
        if let Some(vehicle_type) = &self.vehicle_type {
            params.push(format!("type={}", encode_component(vehicle_type)));
        }
        if params.is_empty() {
            None
        } else {
            Some(params.join("&"))
        }
    }

    /// Path plus query, relative to the server root.
    pub fn list_path(&self) -> String {
        match self.query_string() {
            Some(query) => format!("{VEHICLES_ROUTE}?{query}"),
            None => VEHICLES_ROUTE.to_string(),
        }
    }
}

/// Body of an add or update request. `id` is only set for updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSubmission {
    pub id: Option<VehicleId>,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub spec: VehicleSpec,
}

impl VehicleSubmission {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("type", self.spec.kind().as_str().to_string()),
            ("brand", self.brand.clone()),
            ("model", self.model.clone()),
            ("year", self.year.to_string()),
        ];
        pairs.extend(self.spec.form_pairs());
        if let Some(id) = &self.id {
            pairs.push(("id", id.to_string()));
        }
        pairs
    }
}

/// Reply to add/update/delete/bulk requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MutationAck {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_ok() -> bool {
    true
}

impl MutationAck {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }

    /// Bodies that are empty or not an acknowledgement object (the bulk
    /// endpoints of some deployments answer a bare `true`) count as accepted.
    pub fn from_body(body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            return Self::accepted();
        }
        match serde_json::from_str::<MutationAck>(body) {
            Ok(ack) => ack,
            Err(_) => match serde_json::from_str::<bool>(body) {
                Ok(false) => Self::rejected("server returned false"),
                _ => Self::accepted(),
            },
        }
    }
}
