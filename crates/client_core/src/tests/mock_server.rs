//! In-process stand-in for the inventory service, recording every request.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{Vehicle, VehicleId, VehicleSpec};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Option<String>,
    pub form: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
pub struct Inventory {
    pub vehicles: Vec<Vehicle>,
    pub next_id: u32,
    pub requests: Vec<RecordedRequest>,
}

#[derive(Clone)]
pub struct MockServer {
    pub url: String,
    pub inventory: Arc<Mutex<Inventory>>,
}

impl MockServer {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inventory.lock().await.requests.clone()
    }

    pub async fn mutations(&self) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|request| request.method == "POST")
            .collect()
    }
}

pub fn car(id: &str, brand: &str, model: &str, doors: u32, fuel: &str) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        brand: brand.to_string(),
        model: model.to_string(),
        year: 2019,
        details: None,
        spec: VehicleSpec::Car {
            doors,
            fuel: fuel.to_string(),
        },
    }
}

pub fn bike(id: &str, brand: &str, model: &str) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        brand: brand.to_string(),
        model: model.to_string(),
        year: 2012,
        details: Some("garage kept".to_string()),
        spec: VehicleSpec::Bike {
            sidecar: true,
            category: "Touring".to_string(),
        },
    }
}

/// Serializes the way the service does: capitalized type tags.
fn service_json(vehicle: &Vehicle) -> Value {
    let mut value = serde_json::to_value(vehicle).expect("vehicle json");
    value["type"] = Value::String(vehicle.kind().label().to_string());
    value
}

fn vehicle_from_form(id: String, form: &HashMap<String, String>) -> Option<Vehicle> {
    let mut object = serde_json::Map::new();
    object.insert("id".into(), Value::String(id));
    for (key, value) in form {
        let value = match key.as_str() {
            "id" => continue,
            "year" => json!(value.parse::<i32>().ok()?),
            "sidecar" | "trailer" => Value::Bool(value == "true"),
            _ => Value::String(value.clone()),
        };
        object.insert(key.clone(), value);
    }
    serde_json::from_value(Value::Object(object)).ok()
}

async fn record(
    inventory: &Mutex<Inventory>,
    method: &'static str,
    path: &str,
    query: Option<String>,
    form: &HashMap<String, String>,
) {
    let mut form: Vec<(String, String)> = form
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    form.sort();
    inventory.lock().await.requests.push(RecordedRequest {
        method,
        path: path.to_string(),
        query,
        form,
    });
}

async fn list(
    State(inventory): State<Arc<Mutex<Inventory>>>,
    RawQuery(query): RawQuery,
) -> Json<Vec<Value>> {
    record(&inventory, "GET", "/api/vehicles", query.clone(), &HashMap::new()).await;
    let params: HashMap<String, String> = query
        .as_deref()
        .map(|raw| url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let guard = inventory.lock().await;
    let matches = guard
        .vehicles
        .iter()
        .filter(|v| {
            params
                .get("brand")
                .map_or(true, |brand| v.brand.eq_ignore_ascii_case(brand))
        })
        .filter(|v| {
            params
                .get("type")
                .map_or(true, |kind| v.kind().as_str().eq_ignore_ascii_case(kind))
        })
        .map(service_json)
        .collect();
    Json(matches)
}

async fn get_one(
    State(inventory): State<Arc<Mutex<Inventory>>>,
    Path(id): Path<String>,
) -> Response {
    record(&inventory, "GET", &format!("/api/vehicles/{id}"), None, &HashMap::new()).await;
    let guard = inventory.lock().await;
    match guard.vehicles.iter().find(|v| v.id.as_str() == id) {
        Some(vehicle) => Json(service_json(vehicle)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn add(
    State(inventory): State<Arc<Mutex<Inventory>>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    record(&inventory, "POST", "/api/vehicles/add", None, &form).await;
    let mut guard = inventory.lock().await;
    guard.next_id += 1;
    let id = format!("v{}", guard.next_id);
    match vehicle_from_form(id, &form) {
        Some(vehicle) => {
            guard.vehicles.push(vehicle);
            Json(json!({"ok": true}))
        }
        None => Json(json!({"ok": false, "error": "unknown type"})),
    }
}

async fn update(
    State(inventory): State<Arc<Mutex<Inventory>>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    record(&inventory, "POST", "/api/vehicles/update", None, &form).await;
    let Some(id) = form.get("id").cloned() else {
        return Json(json!({"ok": false, "error": "id missing"}));
    };
    let mut guard = inventory.lock().await;
    let Some(vehicle) = vehicle_from_form(id.clone(), &form) else {
        return Json(json!({"ok": false, "error": "unknown type"}));
    };
    match guard.vehicles.iter_mut().find(|v| v.id.as_str() == id) {
        Some(slot) => {
            *slot = vehicle;
            Json(json!({"ok": true}))
        }
        None => Json(json!({"ok": false})),
    }
}

async fn delete(
    State(inventory): State<Arc<Mutex<Inventory>>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    record(&inventory, "POST", "/api/vehicles/delete", None, &form).await;
    let mut guard = inventory.lock().await;
    let before = guard.vehicles.len();
    if let Some(id) = form.get("id") {
        guard.vehicles.retain(|v| v.id.as_str() != id);
    }
    Json(json!({"ok": guard.vehicles.len() < before}))
}

async fn load_json(State(inventory): State<Arc<Mutex<Inventory>>>) -> Json<Value> {
    record(&inventory, "POST", "/api/vehicles/loadJson", None, &HashMap::new()).await;
    inventory
        .lock()
        .await
        .vehicles
        .push(bike("json-1", "Royal Enfield", "Classic"));
    Json(json!({"ok": true}))
}

async fn save_json(State(inventory): State<Arc<Mutex<Inventory>>>) -> Json<Value> {
    record(&inventory, "POST", "/api/vehicles/saveJson", None, &HashMap::new()).await;
    Json(json!({"ok": true}))
}

pub async fn spawn_inventory_server(vehicles: Vec<Vehicle>) -> MockServer {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let inventory = Arc::new(Mutex::new(Inventory {
        vehicles,
        ..Default::default()
    }));
    let app = Router::new()
        .route("/api/vehicles", get(list))
        .route("/api/vehicles/add", post(add))
        .route("/api/vehicles/update", post(update))
        .route("/api/vehicles/delete", post(delete))
        .route("/api/vehicles/loadJson", post(load_json))
        .route("/api/vehicles/saveJson", post(save_json))
        .route("/api/vehicles/:id", get(get_one))
        .with_state(inventory.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    MockServer {
        url: format!("http://{addr}"),
        inventory,
    }
}
