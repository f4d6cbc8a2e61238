use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Vehicle, VehicleId},
    protocol::{
        vehicle_route, ListFilter, MutationAck, VehicleSubmission, ADD_ROUTE, DELETE_ROUTE,
        LOAD_JSON_ROUTE, SAVE_JSON_ROUTE, UPDATE_ROUTE,
    },
};
use tracing::{debug, info, warn};

use crate::{
    config::normalize_server_url,
    error::{ClientError, ClientResult},
};

/// Calls exposed by the inventory service.
///
/// Status codes are never inspected: whatever body comes back is decoded,
/// and only transport or decode failures surface as errors.
#[async_trait]
pub trait VehicleApi: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> ClientResult<Vec<Vehicle>>;
    async fn get(&self, id: &VehicleId) -> ClientResult<Vehicle>;
    async fn add(&self, submission: &VehicleSubmission) -> ClientResult<MutationAck>;
    async fn update(&self, submission: &VehicleSubmission) -> ClientResult<MutationAck>;
    async fn delete(&self, id: &VehicleId) -> ClientResult<MutationAck>;
    async fn load_json(&self) -> ClientResult<MutationAck>;
    async fn save_json(&self) -> ClientResult<MutationAck>;
}

#[derive(Debug, Clone)]
pub struct HttpVehicleApi {
    http: Client,
    server_url: String,
}

impl HttpVehicleApi {
    pub fn new(server_url: &str) -> ClientResult<Self> {
        let server_url = normalize_server_url(server_url);
        url::Url::parse(&server_url).map_err(|source| ClientError::InvalidServerUrl {
            url: server_url.clone(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            server_url,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    async fn read_body(url: &str, request: RequestBuilder) -> ClientResult<String> {
        let transport = |source| ClientError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        debug!(%url, status = %response.status(), "vehicle api response");
        response.text().await.map_err(transport)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        debug!(method = "GET", %url, "vehicle api request");
        let body = Self::read_body(&url, self.http.get(&url)).await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { url, source })
    }

    async fn post(&self, path: &str, form: &[(&'static str, String)]) -> ClientResult<MutationAck> {
        let url = self.url(path);
        debug!(method = "POST", %url, fields = form.len(), "vehicle api request");
        let mut request = self.http.post(&url);
        if !form.is_empty() {
            request = request.form(form);
        }
        let body = Self::read_body(&url, request).await?;
        let ack = MutationAck::from_body(&body);
        if ack.ok {
            info!(%url, "vehicle mutation accepted");
        } else {
            warn!(%url, error = ack.error.as_deref().unwrap_or(""), "vehicle mutation rejected");
        }
        Ok(ack)
    }
}

#[async_trait]
impl VehicleApi for HttpVehicleApi {
    async fn list(&self, filter: &ListFilter) -> ClientResult<Vec<Vehicle>> {
        self.fetch_json(&filter.list_path()).await
    }

    async fn get(&self, id: &VehicleId) -> ClientResult<Vehicle> {
        self.fetch_json(&vehicle_route(id)).await
    }

    async fn add(&self, submission: &VehicleSubmission) -> ClientResult<MutationAck> {
        self.post(ADD_ROUTE, &submission.form_pairs()).await
    }

    async fn update(&self, submission: &VehicleSubmission) -> ClientResult<MutationAck> {
        self.post(UPDATE_ROUTE, &submission.form_pairs()).await
    }

    async fn delete(&self, id: &VehicleId) -> ClientResult<MutationAck> {
        self.post(DELETE_ROUTE, &[("id", id.to_string())]).await
    }

    async fn load_json(&self) -> ClientResult<MutationAck> {
        self.post(LOAD_JSON_ROUTE, &[]).await
    }

    async fn save_json(&self) -> ClientResult<MutationAck> {
        self.post(SAVE_JSON_ROUTE, &[]).await
    }
}
