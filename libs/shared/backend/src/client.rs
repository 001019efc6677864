use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;
use shared_models::appointment::Appointment;
use shared_models::call::{CallRequest, CallResult, CallStatus};

use crate::error::BackendError;

/// HTTP client for the call-orchestration backend.
///
/// Every path is rooted at `/api` on the configured base URL.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self, BackendError> {
        if !config.is_configured() {
            return Err(BackendError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(config.backend_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: shared_config::normalize_base_url(&config.backend_url),
        })
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Backend error ({}): {}", status, response_text);
            return Err(BackendError::from_response(status.as_u16(), &response_text));
        }

        let data = serde_json::from_str::<T>(&response_text)?;
        Ok(data)
    }

    /// GET /api/appointments
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, BackendError> {
        let appointments: Vec<Appointment> = self
            .request(Method::GET, "/api/appointments", None)
            .await?;

        debug!("Fetched {} appointments", appointments.len());
        Ok(appointments)
    }

    /// POST /api/make-call
    pub async fn make_call(&self, call_request: &CallRequest) -> Result<CallResult, BackendError> {
        info!("Requesting outbound call to {}", call_request.phone_number);

        let body = serde_json::to_value(call_request)?;
        let result: CallResult = self
            .request(Method::POST, "/api/make-call", Some(body))
            .await?;

        info!("Backend accepted call: {}", result.call_sid);
        Ok(result)
    }

    /// GET /api/call-status/{call_sid}
    pub async fn call_status(&self, call_sid: &str) -> Result<CallStatus, BackendError> {
        let path = format!("/api/call-status/{}", urlencoding::encode(call_sid));

        self.request(Method::GET, &path, None).await
    }

    /// GET /api/health. Any 2xx answer counts as healthy.
    pub async fn health_check(&self) -> Result<bool, BackendError> {
        let url = format!("{}/api/health", self.base_url);
        debug!("Performing backend health check against {}", url);

        let response = self.client.get(&url).send().await?;
        let is_healthy = response.status().is_success();

        if is_healthy {
            info!("Backend health check passed");
        } else {
            warn!("Backend health check failed: {}", response.status());
        }

        Ok(is_healthy)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
