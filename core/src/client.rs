//! # HTTP Device Service
//!
//! [`DeviceService`] over the backend's JSON REST surface:
//!
//! | Call                | Request                          |
//! |---------------------|----------------------------------|
//! | `get_devices`       | `GET  /api/devices`              |
//! | `get_device_detail` | `GET  /api/devices/{ip}`         |
//! | `scan_network`      | `POST /api/scan/network`         |
//! | `scan_ports`        | `POST /api/scan/ports`           |
//! | `update_device`     | `PUT  /api/devices/{ip}`         |
//! | `reset_devices`     | `POST /api/devices/reset`        |

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use lanwatch_common::config::ApiConfig;
use lanwatch_common::error::ServiceError;
use lanwatch_common::inventory::{
    Ack, Device, DeviceDetail, DeviceUpdate, NetworkScanRequest, PortScanRequest,
};

use crate::service::DeviceService;

pub struct HttpDeviceService {
    client: Client,
    base_url: Url,
}

impl HttpDeviceService {
    pub fn new(cfg: &ApiConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(cfg.base_url())
            .with_context(|| format!("invalid backend URL '{}'", cfg.base_url()))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("backend URL '{}' cannot carry an API path", cfg.base_url());
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build the HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Unknown(format!("'{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ServiceError> {
        let url = self.endpoint(segments)?;
        debug!("{method} {}", url.path());
        Ok(self.client.request(method, url))
    }

    /// Sends the request and returns the body of a successful response.
    async fn exchange(&self, request: RequestBuilder) -> Result<String, ServiceError> {
        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "backend rejected request");
            return Err(ServiceError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let body = self.exchange(request).await?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::Unknown(format!("unexpected response body: {e}")))
    }

    async fn acknowledge(&self, request: RequestBuilder) -> Result<Ack, ServiceError> {
        let ack = Ack::from_body(&self.exchange(request).await?);
        if let Some(message) = &ack.message {
            debug!(%message, "backend acknowledged");
        }
        Ok(ack)
    }
}

/// Maps a client-side failure onto the console's error kinds.
fn classify(err: reqwest::Error) -> ServiceError {
    let unanswered = !err.is_builder()
        && (err.is_connect() || err.is_timeout() || err.is_request() || err.is_body());
    let detail = err.without_url().to_string();
    if unanswered {
        ServiceError::Transport(detail)
    } else {
        ServiceError::Unknown(detail)
    }
}

#[async_trait]
impl DeviceService for HttpDeviceService {
    async fn get_devices(&self) -> Result<Vec<Device>, ServiceError> {
        self.fetch(self.request(Method::GET, &["api", "devices"])?).await
    }

    async fn get_device_detail(&self, ip: &str) -> Result<DeviceDetail, ServiceError> {
        self.fetch(self.request(Method::GET, &["api", "devices", ip])?).await
    }

    async fn scan_network(&self, range: Option<&str>) -> Result<Ack, ServiceError> {
        let body = NetworkScanRequest {
            network_range: range.map(str::to_string),
        };
        self.acknowledge(self.request(Method::POST, &["api", "scan", "network"])?.json(&body))
            .await
    }

    async fn scan_ports(&self, ip: &str) -> Result<Ack, ServiceError> {
        let body = PortScanRequest {
            ip_address: ip.to_string(),
        };
        self.acknowledge(self.request(Method::POST, &["api", "scan", "ports"])?.json(&body))
            .await
    }

    async fn update_device(&self, ip: &str, update: &DeviceUpdate) -> Result<Ack, ServiceError> {
        self.acknowledge(self.request(Method::PUT, &["api", "devices", ip])?.json(update))
            .await
    }

    async fn reset_devices(&self) -> Result<Ack, ServiceError> {
        self.acknowledge(self.request(Method::POST, &["api", "devices", "reset"])?)
            .await
    }
}
