// src/api/mod.rs

pub mod admin;
pub mod auth;
pub mod compiler;
pub mod lectures;
pub mod quiz;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::{config::Config, error::ClientError};

/// Response envelope used by every course API endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn failure_message(&mut self) -> String {
        self.error
            .take()
            .or_else(|| self.message.take())
            .unwrap_or_else(|| "Request failed".to_string())
    }

    /// Extracts `data`, turning `success: false` into an error.
    pub fn into_data(mut self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Api {
                status: 200,
                message: self.failure_message(),
            });
        }
        self.data
            .ok_or_else(|| ClientError::Decode("response has no data".to_string()))
    }

    /// For endpoints whose payload is irrelevant; returns the server message.
    pub fn into_ack(mut self) -> Result<Option<String>, ClientError> {
        if !self.success {
            return Err(ClientError::Api {
                status: 200,
                message: self.failure_message(),
            });
        }
        Ok(self.message)
    }
}

/// Gateway for every outbound call: base URL, timeout, JSON headers and one
/// place where failures are logged. No retries, no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    compiler_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Self::build(&config.api_url, &config.compiler_url, config.request_timeout)
    }

    pub fn build(api_url: &str, compiler_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: normalize_base(api_url)?,
            compiler_url: normalize_base(compiler_url)?,
        })
    }

    /// Resolves an API path (e.g. `/tests/3`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub(crate) fn compiler_endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.compiler_url.join(path.trim_start_matches('/'))?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        self.send(self.http.get(url), path).await?.into_data()
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send(self.http.post(url).json(body), path)
            .await?
            .into_data()
    }

    /// Request whose response data is ignored. Returns the server message.
    pub(crate) async fn command(&self, method: Method, path: &str) -> Result<Option<String>, ClientError> {
        let url = self.endpoint(path)?;
        self.send::<serde_json::Value>(self.http.request(method, url), path)
            .await?
            .into_ack()
    }

    /// Raw request against the code execution service, which does not use the envelope.
    pub(crate) async fn compiler_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| log_transport(path, e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| log_transport(path, e))?;

        match serde_json::from_slice::<T>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(log_status(path, status, None)),
            Err(e) => {
                tracing::error!("Undecodable response from {}: {}", path, e);
                Err(e.into())
            }
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let response = request.send().await.map_err(|e| log_transport(path, e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| log_transport(path, e))?;

        let envelope = match serde_json::from_slice::<ApiEnvelope<T>>(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(log_status(path, status, None)),
            Err(e) => {
                tracing::error!("Undecodable response from {}: {}", path, e);
                return Err(e.into());
            }
        };

        if !status.is_success() {
            let message = envelope.error.or(envelope.message);
            return Err(log_status(path, status, message));
        }

        if !envelope.success {
            tracing::warn!(
                "Request to {} reported failure: {}",
                path,
                envelope.error.as_deref().unwrap_or("no message")
            );
        }

        Ok(envelope)
    }
}

/// Ensures the base URL ends with `/` so relative joins append instead of replace.
fn normalize_base(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn log_status(path: &str, status: StatusCode, message: Option<String>) -> ClientError {
    let message = message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });

    if status == StatusCode::NOT_FOUND {
        tracing::error!("Resource not found ({}): {}", path, message);
    } else if status.is_server_error() {
        tracing::error!("Server error ({}, {}): {}", path, status.as_u16(), message);
    } else {
        tracing::error!("Client error ({}, {}): {}", path, status.as_u16(), message);
    }

    ClientError::from_status(status.as_u16(), message)
}

fn log_transport(path: &str, err: reqwest::Error) -> ClientError {
    tracing::error!("Network error ({}): {}", path, err);
    ClientError::from(err)
}
