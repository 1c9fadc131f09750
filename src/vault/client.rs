// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the cluster's control API and health endpoint.

use crate::config::Config;
use crate::constants::{headers, paths};
use crate::error::ApiError;
use crate::vault::response::ApiResponse;
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::future::Future;
use tower::{BoxError, Service, ServiceExt};
use tracing::{debug, instrument};
use url::Url;

/// Capability the replication core needs from the control plane.
///
/// `read` and `write` return `None` when the server answers without a body.
pub trait ApiClient: Send + Sync {
    fn read(&self, path: &str)
        -> impl Future<Output = Result<Option<ApiResponse>, ApiError>> + Send;

    fn write(
        &self,
        path: &str,
        payload: Option<Map<String, Value>>,
    ) -> impl Future<Output = Result<Option<ApiResponse>, ApiError>> + Send;

    /// Unauthenticated GET of the health endpoint.
    ///
    /// Returns the status with the raw body; the endpoint encodes node state in
    /// non-2xx codes, so those are not errors here.
    fn health(&self, query: &[(&str, &str)])
        -> impl Future<Output = Result<(StatusCode, Bytes), ApiError>> + Send;
}

/// Transport used by [`VaultClient::connect`]
pub type HttpsService = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// [`ApiClient`] over any tower service speaking `http` requests.
#[derive(Clone)]
pub struct VaultClient<S> {
    service: S,
    base: Url,
    token: String,
    namespace: Option<String>,
}

impl VaultClient<HttpsService> {
    /// Build a client with a TLS-capable hyper transport
    pub fn connect(config: &Config) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let service = Client::builder(TokioExecutor::new()).build(connector);

        Self::new(
            service,
            config.vault_addr.clone(),
            config.token.clone(),
            config.namespace.clone(),
        )
    }
}

impl<S> VaultClient<S> {
    pub fn new(service: S, base: Url, token: String, namespace: Option<String>) -> Self {
        Self {
            service,
            base,
            token,
            namespace,
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let full = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&full).map_err(|e| ApiError::Request(format!("invalid url {}: {}", full, e)))
    }

    fn logical_url(&self, path: &str) -> Result<Url, ApiError> {
        self.url(&format!("{}/{}", paths::API_PREFIX, path.trim_start_matches('/')))
    }

    fn request(
        &self,
        method: Method,
        url: &Url,
        body: Bytes,
        authenticated: bool,
    ) -> Result<Request<Full<Bytes>>, ApiError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(http::header::CONTENT_TYPE, "application/json");
        if authenticated {
            builder = builder.header(headers::TOKEN, &self.token);
            if let Some(ns) = &self.namespace {
                builder = builder.header(headers::NAMESPACE, ns);
            }
        }
        builder
            .body(Full::new(body))
            .map_err(|e| ApiError::Request(e.to_string()))
    }
}

impl<S, B> VaultClient<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<B>> + Clone + Send + Sync,
    S::Future: Send,
    S::Error: Into<BoxError>,
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<(StatusCode, Bytes), ApiError> {
        let response = self.service.clone().oneshot(request).await.map_err(|e| {
            let e: BoxError = e.into();
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| {
                let e: BoxError = e.into();
                ApiError::Transport(e.to_string())
            })?
            .to_bytes();

        Ok((status, body))
    }

    async fn logical(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
    ) -> Result<Option<ApiResponse>, ApiError> {
        let url = self.logical_url(path)?;
        let request = self.request(method.clone(), &url, body, true)?;
        let (status, body) = self.send(request).await?;
        debug!("{} {} -> {}", method, url.path(), status);

        if !status.is_success() {
            let parsed: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            // A read of a path with no data answers 404 without errors
            if status == StatusCode::NOT_FOUND && method == Method::GET && parsed.errors.is_empty()
            {
                return Ok(None);
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                errors: parsed.errors,
            });
        }

        if status == StatusCode::NO_CONTENT || body.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl<S, B> ApiClient for VaultClient<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<B>> + Clone + Send + Sync,
    S::Future: Send,
    S::Error: Into<BoxError>,
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    #[instrument(skip(self))]
    async fn read(&self, path: &str) -> Result<Option<ApiResponse>, ApiError> {
        self.logical(Method::GET, path, Bytes::new()).await
    }

    #[instrument(skip(self, payload))]
    async fn write(
        &self,
        path: &str,
        payload: Option<Map<String, Value>>,
    ) -> Result<Option<ApiResponse>, ApiError> {
        let body = serde_json::to_vec(&payload.unwrap_or_default())
            .map_err(|e| ApiError::Request(e.to_string()))?;
        self.logical(Method::PUT, path, Bytes::from(body)).await
    }

    async fn health(&self, query: &[(&str, &str)]) -> Result<(StatusCode, Bytes), ApiError> {
        let mut url = self.url(paths::HEALTH)?;
        url.query_pairs_mut().extend_pairs(query);
        let request = self.request(Method::GET, &url, Bytes::new(), false)?;
        let (status, body) = self.send(request).await?;
        debug!("GET {} -> {}", url.path(), status);

        Ok((status, body))
    }
}
