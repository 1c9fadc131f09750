// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking control-plane HTTP responses.

use crate::vault::VaultClient;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::time::Instant;
use tower::{BoxError, Service};
use url::Url;

#[derive(Clone, Debug)]
enum Reply {
    Json(u16, String),
    Fail(String),
}

/// A request observed by [`MockService`]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
    pub token: Option<String>,
    pub at: Instant,
}

/// A mock HTTP service that returns scripted responses based on request paths.
///
/// Each (method, path) holds a queue of replies; the last reply repeats once
/// the queue is drained. Unmatched requests answer 404 with no errors.
#[derive(Clone, Default)]
pub struct MockService {
    replies: Arc<Mutex<HashMap<(String, String), VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, method: &str, path: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.push("GET", path, Reply::Json(status, body.to_string()))
    }

    /// Queue a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.push("PUT", path, Reply::Json(status, body.to_string()))
    }

    /// Queue a transport failure for GET requests matching the exact path
    pub fn fail_get(self, path: &str, message: &str) -> Self {
        self.push("GET", path, Reply::Fail(message.to_string()))
    }

    /// Queue a transport failure for PUT requests matching the exact path
    pub fn fail_put(self, path: &str, message: &str) -> Self {
        self.push("PUT", path, Reply::Fail(message.to_string()))
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received so far for one path
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Build a client against this mock service
    pub fn into_client(self) -> VaultClient<MockService> {
        VaultClient::new(
            self,
            Url::parse("http://vault.test:8200").unwrap(),
            "s.test".to_string(),
            None,
        )
    }

    fn next_reply(&self, method: &str, path: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Service<Request<Full<Bytes>>> for MockService {
    type Response = Response<Full<Bytes>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        let token = req
            .headers()
            .get(crate::constants::headers::TOKEN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let reply = self.next_reply(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            let body = if bytes.is_empty() {
                None
            } else {
                serde_json::from_slice(&bytes).ok()
            };
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                body,
                token,
                at: Instant::now(),
            });

            match reply {
                Some(Reply::Json(status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Full::new(Bytes::from(body)))
                    .unwrap()),
                Some(Reply::Fail(message)) => Err(message.into()),
                None => Ok(Response::builder()
                    .status(404)
                    .header("content-type", "application/json")
                    .body(Full::new(Bytes::from_static(br#"{"errors":[]}"#)))
                    .unwrap()),
            }
        })
    }
}

/// Status payload of an enabled primary
pub fn primary_status_json(mode: &str, secondaries: &[&str]) -> String {
    let secondaries: Vec<Value> = secondaries
        .iter()
        .map(|id| {
            serde_json::json!({
                "api_address": format!("https://{}.example.com:8200", id),
                "cluster_address": format!("https://{}.example.com:8201", id),
                "connection_status": "connected",
                "last_heartbeat": "2026-01-01T00:00:00Z",
                "node_id": id,
            })
        })
        .collect();

    serde_json::json!({
        "data": {
            "primary_cluster_addr": "",
            "cluster_id": "5c8a1b2e-1f9d-4b7a-9a57-6c7b0b1e2f3a",
            "mode": mode,
            "state": "running",
            "known_secondaries": secondaries.iter().map(|s| s["node_id"].clone()).collect::<Vec<_>>(),
            "secondaries": secondaries,
        }
    })
    .to_string()
}

/// Status payload of an enabled secondary
pub fn secondary_status_json(mode: &str) -> String {
    serde_json::json!({
        "data": {
            "primary_cluster_addr": "https://primary.example.com:8201",
            "cluster_id": "5c8a1b2e-1f9d-4b7a-9a57-6c7b0b1e2f3a",
            "mode": mode,
            "state": "stream-wals",
            "known_primary_cluster_addrs": ["https://primary.example.com:8201"],
            "primaries": [{
                "api_address": "https://primary.example.com:8200",
                "cluster_address": "https://primary.example.com:8201",
                "connection_status": "connected",
                "last_heartbeat": "2026-01-01T00:00:00Z",
            }],
        }
    })
    .to_string()
}

/// Health payload reporting a replication mode for one type
pub fn health_json(ty: &str, mode: &str) -> String {
    let mut body = serde_json::json!({
        "initialized": true,
        "sealed": false,
        "standby": false,
    });
    body[format!("replication_{}_mode", ty)] = Value::String(mode.to_string());
    body.to_string()
}
