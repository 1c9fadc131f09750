// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Response envelope returned by logical reads and writes.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Field some endpoints use to report failures inside a 2xx response
pub const ERRORS_FIELD: &str = "Errors";

/// Response-wrapping metadata, present when the server wrapped the result
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapInfo {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub accessor: String,
    #[serde(default)]
    pub ttl: u64,
    #[serde(default)]
    pub creation_time: String,
    #[serde(default)]
    pub creation_path: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ApiResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub wrap_info: Option<WrapInfo>,
}

impl ApiResponse {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.get(key))
    }

    /// The `Errors` value embedded in the payload, if any
    pub fn embedded_errors(&self) -> Option<&Value> {
        self.get(ERRORS_FIELD)
    }

    pub fn wrapped_token(&self) -> Option<&str> {
        self.wrap_info
            .as_ref()
            .map(|w| w.token.as_str())
            .filter(|t| !t.is_empty())
    }
}
