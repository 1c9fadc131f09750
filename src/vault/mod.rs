// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Access to the cluster's control API and health endpoint.

pub mod client;
pub mod response;

pub use client::{ApiClient, HttpsService, VaultClient};
pub use response::{ApiResponse, WrapInfo};
