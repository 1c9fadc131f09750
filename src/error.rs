// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

/// Failures raised by the HTTP layer talking to the control plane.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {}", .errors.join(", "))]
    Status { status: u16, errors: Vec<String> },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    Request(String),
}

#[derive(Error, Debug)]
pub enum ReplicationError {
    #[error("error writing to {path}: {message}")]
    RemoteWriteError { path: String, message: String },

    #[error("error reading from {path}: {message}")]
    RemoteReadError { path: String, message: String },

    #[error("error waiting for replication at {path} after {attempts} attempt(s): {last_error}")]
    ConvergenceTimeout {
        path: String,
        attempts: u32,
        last_error: String,
    },

    #[error("malformed response field '{field}': {reason}")]
    MalformedResponse { field: String, reason: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("wait for replication at {path} was cancelled")]
    Cancelled { path: String },

    #[error("required field '{0}' is not set")]
    MissingField(String),

    #[error("invalid replication type '{0}', expected 'dr' or 'performance'")]
    InvalidType(String),
}

impl ReplicationError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReplicationError>;
