// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Replication state transitions, convergence polling and status projection.

pub mod controller;
pub mod paths;
pub mod poller;
pub mod projector;

pub use controller::{
    Confirmation, ControllerConfig, ReplicationController, SecondaryEnable, TokenRequest,
};
pub use paths::Role;
pub use poller::{Backoff, ConvergencePoller, PollerConfig};
