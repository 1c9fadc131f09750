// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Domain types shared by the controller, poller and projector.

pub mod replication;
pub mod status;

pub use replication::{ReplicationType, TargetState};
pub use status::{PrimaryInfo, PrimaryStatus, Projection, SecondaryInfo, SecondaryStatus};
