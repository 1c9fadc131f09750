// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create/read/delete/exists lifecycles of the declarative replication resources.

pub mod primary;
pub mod secondary;
pub mod store;
pub mod token;

pub use store::{ConfigStore, ResourceData};
