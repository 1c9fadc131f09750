// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Control-plane paths for each replication type and operation.

use crate::constants::paths::REPLICATION_BASE;
use crate::types::ReplicationType;
use std::fmt;

/// Role a cluster takes within one replication type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Primary,
    Secondary,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Primary => f.write_str("primary"),
            Role::Secondary => f.write_str("secondary"),
        }
    }
}

pub fn enable(ty: ReplicationType, role: Role) -> String {
    format!("{}{}/{}/enable", REPLICATION_BASE, ty, role)
}

pub fn disable(ty: ReplicationType, role: Role) -> String {
    format!("{}{}/{}/disable", REPLICATION_BASE, ty, role)
}

pub fn status(ty: ReplicationType) -> String {
    format!("{}{}/status", REPLICATION_BASE, ty)
}

pub fn token_issue(ty: ReplicationType) -> String {
    format!("{}{}/primary/secondary-token", REPLICATION_BASE, ty)
}

pub fn token_revoke(ty: ReplicationType) -> String {
    format!("{}{}/primary/revoke-secondary", REPLICATION_BASE, ty)
}
