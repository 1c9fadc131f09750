// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::ReplicationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Replication stream a configuration or token applies to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReplicationType {
    Dr,
    Performance,
}

impl ReplicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicationType::Dr => "dr",
            ReplicationType::Performance => "performance",
        }
    }

    /// Name of the health response field reporting this stream's mode
    pub fn health_mode_field(&self) -> String {
        format!("replication_{}_mode", self.as_str())
    }
}

impl fmt::Display for ReplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplicationType {
    type Err = ReplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dr" => Ok(ReplicationType::Dr),
            "performance" => Ok(ReplicationType::Performance),
            other => Err(ReplicationError::InvalidType(other.to_string())),
        }
    }
}

/// State a caller waits for after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetState {
    /// Replication is running on the primary side
    Running,
    Primary,
    Secondary,
    Disabled,
}

impl TargetState {
    /// Mode value the health endpoint reports once this state is reached
    pub fn expected_mode(&self) -> &'static str {
        match self {
            TargetState::Running | TargetState::Primary => "primary",
            TargetState::Secondary => "secondary",
            TargetState::Disabled => "disabled",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetState::Running => f.write_str("running"),
            other => f.write_str(other.expected_mode()),
        }
    }
}

impl FromStr for TargetState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(TargetState::Running),
            "primary" => Ok(TargetState::Primary),
            "secondary" => Ok(TargetState::Secondary),
            "disabled" => Ok(TargetState::Disabled),
            other => Err(format!("unknown target state '{}'", other)),
        }
    }
}
