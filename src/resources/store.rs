// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Field storage backing a declarative resource.

use crate::error::{ReplicationError, Result};
use crate::types::ReplicationType;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Typed field access plus the durable identifier of one resource instance.
///
/// An identifier of `None` means the resource does not exist.
pub trait ConfigStore {
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: Option<String>);

    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    /// String value of `key`, treating an empty string as unset
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    fn required_str(&self, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| ReplicationError::MissingField(key.to_string()))
    }

    fn replication_type(&self) -> Result<ReplicationType> {
        self.required_str("type")?.parse()
    }

    /// Write every field of an observed record in one step
    fn apply_record<R: Serialize>(&mut self, record: &R) -> Result<()>
    where
        Self: Sized,
    {
        let fields = match serde_json::to_value(record) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(ReplicationError::malformed("record", "not an object")),
            Err(e) => return Err(ReplicationError::malformed("record", e.to_string())),
        };
        for (key, value) in fields {
            self.set(&key, value);
        }
        Ok(())
    }
}

/// In-memory [`ConfigStore`]
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    fields: BTreeMap<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for desired fields
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

impl ConfigStore for ResourceData {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id.filter(|id| !id.is_empty());
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }
}
