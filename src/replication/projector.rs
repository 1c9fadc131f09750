// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Checked projection of status responses onto observed records.
//!
//! Status payloads are untrusted input: every field is decoded explicitly and
//! a missing or mistyped one yields `MalformedResponse` naming the field. A
//! payload whose mode is `disabled` only needs a valid `mode`; the remaining
//! fields are decoded when present and left empty otherwise, since the record
//! is about to be purged anyway.

use crate::error::{ReplicationError, Result};
use crate::types::{PrimaryStatus, Projection, SecondaryInfo, SecondaryStatus};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

const DISABLED: &str = "disabled";

type Data = Map<String, Value>;

pub fn project_primary(data: &Data) -> Result<Projection<PrimaryStatus>> {
    let mode = required_str(data, "mode")?;
    let lenient = mode == DISABLED;

    let record = PrimaryStatus {
        primary_cluster_addr: string_field(data, "primary_cluster_addr", lenient)?,
        cluster_id: string_field(data, "cluster_id", lenient)?,
        state: string_field(data, "state", lenient)?,
        known_secondaries: string_set(data, "known_secondaries", lenient)?,
        secondaries: records(data, "secondaries", lenient)?,
        mode,
    };

    Ok(Projection {
        should_purge: lenient,
        record,
    })
}

pub fn project_secondary(data: &Data) -> Result<Projection<SecondaryStatus>> {
    let mode = required_str(data, "mode")?;
    let lenient = mode == DISABLED;

    let record = SecondaryStatus {
        primary_cluster_addr: string_field(data, "primary_cluster_addr", lenient)?,
        cluster_id: string_field(data, "cluster_id", lenient)?,
        state: string_field(data, "state", lenient)?,
        known_primary_cluster_addrs: string_set(data, "known_primary_cluster_addrs", lenient)?,
        primaries: records(data, "primaries", lenient)?,
        mode,
    };

    Ok(Projection {
        should_purge: lenient,
        record,
    })
}

/// Observed mode of a status payload
pub fn mode(data: &Data) -> Result<String> {
    required_str(data, "mode")
}

/// Secondary records registered on a primary; absent or null means none
pub fn secondaries(data: &Data) -> Result<Vec<SecondaryInfo>> {
    records(data, "secondaries", true)
}

fn required_str(data: &Data, field: &str) -> Result<String> {
    match data.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ReplicationError::malformed(
            field,
            format!("expected string, got {}", kind(other)),
        )),
        None => Err(ReplicationError::malformed(field, "missing")),
    }
}

fn string_field(data: &Data, field: &str, lenient: bool) -> Result<String> {
    if lenient && is_absent(data, field) {
        return Ok(String::new());
    }
    required_str(data, field)
}

fn string_set(data: &Data, field: &str, lenient: bool) -> Result<BTreeSet<String>> {
    if lenient && is_absent(data, field) {
        return Ok(BTreeSet::new());
    }
    let items = required_array(data, field)?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(ReplicationError::malformed(
                format!("{}[{}]", field, i),
                format!("expected string, got {}", kind(other)),
            )),
        })
        .collect()
}

fn records<T: DeserializeOwned>(data: &Data, field: &str, lenient: bool) -> Result<Vec<T>> {
    if lenient && is_absent(data, field) {
        return Ok(Vec::new());
    }
    let items = required_array(data, field)?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item.clone())
                .map_err(|e| ReplicationError::malformed(format!("{}[{}]", field, i), e.to_string()))
        })
        .collect()
}

fn required_array<'a>(data: &'a Data, field: &str) -> Result<&'a [Value]> {
    match data.get(field) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        // The server reports an empty list as null
        Some(Value::Null) => Ok(&[][..]),
        Some(other) => Err(ReplicationError::malformed(
            field,
            format!("expected array, got {}", kind(other)),
        )),
        None => Err(ReplicationError::malformed(field, "missing")),
    }
}

fn is_absent(data: &Data, field: &str) -> bool {
    matches!(data.get(field), None | Some(Value::Null))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Data {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn primary_payload(mode: &str) -> Data {
        data(json!({
            "primary_cluster_addr": "https://10.0.0.1:8201",
            "cluster_id": "c-1",
            "mode": mode,
            "state": "running",
            "known_secondaries": ["sec-1", "sec-2"],
            "secondaries": [{
                "api_address": "https://10.0.0.2:8200",
                "cluster_address": "https://10.0.0.2:8201",
                "connection_status": "connected",
                "last_heartbeat": "2026-01-01T00:00:00Z",
                "node_id": "sec-1"
            }]
        }))
    }

    #[test]
    fn test_project_primary() {
        let projection = project_primary(&primary_payload("primary")).unwrap();

        assert!(!projection.should_purge);
        let record = projection.record;
        assert_eq!(record.mode, "primary");
        assert_eq!(record.state, "running");
        assert_eq!(record.cluster_id, "c-1");
        assert_eq!(record.primary_cluster_addr, "https://10.0.0.1:8201");
        assert_eq!(record.known_secondaries.len(), 2);
        assert_eq!(record.secondaries.len(), 1);
        assert_eq!(record.secondaries[0].node_id, "sec-1");
        assert_eq!(record.secondaries[0].connection_status, "connected");
    }

    #[test]
    fn test_purge_only_when_disabled() {
        for mode in ["primary", "secondary", "bootstrapping", ""] {
            assert!(!project_primary(&primary_payload(mode)).unwrap().should_purge);
        }
        assert!(project_primary(&primary_payload("disabled")).unwrap().should_purge);
    }

    #[test]
    fn test_disabled_payload_with_only_mode() {
        let projection = project_primary(&data(json!({"mode": "disabled"}))).unwrap();

        assert!(projection.should_purge);
        assert_eq!(projection.record.mode, "disabled");
        assert!(projection.record.secondaries.is_empty());

        let projection = project_secondary(&data(json!({"mode": "disabled"}))).unwrap();
        assert!(projection.should_purge);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let mut payload = primary_payload("primary");
        payload.remove("cluster_id");

        let err = project_primary(&payload).unwrap_err();
        assert!(matches!(
            err,
            ReplicationError::MalformedResponse { ref field, .. } if field == "cluster_id"
        ));
    }

    #[test]
    fn test_mistyped_field_is_malformed() {
        let mut payload = primary_payload("primary");
        payload.insert("known_secondaries".into(), json!("sec-1"));

        let err = project_primary(&payload).unwrap_err();
        match err {
            ReplicationError::MalformedResponse { field, reason } => {
                assert_eq!(field, "known_secondaries");
                assert!(reason.contains("expected array"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_element_names_index() {
        let mut payload = primary_payload("primary");
        payload.insert("known_secondaries".into(), json!(["sec-1", 7]));

        let err = project_primary(&payload).unwrap_err();
        assert!(matches!(
            err,
            ReplicationError::MalformedResponse { ref field, .. } if field == "known_secondaries[1]"
        ));
    }

    #[test]
    fn test_missing_mode_is_malformed_even_when_lenient() {
        let err = project_primary(&data(json!({}))).unwrap_err();
        assert!(matches!(
            err,
            ReplicationError::MalformedResponse { ref field, .. } if field == "mode"
        ));
    }

    #[test]
    fn test_null_list_is_empty() {
        let mut payload = primary_payload("primary");
        payload.insert("secondaries".into(), Value::Null);

        let projection = project_primary(&payload).unwrap();
        assert!(projection.record.secondaries.is_empty());
    }

    #[test]
    fn test_secondaries_decodes_node_ids() {
        let records = secondaries(&primary_payload("primary")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].node_id, "sec-1");

        assert!(secondaries(&data(json!({"mode": "primary"}))).unwrap().is_empty());
    }

    #[test]
    fn test_secondaries_mistyped_node_id() {
        let payload = data(json!({"secondaries": [{"node_id": 42}]}));

        let err = secondaries(&payload).unwrap_err();
        assert!(matches!(
            err,
            ReplicationError::MalformedResponse { ref field, .. } if field == "secondaries[0]"
        ));
    }

    #[test]
    fn test_project_secondary() {
        let projection = project_secondary(&data(json!({
            "primary_cluster_addr": "https://primary:8201",
            "cluster_id": "c-1",
            "mode": "secondary",
            "state": "stream-wals",
            "known_primary_cluster_addrs": ["https://primary:8201"],
            "primaries": [{"api_address": "https://primary:8200", "connection_status": "connected"}]
        })))
        .unwrap();

        assert!(!projection.should_purge);
        assert_eq!(projection.record.state, "stream-wals");
        assert_eq!(projection.record.known_primary_cluster_addrs.len(), 1);
        assert_eq!(projection.record.primaries[0].api_address, "https://primary:8200");
    }
}
