//! Stored-record schema versions and upgrades.
//!
//! Version 1 records carry egress endpoints as plain strings (`"host"` or
//! `"host:port"`, sometimes a single newline/comma separated string) and
//! predate the Splunk token, storage requirements and service-mesh review.
//! Version 2 is the current shape of [`NamespaceConfig`].

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{SchemaError, SchemaResult};
use crate::types::{ArchitectureReview, EgressEndpoint, NamespaceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    pub const CURRENT: SchemaVersion = SchemaVersion::V2;
}

/// Keys introduced by version 2.
const V2_KEYS: [&str; 3] = ["splunkHecToken", "storageRequirements", "isPartOfServiceMesh"];

fn egress_is_typed(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items
            .first()
            .is_none_or(|first| first.as_object().is_some_and(|o| o.contains_key("domain"))),
        Some(_) => false,
    }
}

/// Detect the schema version of a raw record.
pub fn detect_version(record: &Value) -> SchemaVersion {
    let Some(object) = record.as_object() else {
        return SchemaVersion::V1;
    };
    let has_v2_keys = V2_KEYS.iter().all(|key| object.contains_key(*key));
    if has_v2_keys && egress_is_typed(object.get("egressEndpointsList")) {
        SchemaVersion::V2
    } else {
        SchemaVersion::V1
    }
}

/// Parse one legacy endpoint string. Exactly one colon splits host and port.
pub fn parse_endpoint(raw: &str) -> EgressEndpoint {
    let trimmed = raw.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();
    if let [domain, port] = parts.as_slice() {
        let port = port.trim();
        return EgressEndpoint {
            domain: domain.trim().to_string(),
            port: (!port.is_empty()).then(|| port.to_string()),
        };
    }
    EgressEndpoint {
        domain: trimmed.to_string(),
        port: None,
    }
}

/// Upgrade any known egress endpoint representation to typed endpoints.
///
/// Typed lists are detected by probing the first entry for a `domain` key
/// and returned as-is.
pub fn migrate_egress_endpoints(value: &Value) -> SchemaResult<Vec<EgressEndpoint>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(joined) => Ok(joined
            .split(['\n', ','])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_endpoint)
            .collect()),
        Value::Array(items) if egress_is_typed(Some(value)) => {
            Ok(serde_json::from_value(Value::Array(items.clone()))?)
        }
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(parse_endpoint(s)),
                other => Err(SchemaError::InvalidEgressEntry(other.to_string())),
            })
            .collect(),
        other => Err(SchemaError::InvalidEgressEntry(other.to_string())),
    }
}

fn fill_missing(object: &mut Map<String, Value>) -> SchemaResult<()> {
    object
        .entry("splunkHecToken")
        .or_insert_with(|| Value::String(String::new()));
    object
        .entry("storageRequirements")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !object.contains_key("isPartOfServiceMesh") {
        object.insert(
            "isPartOfServiceMesh".to_string(),
            serde_json::to_value(ArchitectureReview::pending())?,
        );
    }
    Ok(())
}

/// Upgrade a raw record of any version to the current schema.
pub fn migrate_record(mut record: Value) -> SchemaResult<NamespaceConfig> {
    let version = detect_version(&record);
    let object = record.as_object_mut().ok_or(SchemaError::NotAnObject)?;

    if version < SchemaVersion::CURRENT {
        let egress = object
            .get("egressEndpointsList")
            .map(migrate_egress_endpoints)
            .transpose()?
            .unwrap_or_default();
        object.insert("egressEndpointsList".to_string(), serde_json::to_value(egress)?);
        fill_missing(object)?;
        let id = object.get("id").and_then(|v| v.as_str()).unwrap_or("<none>");
        debug!(id, ?version, "upgraded namespace record");
    }

    Ok(serde_json::from_value(record)?)
}

/// Parse a JSON document holding a single record of any version.
pub fn parse_record(json: &str) -> SchemaResult<NamespaceConfig> {
    migrate_record(serde_json::from_str(json)?)
}
