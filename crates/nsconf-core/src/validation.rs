//! Record validation.
//!
//! [`validate`] runs every rule and collects all messages, keyed by dotted
//! field path (`kubernetesQuotas.services`, `storageRequirements.0.storageSize`).
//! The path keys let a form surface each message next to its field and
//! drop it again once that field is edited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::QuotaField;
use crate::types::*;

/// Field path → message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    /// Drop the entry for exactly this path. Returns true if one existed.
    pub fn clear(&mut self, path: &str) -> bool {
        self.0.remove(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// `"<label> is required"` when the value is empty or whitespace.
pub fn validate_required(value: &str, label: &str) -> Option<String> {
    is_blank(Some(value)).then(|| format!("{label} is required"))
}

/// Reject NaN and negative counts first, then fractional ones.
pub fn validate_positive_integer(value: QuotaCount, label: &str) -> Option<String> {
    let v = value.value();
    if v.is_nan() || v < 0.0 {
        return Some(format!("{label} must be a positive number"));
    }
    if !value.is_whole() {
        return Some(format!("{label} must be a whole number"));
    }
    None
}

/// An unapproved review needs a non-blank explanation.
pub fn validate_architecture_review(review: &ArchitectureReview, label: &str) -> Option<String> {
    (!review.approved && is_blank(review.explanation.as_deref()))
        .then(|| format!("Explanation is required when {label} is not approved"))
}

fn required_strings(config: &NamespaceConfig) -> [(&'static str, &'static str, &str); 6] {
    [
        ("applicationName", "Application Name", config.application_name.as_str()),
        ("namespaceName", "Namespace Name", config.namespace_name.as_str()),
        ("namespaceDescription", "Namespace Description", config.namespace_description.as_str()),
        ("namespaceAccessAdGroup", "Namespace Access AD Group", config.namespace_access_ad_group.as_str()),
        ("awsIamRole", "AWS IAM Role", config.aws_iam_role.as_str()),
        ("splunkHecToken", "Splunk HEC Token", config.splunk_hec_token.as_str()),
    ]
}

fn quota_count(quotas: &KubernetesQuotas, field: QuotaField) -> QuotaCount {
    match field {
        QuotaField::Services => quotas.services,
        QuotaField::Pods => quotas.pods,
        _ => quotas.persistent_volume_claims,
    }
}

fn quota_quantity(quotas: &KubernetesQuotas, field: QuotaField) -> &str {
    match field {
        QuotaField::RequestsCpu => &quotas.requests_cpu,
        QuotaField::RequestsMemory => &quotas.requests_memory,
        QuotaField::LimitsMemory => &quotas.limits_memory,
        _ => &quotas.requests_ephemeral_storage,
    }
}

/// Validate a whole record.
pub fn validate(config: &NamespaceConfig) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for (key, label, value) in required_strings(config) {
        if let Some(message) = validate_required(value, label) {
            errors.insert(key, message);
        }
    }

    let quotas = &config.kubernetes_quotas;
    for field in QuotaField::COUNTS {
        if let Some(message) = validate_positive_integer(quota_count(quotas, field), field.label()) {
            errors.insert(format!("kubernetesQuotas.{}", field.key()), message);
        }
    }
    for field in QuotaField::QUANTITIES {
        if let Some(message) = validate_required(quota_quantity(quotas, field), field.label()) {
            errors.insert(format!("kubernetesQuotas.{}", field.key()), message);
        }
    }

    for kind in ReviewKind::ALL {
        if let Some(message) = validate_architecture_review(config.review(kind), kind.label()) {
            errors.insert(format!("{}.explanation", kind.key()), message);
        }
    }

    for (index, storage) in config.storage_requirements.iter().enumerate() {
        // Stricter than `<= 0`: a NaN size is also rejected.
        if !(storage.storage_size > 0.0) {
            errors.insert(
                format!("storageRequirements.{index}.storageSize"),
                "Storage size must be greater than 0",
            );
        }
        match &storage.backend {
            StorageBackend::Efs { access_point_id } if is_blank(access_point_id.as_deref()) => {
                errors.insert(
                    format!("storageRequirements.{index}.efsAccessPointId"),
                    "EFS Access Point ID is required when storage type is EFS",
                );
            }
            StorageBackend::Islon { share_path } if is_blank(share_path.as_deref()) => {
                errors.insert(
                    format!("storageRequirements.{index}.islonSharePath"),
                    "Islon Share Path is required when storage type is Islon",
                );
            }
            _ => {}
        }
    }

    errors
}

/// Error for a single field path, if the record has one there.
pub fn validate_field(config: &NamespaceConfig, path: &str) -> Option<String> {
    validate(config).get(path).map(str::to_string)
}
