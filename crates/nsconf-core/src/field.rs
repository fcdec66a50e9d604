//! Dotted field paths and typed field values.
//!
//! A path addresses either a top-level field (`applicationName`) or one
//! level of nesting into an embedded record (`kubernetesQuotas.pods`,
//! `solutionArchReview.approved`). Edits never reach deeper than that;
//! list rows are edited through the draft-list layer and committed as a
//! whole list.

use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;
use crate::schema::migrate_egress_endpoints;
use crate::types::*;

/// Top-level scalar and list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopField {
    Id,
    ApplicationName,
    NamespaceName,
    NamespaceDescription,
    NamespaceAccessAdGroup,
    AwsIamRole,
    SplunkHecToken,
    EgressEndpointsList,
    ExposedDomainsList,
    StorageRequirements,
}

impl TopField {
    const ALL: [TopField; 10] = [
        TopField::Id,
        TopField::ApplicationName,
        TopField::NamespaceName,
        TopField::NamespaceDescription,
        TopField::NamespaceAccessAdGroup,
        TopField::AwsIamRole,
        TopField::SplunkHecToken,
        TopField::EgressEndpointsList,
        TopField::ExposedDomainsList,
        TopField::StorageRequirements,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TopField::Id => "id",
            TopField::ApplicationName => "applicationName",
            TopField::NamespaceName => "namespaceName",
            TopField::NamespaceDescription => "namespaceDescription",
            TopField::NamespaceAccessAdGroup => "namespaceAccessAdGroup",
            TopField::AwsIamRole => "awsIamRole",
            TopField::SplunkHecToken => "splunkHecToken",
            TopField::EgressEndpointsList => "egressEndpointsList",
            TopField::ExposedDomainsList => "exposedDomainsList",
            TopField::StorageRequirements => "storageRequirements",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaField {
    Services,
    Pods,
    RequestsCpu,
    RequestsMemory,
    LimitsMemory,
    RequestsEphemeralStorage,
    PersistentVolumeClaims,
}

impl QuotaField {
    pub const COUNTS: [QuotaField; 3] = [
        QuotaField::Services,
        QuotaField::Pods,
        QuotaField::PersistentVolumeClaims,
    ];

    pub const QUANTITIES: [QuotaField; 4] = [
        QuotaField::RequestsCpu,
        QuotaField::RequestsMemory,
        QuotaField::LimitsMemory,
        QuotaField::RequestsEphemeralStorage,
    ];

    pub fn key(self) -> &'static str {
        match self {
            QuotaField::Services => "services",
            QuotaField::Pods => "pods",
            QuotaField::RequestsCpu => "requestsCpu",
            QuotaField::RequestsMemory => "requestsMemory",
            QuotaField::LimitsMemory => "limitsMemory",
            QuotaField::RequestsEphemeralStorage => "requestsEphemeralStorage",
            QuotaField::PersistentVolumeClaims => "persistentVolumeClaims",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuotaField::Services => "Services",
            QuotaField::Pods => "Pods",
            QuotaField::RequestsCpu => "Requests CPU",
            QuotaField::RequestsMemory => "Requests Memory",
            QuotaField::LimitsMemory => "Limits Memory",
            QuotaField::RequestsEphemeralStorage => "Requests Ephemeral Storage",
            QuotaField::PersistentVolumeClaims => "Persistent Volume Claims",
        }
    }

    pub fn is_count(self) -> bool {
        Self::COUNTS.contains(&self)
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::COUNTS
            .into_iter()
            .chain(Self::QUANTITIES)
            .find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewField {
    Approved,
    Explanation,
}

impl ReviewField {
    pub fn key(self) -> &'static str {
        match self {
            ReviewField::Approved => "approved",
            ReviewField::Explanation => "explanation",
        }
    }
}

/// Editable location in a [`NamespaceConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Top(TopField),
    Quota(QuotaField),
    Review(ReviewKind, ReviewField),
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, FieldError> {
        let parts: Vec<&str> = path.split('.').collect();
        match parts.as_slice() {
            [top] => TopField::ALL
                .into_iter()
                .find(|field| field.key() == *top)
                .map(FieldPath::Top)
                .ok_or_else(|| FieldError::UnknownPath(path.to_string())),
            ["kubernetesQuotas", child] => QuotaField::from_key(child)
                .map(FieldPath::Quota)
                .ok_or_else(|| FieldError::UnknownPath(path.to_string())),
            [parent, child] => {
                let kind = ReviewKind::from_key(parent)
                    .ok_or_else(|| FieldError::UnknownPath(path.to_string()))?;
                let field = match *child {
                    "approved" => ReviewField::Approved,
                    "explanation" => ReviewField::Explanation,
                    _ => return Err(FieldError::UnknownPath(path.to_string())),
                };
                Ok(FieldPath::Review(kind, field))
            }
            _ => Err(FieldError::TooDeep(path.to_string())),
        }
    }

    /// Value kind accepted at this path.
    pub fn expected_kind(&self) -> &'static str {
        match self {
            FieldPath::Top(TopField::EgressEndpointsList) => "egress endpoints",
            FieldPath::Top(TopField::ExposedDomainsList) => "exposed domains",
            FieldPath::Top(TopField::StorageRequirements) => "storage requirements",
            FieldPath::Top(_) => "text",
            FieldPath::Quota(field) if field.is_count() => "count",
            FieldPath::Quota(_) => "text",
            FieldPath::Review(_, ReviewField::Approved) => "flag",
            FieldPath::Review(_, ReviewField::Explanation) => "text",
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Top(field) => f.write_str(field.key()),
            FieldPath::Quota(field) => write!(f, "kubernetesQuotas.{}", field.key()),
            FieldPath::Review(kind, field) => write!(f, "{}.{}", kind.key(), field.key()),
        }
    }
}

impl FromStr for FieldPath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Value carried by a field edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Count(QuotaCount),
    Flag(bool),
    EgressEndpoints(Vec<EgressEndpoint>),
    ExposedDomains(Vec<ExposedDomain>),
    StorageRequirements(Vec<StorageRequirement>),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Count(_) => "count",
            FieldValue::Flag(_) => "flag",
            FieldValue::EgressEndpoints(_) => "egress endpoints",
            FieldValue::ExposedDomains(_) => "exposed domains",
            FieldValue::StorageRequirements(_) => "storage requirements",
        }
    }

    /// Interpret raw text input for the given path.
    ///
    /// Counts that do not parse become NaN so validation can report them.
    /// List fields take JSON; egress endpoints also accept the legacy
    /// `host:port` list forms.
    pub fn from_input(path: &FieldPath, raw: &str) -> Result<Self, FieldError> {
        let invalid = |reason: String| FieldError::InvalidInput {
            path: path.to_string(),
            reason,
        };
        match path.expected_kind() {
            "count" => Ok(FieldValue::Count(QuotaCount::from_input(raw))),
            "flag" => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(FieldValue::Flag(true)),
                "false" | "no" | "n" | "0" => Ok(FieldValue::Flag(false)),
                other => Err(invalid(format!("expected true or false, got {other:?}"))),
            },
            "egress endpoints" => {
                let value = serde_json::from_str(raw)
                    .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
                migrate_egress_endpoints(&value)
                    .map(FieldValue::EgressEndpoints)
                    .map_err(|e| invalid(e.to_string()))
            }
            "exposed domains" => serde_json::from_str(raw)
                .map(FieldValue::ExposedDomains)
                .map_err(|e| invalid(e.to_string())),
            "storage requirements" => serde_json::from_str(raw)
                .map(FieldValue::StorageRequirements)
                .map_err(|e| invalid(e.to_string())),
            _ => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<QuotaCount> for FieldValue {
    fn from(value: QuotaCount) -> Self {
        FieldValue::Count(value)
    }
}

impl NamespaceConfig {
    /// Copy of this record with only the addressed leaf replaced.
    pub fn with_field(&self, path: &FieldPath, value: FieldValue) -> Result<Self, FieldError> {
        let mut next = self.clone();
        next.set_field(path, value)?;
        Ok(next)
    }

    /// Replace the addressed leaf in place.
    pub fn set_field(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldError> {
        let mismatch = |value: &FieldValue| FieldError::TypeMismatch {
            path: path.to_string(),
            expected: path.expected_kind(),
            actual: value.kind(),
        };

        match (path, value) {
            (FieldPath::Top(field), FieldValue::Text(text)) => {
                let slot = match field {
                    TopField::Id => &mut self.id,
                    TopField::ApplicationName => &mut self.application_name,
                    TopField::NamespaceName => &mut self.namespace_name,
                    TopField::NamespaceDescription => &mut self.namespace_description,
                    TopField::NamespaceAccessAdGroup => &mut self.namespace_access_ad_group,
                    TopField::AwsIamRole => &mut self.aws_iam_role,
                    TopField::SplunkHecToken => &mut self.splunk_hec_token,
                    _ => return Err(mismatch(&FieldValue::Text(text))),
                };
                *slot = text;
            }
            (FieldPath::Top(TopField::EgressEndpointsList), FieldValue::EgressEndpoints(list)) => {
                self.egress_endpoints_list = list;
            }
            (FieldPath::Top(TopField::ExposedDomainsList), FieldValue::ExposedDomains(list)) => {
                self.exposed_domains_list = list;
            }
            (
                FieldPath::Top(TopField::StorageRequirements),
                FieldValue::StorageRequirements(list),
            ) => {
                self.storage_requirements = list;
            }
            (FieldPath::Quota(field), FieldValue::Count(count)) if field.is_count() => {
                let quotas = &mut self.kubernetes_quotas;
                match field {
                    QuotaField::Services => quotas.services = count,
                    QuotaField::Pods => quotas.pods = count,
                    _ => quotas.persistent_volume_claims = count,
                }
            }
            (FieldPath::Quota(field), FieldValue::Text(text)) if !field.is_count() => {
                let quotas = &mut self.kubernetes_quotas;
                match field {
                    QuotaField::RequestsCpu => quotas.requests_cpu = text,
                    QuotaField::RequestsMemory => quotas.requests_memory = text,
                    QuotaField::LimitsMemory => quotas.limits_memory = text,
                    _ => quotas.requests_ephemeral_storage = text,
                }
            }
            (FieldPath::Review(kind, ReviewField::Approved), FieldValue::Flag(flag)) => {
                self.review_mut(*kind).approved = flag;
            }
            (FieldPath::Review(kind, ReviewField::Explanation), FieldValue::Text(text)) => {
                self.review_mut(*kind).explanation = Some(text);
            }
            (_, other) => return Err(mismatch(&other)),
        }
        Ok(())
    }

    /// Current value at the addressed leaf.
    pub fn get_field(&self, path: &FieldPath) -> FieldValue {
        match path {
            FieldPath::Top(field) => match field {
                TopField::Id => self.id.as_str().into(),
                TopField::ApplicationName => self.application_name.as_str().into(),
                TopField::NamespaceName => self.namespace_name.as_str().into(),
                TopField::NamespaceDescription => self.namespace_description.as_str().into(),
                TopField::NamespaceAccessAdGroup => self.namespace_access_ad_group.as_str().into(),
                TopField::AwsIamRole => self.aws_iam_role.as_str().into(),
                TopField::SplunkHecToken => self.splunk_hec_token.as_str().into(),
                TopField::EgressEndpointsList => {
                    FieldValue::EgressEndpoints(self.egress_endpoints_list.clone())
                }
                TopField::ExposedDomainsList => {
                    FieldValue::ExposedDomains(self.exposed_domains_list.clone())
                }
                TopField::StorageRequirements => {
                    FieldValue::StorageRequirements(self.storage_requirements.clone())
                }
            },
            FieldPath::Quota(field) => {
                let quotas = &self.kubernetes_quotas;
                match field {
                    QuotaField::Services => quotas.services.into(),
                    QuotaField::Pods => quotas.pods.into(),
                    QuotaField::PersistentVolumeClaims => quotas.persistent_volume_claims.into(),
                    QuotaField::RequestsCpu => quotas.requests_cpu.as_str().into(),
                    QuotaField::RequestsMemory => quotas.requests_memory.as_str().into(),
                    QuotaField::LimitsMemory => quotas.limits_memory.as_str().into(),
                    QuotaField::RequestsEphemeralStorage => {
                        quotas.requests_ephemeral_storage.as_str().into()
                    }
                }
            }
            FieldPath::Review(kind, ReviewField::Approved) => self.review(*kind).approved.into(),
            FieldPath::Review(kind, ReviewField::Explanation) => self
                .review(*kind)
                .explanation
                .clone()
                .unwrap_or_default()
                .into(),
        }
    }
}
