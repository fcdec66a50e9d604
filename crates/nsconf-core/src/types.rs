//! Namespace configuration record and its embedded types.
//!
//! JSON keys are camelCase and serialize in declaration order, which is the
//! order the provisioning form presents them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root record: one per Kubernetes namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceConfig {
    pub id: String,
    pub application_name: String,
    pub namespace_name: String,
    pub namespace_description: String,
    pub kubernetes_quotas: KubernetesQuotas,
    pub namespace_access_ad_group: String,
    pub solution_arch_review: ArchitectureReview,
    pub tech_arch_review: ArchitectureReview,
    pub security_arch_review: ArchitectureReview,
    #[serde(default)]
    pub is_part_of_service_mesh: ArchitectureReview,
    pub aws_iam_role: String,
    #[serde(default)]
    pub splunk_hec_token: String,
    #[serde(default)]
    pub egress_endpoints_list: Vec<EgressEndpoint>,
    #[serde(default)]
    pub exposed_domains_list: Vec<ExposedDomain>,
    #[serde(default)]
    pub storage_requirements: Vec<StorageRequirement>,
}

impl NamespaceConfig {
    pub fn summary(&self) -> NamespaceSummary {
        NamespaceSummary {
            id: self.id.clone(),
            name: self.namespace_name.clone(),
        }
    }

    pub fn review(&self, kind: ReviewKind) -> &ArchitectureReview {
        match kind {
            ReviewKind::Solution => &self.solution_arch_review,
            ReviewKind::Technical => &self.tech_arch_review,
            ReviewKind::Security => &self.security_arch_review,
            ReviewKind::ServiceMesh => &self.is_part_of_service_mesh,
        }
    }

    pub fn review_mut(&mut self, kind: ReviewKind) -> &mut ArchitectureReview {
        match kind {
            ReviewKind::Solution => &mut self.solution_arch_review,
            ReviewKind::Technical => &mut self.tech_arch_review,
            ReviewKind::Security => &mut self.security_arch_review,
            ReviewKind::ServiceMesh => &mut self.is_part_of_service_mesh,
        }
    }

    /// Pretty JSON with 2-space indentation, for display and logging.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `{id, name}` pair returned by namespace listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSummary {
    pub id: String,
    pub name: String,
}

// ── Quotas ─────────────────────────────────────────────────────────

/// Numeric quota as entered or loaded.
///
/// Holds an `f64` so that NaN, negative and fractional inputs survive until
/// validation rejects them. Whole values serialize as JSON integers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct QuotaCount(pub f64);

impl QuotaCount {
    pub fn new(value: u32) -> Self {
        Self(f64::from(value))
    }

    /// Parse raw form input. Unparseable text becomes NaN.
    pub fn from_input(raw: &str) -> Self {
        Self(raw.trim().parse::<f64>().unwrap_or(f64::NAN))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_whole(self) -> bool {
        self.0.is_finite() && self.0.fract() == 0.0
    }
}

impl fmt::Display for QuotaCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for QuotaCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() && self.0.abs() < i64::MAX as f64 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for QuotaCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` is what serde_json produces for a non-finite float.
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(Self(value.unwrap_or(f64::NAN)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesQuotas {
    pub services: QuotaCount,
    pub pods: QuotaCount,
    pub requests_cpu: String,
    pub requests_memory: String,
    pub limits_memory: String,
    pub requests_ephemeral_storage: String,
    pub persistent_volume_claims: QuotaCount,
}

// ── Architecture reviews ───────────────────────────────────────────

/// Governance approval gate. A rejection must carry an explanation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArchitectureReview {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl ArchitectureReview {
    pub fn approved() -> Self {
        Self {
            approved: true,
            explanation: None,
        }
    }

    pub fn pending() -> Self {
        Self {
            approved: false,
            explanation: Some(String::new()),
        }
    }

    pub fn rejected(explanation: impl Into<String>) -> Self {
        Self {
            approved: false,
            explanation: Some(explanation.into()),
        }
    }
}

/// The four review slots on a namespace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewKind {
    Solution,
    Technical,
    Security,
    ServiceMesh,
}

impl ReviewKind {
    pub const ALL: [ReviewKind; 4] = [
        ReviewKind::Solution,
        ReviewKind::Technical,
        ReviewKind::Security,
        ReviewKind::ServiceMesh,
    ];

    /// JSON key of the review on [`NamespaceConfig`].
    pub fn key(self) -> &'static str {
        match self {
            ReviewKind::Solution => "solutionArchReview",
            ReviewKind::Technical => "techArchReview",
            ReviewKind::Security => "securityArchReview",
            ReviewKind::ServiceMesh => "isPartOfServiceMesh",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewKind::Solution => "Solution Architecture Review",
            ReviewKind::Technical => "Technical Architecture Review",
            ReviewKind::Security => "Security Architecture Review",
            ReviewKind::ServiceMesh => "Service Mesh",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

// ── Network policy ─────────────────────────────────────────────────

/// Permitted outbound destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EgressEndpoint {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl EgressEndpoint {
    pub fn new(domain: impl Into<String>, port: Option<&str>) -> Self {
        Self {
            domain: domain.into(),
            port: port.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TlsMode {
    #[default]
    Simple,
    Passthrough,
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsMode::Simple => f.write_str("SIMPLE"),
            TlsMode::Passthrough => f.write_str("PASSTHROUGH"),
        }
    }
}

impl FromStr for TlsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SIMPLE" => Ok(TlsMode::Simple),
            "PASSTHROUGH" => Ok(TlsMode::Passthrough),
            other => Err(format!("unknown TLS mode: {other}")),
        }
    }
}

/// Domain exposed by the namespace (ingress).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposedDomain {
    pub domain: String,
    pub port: String,
    pub tls_mode: TlsMode,
}

// ── Storage ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageType {
    #[default]
    Efs,
    Islon,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Efs => f.write_str("EFS"),
            StorageType::Islon => f.write_str("Islon"),
        }
    }
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "EFS" | "efs" => Ok(StorageType::Efs),
            "Islon" | "islon" => Ok(StorageType::Islon),
            other => Err(format!("unknown storage type: {other}")),
        }
    }
}

/// Type-specific storage location. The variant carries the only
/// conditional field that is meaningful for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "storageType")]
pub enum StorageBackend {
    #[serde(rename = "EFS")]
    Efs {
        #[serde(
            rename = "efsAccessPointId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        access_point_id: Option<String>,
    },
    #[serde(rename = "Islon")]
    Islon {
        #[serde(
            rename = "islonSharePath",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        share_path: Option<String>,
    },
}

impl StorageBackend {
    pub fn storage_type(&self) -> StorageType {
        match self {
            StorageBackend::Efs { .. } => StorageType::Efs,
            StorageBackend::Islon { .. } => StorageType::Islon,
        }
    }

    /// Empty location of the given type.
    pub fn blank(storage_type: StorageType) -> Self {
        match storage_type {
            StorageType::Efs => StorageBackend::Efs {
                access_point_id: Some(String::new()),
            },
            StorageType::Islon => StorageBackend::Islon {
                share_path: Some(String::new()),
            },
        }
    }

    /// The conditional field for this type, if set.
    pub fn location(&self) -> Option<&str> {
        match self {
            StorageBackend::Efs { access_point_id } => access_point_id.as_deref(),
            StorageBackend::Islon { share_path } => share_path.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRequirement {
    #[serde(flatten)]
    pub backend: StorageBackend,
    /// Size in GB.
    pub storage_size: f64,
}

impl Default for StorageRequirement {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Efs {
                access_point_id: None,
            },
            storage_size: 0.0,
        }
    }
}

impl StorageRequirement {
    pub fn efs(access_point_id: &str, storage_size: f64) -> Self {
        Self {
            backend: StorageBackend::Efs {
                access_point_id: Some(access_point_id.to_string()),
            },
            storage_size,
        }
    }

    pub fn islon(share_path: &str, storage_size: f64) -> Self {
        Self {
            backend: StorageBackend::Islon {
                share_path: Some(share_path.to_string()),
            },
            storage_size,
        }
    }

    pub fn storage_type(&self) -> StorageType {
        self.backend.storage_type()
    }

    /// Switch the storage type. The previous type's location is dropped and
    /// the new type starts with an empty location. Setting the current type
    /// again leaves the record untouched.
    pub fn set_storage_type(&mut self, storage_type: StorageType) {
        if self.storage_type() != storage_type {
            self.backend = StorageBackend::blank(storage_type);
        }
    }

    /// Set the location field of the current storage type.
    pub fn set_location(&mut self, value: impl Into<String>) {
        let value = Some(value.into());
        match &mut self.backend {
            StorageBackend::Efs { access_point_id } => *access_point_id = value,
            StorageBackend::Islon { share_path } => *share_path = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_count_serializes_whole_values_as_integers() {
        let json = serde_json::to_string(&QuotaCount::new(5)).unwrap();
        assert_eq!(json, "5");
        let json = serde_json::to_string(&QuotaCount(2.5)).unwrap();
        assert_eq!(json, "2.5");
    }

    #[test]
    fn quota_count_from_bad_input_is_nan() {
        assert!(QuotaCount::from_input("lots").value().is_nan());
        assert_eq!(QuotaCount::from_input(" 12 ").value(), 12.0);
    }

    #[test]
    fn review_without_explanation_parses() {
        let review: ArchitectureReview = serde_json::from_str(r#"{"approved":true}"#).unwrap();
        assert_eq!(review, ArchitectureReview::approved());
    }

    #[test]
    fn storage_requirement_json_shape() {
        let req = StorageRequirement::islon("/ifs/data/app", 100.0);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["storageType"], "Islon");
        assert_eq!(value["islonSharePath"], "/ifs/data/app");
        assert!(value.get("efsAccessPointId").is_none());

        let parsed: StorageRequirement = serde_json::from_str(
            r#"{"storageType":"EFS","storageSize":20,"efsAccessPointId":"fsap-1"}"#,
        )
        .unwrap();
        assert_eq!(parsed, StorageRequirement::efs("fsap-1", 20.0));
    }

    #[test]
    fn switching_storage_type_clears_other_location() {
        let mut req = StorageRequirement::efs("fsap-1", 10.0);
        req.set_storage_type(StorageType::Islon);
        assert_eq!(
            req.backend,
            StorageBackend::Islon {
                share_path: Some(String::new())
            }
        );
        assert_eq!(req.storage_size, 10.0);

        req.set_location("/ifs/x");
        req.set_storage_type(StorageType::Islon);
        assert_eq!(req.backend.location(), Some("/ifs/x"));
    }

    #[test]
    fn tls_mode_wire_names() {
        let domain = ExposedDomain {
            domain: "portal.example.com".into(),
            port: "443".into(),
            tls_mode: TlsMode::Passthrough,
        };
        let json = serde_json::to_string(&domain).unwrap();
        assert!(json.contains(r#""tlsMode":"PASSTHROUGH""#));
        assert_eq!("simple".parse::<TlsMode>(), Ok(TlsMode::Simple));
    }
}
