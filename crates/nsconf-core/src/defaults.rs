//! Pre-filled record for the "create new namespace" flow.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::*;

/// Last timestamp handed out by [`generate_namespace_id`].
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a namespace id of the form `ns-<millis>`.
///
/// Ids are unique within the process: two calls landing in the same
/// millisecond get consecutive stamps.
pub fn generate_namespace_id() -> String {
    let now = epoch_millis();
    let mut prev = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_STAMP.compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return format!("ns-{next}"),
            Err(actual) => prev = actual,
        }
    }
}

impl Default for KubernetesQuotas {
    fn default() -> Self {
        Self {
            services: QuotaCount::new(5),
            pods: QuotaCount::new(20),
            requests_cpu: "2".to_string(),
            requests_memory: "4Gi".to_string(),
            limits_memory: "8Gi".to_string(),
            requests_ephemeral_storage: "5Gi".to_string(),
            persistent_volume_claims: QuotaCount::new(2),
        }
    }
}

/// Build a new record with a fresh id and documented quota defaults.
///
/// Every review starts unapproved with an empty explanation, so the record
/// fails validation until each review has been decided.
pub fn create_default() -> NamespaceConfig {
    NamespaceConfig {
        id: generate_namespace_id(),
        application_name: String::new(),
        namespace_name: String::new(),
        namespace_description: String::new(),
        kubernetes_quotas: KubernetesQuotas::default(),
        namespace_access_ad_group: String::new(),
        solution_arch_review: ArchitectureReview::pending(),
        tech_arch_review: ArchitectureReview::pending(),
        security_arch_review: ArchitectureReview::pending(),
        is_part_of_service_mesh: ArchitectureReview::pending(),
        aws_iam_role: String::new(),
        splunk_hec_token: String::new(),
        egress_endpoints_list: Vec::new(),
        exposed_domains_list: Vec::new(),
        storage_requirements: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_within_a_session() {
        let ids: HashSet<String> = (0..500).map(|_| generate_namespace_id()).collect();
        assert_eq!(ids.len(), 500);
        assert!(ids.iter().all(|id| id.starts_with("ns-")));
    }

    #[test]
    fn default_record_has_documented_quotas() {
        let record = create_default();
        let quotas = &record.kubernetes_quotas;
        assert_eq!(quotas.services, QuotaCount::new(5));
        assert_eq!(quotas.pods, QuotaCount::new(20));
        assert_eq!(quotas.persistent_volume_claims, QuotaCount::new(2));
        assert_eq!(quotas.requests_cpu, "2");
        assert_eq!(quotas.requests_memory, "4Gi");
        assert_eq!(quotas.limits_memory, "8Gi");
        assert_eq!(quotas.requests_ephemeral_storage, "5Gi");
    }

    #[test]
    fn default_reviews_are_undecided() {
        let record = create_default();
        for kind in ReviewKind::ALL {
            assert_eq!(record.review(kind), &ArchitectureReview::pending());
        }
        assert!(record.egress_endpoints_list.is_empty());
        assert!(record.exposed_domains_list.is_empty());
        assert!(record.storage_requirements.is_empty());
    }

    #[test]
    fn two_defaults_differ_only_by_id() {
        let a = create_default();
        let mut b = create_default();
        assert_ne!(a.id, b.id);
        b.id = a.id.clone();
        assert_eq!(a, b);
    }
}
