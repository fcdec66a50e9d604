//! In-memory source with the three built-in sample namespaces.
//!
//! The sample document is stored in its legacy shape (plain-string egress
//! endpoints, no service-mesh review) and upgraded on construction, so the
//! mock exercises the same migration path as a real data file.

use std::time::Duration;

use tracing::debug;

use nsconf_core::config::SourceConfig;
use nsconf_core::{NamespaceConfig, NamespaceSummary};

use crate::error::SourceResult;
use crate::source::{find_record, parse_document, BoxFuture, NamespaceSource};

const MOCK_DOCUMENT: &str = include_str!("../data/mock_namespaces.json");

pub const DEFAULT_LIST_LATENCY: Duration = Duration::from_millis(300);
pub const DEFAULT_FETCH_LATENCY: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub struct MockSource {
    records: Vec<NamespaceConfig>,
    list_latency: Duration,
    fetch_latency: Duration,
}

impl MockSource {
    /// Mock source with the default simulated latency.
    pub fn new() -> SourceResult<Self> {
        Ok(Self {
            records: parse_document(MOCK_DOCUMENT)?,
            list_latency: DEFAULT_LIST_LATENCY,
            fetch_latency: DEFAULT_FETCH_LATENCY,
        })
    }

    pub fn from_config(config: &SourceConfig) -> SourceResult<Self> {
        Ok(Self::new()?.with_latency(
            Duration::from_millis(config.list_latency_ms),
            Duration::from_millis(config.fetch_latency_ms),
        ))
    }

    pub fn with_latency(mut self, list: Duration, fetch: Duration) -> Self {
        self.list_latency = list;
        self.fetch_latency = fetch;
        self
    }

    /// No simulated latency.
    pub fn instant() -> SourceResult<Self> {
        Ok(Self::new()?.with_latency(Duration::ZERO, Duration::ZERO))
    }

    pub fn records(&self) -> &[NamespaceConfig] {
        &self.records
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

impl NamespaceSource for MockSource {
    fn list_names(&self) -> BoxFuture<'_, SourceResult<Vec<NamespaceSummary>>> {
        Box::pin(async move {
            simulate_latency(self.list_latency).await;
            debug!(count = self.records.len(), "listed mock namespaces");
            Ok(self.records.iter().map(NamespaceConfig::summary).collect())
        })
    }

    fn fetch_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, SourceResult<NamespaceConfig>> {
        Box::pin(async move {
            simulate_latency(self.fetch_latency).await;
            find_record(&self.records, id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use nsconf_core::{EgressEndpoint, ReviewKind, TlsMode};

    #[tokio::test]
    async fn test_list_names_in_source_order() {
        let source = MockSource::instant().unwrap();
        let names = source.list_names().await.unwrap();
        let ids: Vec<&str> = names.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["ns-001", "ns-002", "ns-003"]);
        assert_eq!(names[0].name, "customer-portal-prod");
    }

    #[tokio::test]
    async fn test_fetch_upgrades_legacy_egress() {
        let source = MockSource::instant().unwrap();
        let record = source.fetch_by_id("ns-003").await.unwrap();
        assert_eq!(
            record.egress_endpoints_list,
            vec![
                EgressEndpoint::new("github.com", None),
                EgressEndpoint::new("api.slack.com", None),
                EgressEndpoint::new("api.jira.internal", None),
            ]
        );
        assert!(record.exposed_domains_list.is_empty());
        assert!(!record.review(ReviewKind::ServiceMesh).approved);
    }

    #[tokio::test]
    async fn test_fetch_keeps_typed_ingress() {
        let source = MockSource::instant().unwrap();
        let record = source.fetch_by_id("ns-001").await.unwrap();
        assert_eq!(record.exposed_domains_list[1].tls_mode, TlsMode::Passthrough);
        assert_eq!(record.kubernetes_quotas.pods.value(), 50.0);
    }

    #[tokio::test]
    async fn test_fetch_unknown_id() {
        let source = MockSource::instant().unwrap();
        let err = source.fetch_by_id("ns-404").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
        assert_eq!(err.to_string(), r#"Namespace with id "ns-404" not found"#);
    }
}
