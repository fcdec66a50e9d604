//! Catalog session tests against the file-backed source.

use nsconf_core::config::{SourceConfig, SourceKind};
use nsconf_source::*;

const DOCUMENT: &str = r#"{"namespaces":[{
    "id": "ns-7",
    "applicationName": "Search",
    "namespaceName": "search-dev",
    "namespaceDescription": "Search indexers",
    "kubernetesQuotas": {"services": 1, "pods": 4, "requestsCpu": "1",
        "requestsMemory": "1Gi", "limitsMemory": "2Gi",
        "requestsEphemeralStorage": "1Gi", "persistentVolumeClaims": 1},
    "namespaceAccessAdGroup": "search",
    "solutionArchReview": {"approved": true},
    "techArchReview": {"approved": true},
    "securityArchReview": {"approved": true},
    "awsIamRole": "arn:aws:iam::1:role/search",
    "egressEndpointsList": ["opensearch.internal:9200"],
    "exposedDomainsList": []
}]}"#;

#[tokio::test]
async fn retry_recovers_after_file_appears() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("namespaces.json");
    let config = SourceConfig {
        kind: SourceKind::File,
        path: Some(path.clone()),
        ..SourceConfig::default()
    };
    let mut catalog = Catalog::new(open_source(&config).unwrap());

    assert!(catalog.load_names().await.is_err());
    assert!(catalog.error().is_some());
    assert!(!catalog.is_loading_list());

    std::fs::write(&path, DOCUMENT).unwrap();
    catalog.retry().await.unwrap();
    assert!(catalog.error().is_none());
    assert_eq!(catalog.names()[0].name, "search-dev");

    assert_eq!(catalog.select("ns-7").await, SelectOutcome::Committed);
    let record = catalog.form_record().unwrap();
    assert_eq!(record.egress_endpoints_list[0].domain, "opensearch.internal");
    assert_eq!(record.egress_endpoints_list[0].port.as_deref(), Some("9200"));
    assert_eq!(record.splunk_hec_token, "");
}

#[test]
fn file_source_without_path_is_rejected() {
    let config = SourceConfig {
        kind: SourceKind::File,
        path: None,
        ..SourceConfig::default()
    };
    assert!(matches!(open_source(&config), Err(SourceError::MissingPath)));
}

#[tokio::test]
async fn mock_source_from_config() {
    let config = SourceConfig {
        list_latency_ms: 0,
        fetch_latency_ms: 0,
        ..SourceConfig::default()
    };
    let source = open_source(&config).unwrap();
    assert_eq!(source.list_names().await.unwrap().len(), 3);
}
