//! JSON file source.
//!
//! Reads `{ "namespaces": [...] }` from disk on every call, so edits to the
//! file are picked up without restarting. Legacy records are upgraded as
//! they are read.

use std::path::{Path, PathBuf};

use tracing::debug;

use nsconf_core::{NamespaceConfig, NamespaceSummary};

use crate::error::{SourceError, SourceResult};
use crate::source::{find_record, parse_document, BoxFuture, NamespaceSource};

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> SourceResult<Vec<NamespaceConfig>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let records = parse_document(&json)?;
        debug!(path = %self.path.display(), count = records.len(), "loaded namespace file");
        Ok(records)
    }
}

impl NamespaceSource for JsonFileSource {
    fn list_names(&self) -> BoxFuture<'_, SourceResult<Vec<NamespaceSummary>>> {
        Box::pin(async move {
            let records = self.load().await?;
            Ok(records.iter().map(NamespaceConfig::summary).collect())
        })
    }

    fn fetch_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, SourceResult<NamespaceConfig>> {
        Box::pin(async move {
            let records = self.load().await?;
            find_record(&records, id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"{"namespaces":[{
        "id": "ns-100",
        "applicationName": "Billing",
        "namespaceName": "billing-prod",
        "namespaceDescription": "Billing service",
        "kubernetesQuotas": {"services": 2, "pods": 8, "requestsCpu": "1",
            "requestsMemory": "2Gi", "limitsMemory": "4Gi",
            "requestsEphemeralStorage": "1Gi", "persistentVolumeClaims": 1},
        "namespaceAccessAdGroup": "billing",
        "solutionArchReview": {"approved": true},
        "techArchReview": {"approved": true},
        "securityArchReview": {"approved": true},
        "isPartOfServiceMesh": {"approved": true},
        "awsIamRole": "arn:aws:iam::1:role/billing",
        "splunkHecToken": "t",
        "egressEndpointsList": [{"domain": "stripe.com", "port": "443"}],
        "exposedDomainsList": [],
        "storageRequirements": [
            {"storageType": "Islon", "islonSharePath": "/ifs/billing", "storageSize": 20}
        ]
    }]}"#;

    fn write_document(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_list_and_fetch_from_file() {
        let file = write_document(DOCUMENT);
        let source = JsonFileSource::new(file.path());

        let names = source.list_names().await.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, "billing-prod");

        let record = source.fetch_by_id("ns-100").await.unwrap();
        assert_eq!(record.storage_requirements[0].backend.location(), Some("/ifs/billing"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.list_names().await, Err(SourceError::Io { .. })));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let file = write_document("{ not json");
        let source = JsonFileSource::new(file.path());
        assert!(matches!(source.fetch_by_id("x").await, Err(SourceError::Parse(_))));
    }
}
