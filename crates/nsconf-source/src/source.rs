//! The read-only namespace data source seam.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use serde_json::Value;

use nsconf_core::schema::migrate_record;
use nsconf_core::{NamespaceConfig, NamespaceSummary};

use crate::error::{SourceError, SourceResult};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where namespace records come from. There are no write operations.
pub trait NamespaceSource: Send + Sync {
    /// `(id, namespaceName)` pairs, in source order.
    fn list_names(&self) -> BoxFuture<'_, SourceResult<Vec<NamespaceSummary>>>;

    /// One full record, upgraded to the current schema.
    fn fetch_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, SourceResult<NamespaceConfig>>;
}

impl<T: NamespaceSource + ?Sized> NamespaceSource for Box<T> {
    fn list_names(&self) -> BoxFuture<'_, SourceResult<Vec<NamespaceSummary>>> {
        (**self).list_names()
    }

    fn fetch_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, SourceResult<NamespaceConfig>> {
        (**self).fetch_by_id(id)
    }
}

/// On-disk document shape: `{ "namespaces": [ ... ] }`.
#[derive(Debug, Deserialize)]
struct NamespaceDocument {
    #[serde(default)]
    namespaces: Vec<Value>,
}

/// Parse a namespace document, upgrading every record to the current schema.
pub fn parse_document(json: &str) -> SourceResult<Vec<NamespaceConfig>> {
    let document: NamespaceDocument = serde_json::from_str(json)?;
    document
        .namespaces
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            migrate_record(raw).map_err(|source| SourceError::Migration { index, source })
        })
        .collect()
}

pub(crate) fn find_record(records: &[NamespaceConfig], id: &str) -> SourceResult<NamespaceConfig> {
    records
        .iter()
        .find(|record| record.id == id)
        .cloned()
        .ok_or_else(|| SourceError::NotFound(id.to_string()))
}
