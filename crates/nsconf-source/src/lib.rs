//! nsconf-source: read-only namespace data sources.
//!
//! # Components
//!
//! - **`source`**: `NamespaceSource` trait and the on-disk document format
//! - **`mock`**: three built-in sample namespaces with simulated latency
//! - **`file`**: JSON file source
//! - **`catalog`**: list/select/create session with stale-response protection

pub mod catalog;
pub mod error;
pub mod file;
pub mod mock;
pub mod source;

pub use catalog::{Catalog, DetailRequest, SelectOutcome};
pub use error::{SourceError, SourceResult};
pub use file::JsonFileSource;
pub use mock::MockSource;
pub use source::{parse_document, BoxFuture, NamespaceSource};

use nsconf_core::config::{SourceConfig, SourceKind};
use tracing::info;

/// Build the source described by the `[source]` config section.
pub fn open_source(config: &SourceConfig) -> SourceResult<Box<dyn NamespaceSource>> {
    match config.kind {
        SourceKind::Mock => {
            info!("using built-in mock namespaces");
            Ok(Box::new(MockSource::from_config(config)?))
        }
        SourceKind::File => {
            let path = config.path.as_ref().ok_or(SourceError::MissingPath)?;
            info!(path = %path.display(), "using namespace data file");
            Ok(Box::new(JsonFileSource::new(path)))
        }
    }
}
