//! Catalog session: the namespace picker plus the record under edit.
//!
//! Every detail request carries a generation number. Selecting another
//! namespace or switching to create mode bumps the generation, so a late
//! response for an earlier selection is dropped instead of overwriting the
//! current one.

use tracing::{debug, info, warn};

use nsconf_core::{create_default, NamespaceConfig, NamespaceSummary};

use crate::error::SourceResult;
use crate::source::NamespaceSource;

/// Handle for one in-flight detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub id: String,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The response was current and is now the selected record.
    Committed,
    /// The fetch failed; the message is on the catalog.
    Failed,
    /// A newer selection was made while this request was in flight.
    Superseded,
}

pub struct Catalog {
    source: Box<dyn NamespaceSource>,
    names: Vec<NamespaceSummary>,
    selected_id: Option<String>,
    selected: Option<NamespaceConfig>,
    new_record: Option<NamespaceConfig>,
    loading_list: bool,
    loading_details: bool,
    error: Option<String>,
    generation: u64,
}

impl Catalog {
    pub fn new(source: Box<dyn NamespaceSource>) -> Self {
        Self {
            source,
            names: Vec::new(),
            selected_id: None,
            selected: None,
            new_record: None,
            loading_list: false,
            loading_details: false,
            error: None,
            generation: 0,
        }
    }

    pub fn names(&self) -> &[NamespaceSummary] {
        &self.names
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn is_creating_new(&self) -> bool {
        self.new_record.is_some()
    }

    pub fn is_loading_list(&self) -> bool {
        self.loading_list
    }

    pub fn is_loading_details(&self) -> bool {
        self.loading_details
    }

    /// Page-level error from the last failed load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The record the form should edit: the fresh default in create mode,
    /// otherwise the fetched selection.
    pub fn form_record(&self) -> Option<&NamespaceConfig> {
        self.new_record.as_ref().or(self.selected.as_ref())
    }

    // ── List ───────────────────────────────────────────────────────

    pub async fn load_names(&mut self) -> SourceResult<()> {
        self.loading_list = true;
        self.error = None;
        let result = self.source.list_names().await;
        self.loading_list = false;
        match result {
            Ok(names) => {
                info!(count = names.len(), "namespace list loaded");
                self.names = names;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "error loading namespace names");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-run the list load after an error.
    pub async fn retry(&mut self) -> SourceResult<()> {
        self.load_names().await
    }

    // ── Selection ──────────────────────────────────────────────────

    /// Select a namespace and start loading it. Leaves create mode.
    pub fn begin_select(&mut self, id: &str) -> DetailRequest {
        self.generation += 1;
        self.selected_id = Some(id.to_string());
        self.new_record = None;
        self.loading_details = true;
        self.error = None;
        debug!(id, generation = self.generation, "namespace selected");
        DetailRequest {
            id: id.to_string(),
            generation: self.generation,
        }
    }

    /// Apply the response for `request` if it is still the current one.
    pub fn complete_select(
        &mut self,
        request: DetailRequest,
        result: SourceResult<NamespaceConfig>,
    ) -> SelectOutcome {
        if request.generation != self.generation {
            debug!(
                id = %request.id,
                generation = request.generation,
                current = self.generation,
                "stale namespace response dropped"
            );
            return SelectOutcome::Superseded;
        }
        self.loading_details = false;
        match result {
            Ok(record) => {
                info!(id = %record.id, namespace = %record.namespace_name, "namespace loaded");
                self.selected = Some(record);
                SelectOutcome::Committed
            }
            Err(e) => {
                warn!(id = %request.id, error = %e, "error loading namespace details");
                self.error = Some(e.to_string());
                self.selected = None;
                SelectOutcome::Failed
            }
        }
    }

    /// Select and fetch in one step.
    pub async fn select(&mut self, id: &str) -> SelectOutcome {
        let request = self.begin_select(id);
        let result = self.source.fetch_by_id(&request.id).await;
        self.complete_select(request, result)
    }

    // ── Create mode ────────────────────────────────────────────────

    /// Enter create mode with a fresh default record. The record stays the
    /// same for as long as create mode lasts.
    pub fn create_new(&mut self) -> &NamespaceConfig {
        self.generation += 1;
        self.selected_id = None;
        self.selected = None;
        self.loading_details = false;
        let record = self.new_record.get_or_insert_with(create_default);
        info!(id = %record.id, "creating new namespace");
        record
    }

    /// Leave create mode after the new record was submitted.
    pub fn finish_create(&mut self) {
        if self.new_record.take().is_some() {
            debug!("left create mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::mock::MockSource;

    fn catalog() -> Catalog {
        Catalog::new(Box::new(MockSource::instant().unwrap()))
    }

    #[tokio::test]
    async fn test_load_then_select() {
        let mut catalog = catalog();
        catalog.load_names().await.unwrap();
        assert_eq!(catalog.names().len(), 3);
        assert!(!catalog.is_loading_list());

        assert_eq!(catalog.select("ns-002").await, SelectOutcome::Committed);
        assert_eq!(catalog.selected_id(), Some("ns-002"));
        assert_eq!(catalog.form_record().unwrap().namespace_name, "analytics-service-staging");
        assert!(!catalog.is_loading_details());
    }

    #[tokio::test]
    async fn test_late_response_is_superseded() {
        let mut catalog = catalog();
        let source = MockSource::instant().unwrap();

        let first = catalog.begin_select("ns-001");
        let second = catalog.begin_select("ns-003");
        let second_result = source.fetch_by_id(&second.id).await;
        let first_result = source.fetch_by_id(&first.id).await;

        assert_eq!(catalog.complete_select(second, second_result), SelectOutcome::Committed);
        assert_eq!(catalog.complete_select(first, first_result), SelectOutcome::Superseded);
        assert_eq!(catalog.form_record().unwrap().id, "ns-003");
    }

    #[tokio::test]
    async fn test_failed_fetch_sets_page_error() {
        let mut catalog = catalog();
        assert_eq!(catalog.select("ns-404").await, SelectOutcome::Failed);
        assert_eq!(catalog.error(), Some(r#"Namespace with id "ns-404" not found"#));
        assert!(catalog.form_record().is_none());
    }

    #[tokio::test]
    async fn test_create_mode_supersedes_pending_fetch() {
        let mut catalog = catalog();
        let request = catalog.begin_select("ns-001");
        let id = catalog.create_new().id.clone();

        let outcome = catalog.complete_select(request, Err(SourceError::NotFound("ns-001".into())));
        assert_eq!(outcome, SelectOutcome::Superseded);
        assert!(catalog.is_creating_new());
        assert_eq!(catalog.create_new().id, id);
        assert_eq!(catalog.form_record().unwrap().id, id);

        catalog.finish_create();
        assert!(!catalog.is_creating_new());
        assert!(catalog.form_record().is_none());
    }
}
