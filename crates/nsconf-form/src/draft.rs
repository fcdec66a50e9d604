//! Draft lists for the repeatable sections (egress, ingress, storage).
//!
//! The editable buffer may hold blank or half-filled rows; the committed
//! list is recomputed from the buffer on every edit and is what gets
//! pushed into the record. The buffer never becomes empty: removing the
//! last row leaves one blank row behind.

use nsconf_core::field::TopField;
use nsconf_core::{
    EgressEndpoint, ExposedDomain, FieldValue, StorageBackend, StorageRequirement, StorageType,
    TlsMode,
};

use crate::error::{FormError, FormResult};

/// One editable row of a repeatable section.
pub trait DraftRow: Clone + Default {
    type Committed: Clone;

    /// Record field the committed list is written to.
    const FIELD: TopField;

    /// Whether adding a blank row commits the list right away.
    const COMMIT_ON_ADD: bool = false;

    /// Normalized committed entry, or `None` if the row is dropped.
    fn commit(&self) -> Option<Self::Committed>;

    fn from_committed(entry: &Self::Committed) -> Self;

    fn field_value(list: Vec<Self::Committed>) -> FieldValue;
}

#[derive(Debug, Clone)]
pub struct DraftList<R: DraftRow> {
    rows: Vec<R>,
    committed: Vec<R::Committed>,
}

impl<R: DraftRow> DraftList<R> {
    /// Buffer seeded from a committed list; an empty list shows one blank row.
    pub fn from_committed(entries: &[R::Committed]) -> Self {
        let mut rows: Vec<R> = entries.iter().map(R::from_committed).collect();
        if rows.is_empty() {
            rows.push(R::default());
        }
        Self {
            rows,
            committed: entries.to_vec(),
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Last committed list.
    pub fn committed(&self) -> &[R::Committed] {
        &self.committed
    }

    /// Append a blank row. Returns the new committed list for row kinds
    /// that commit on add, `None` otherwise.
    pub fn add_row(&mut self) -> Option<Vec<R::Committed>> {
        self.rows.push(R::default());
        R::COMMIT_ON_ADD.then(|| self.recommit())
    }

    /// Edit one row and recompute the committed list.
    pub fn update_row(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut R),
    ) -> FormResult<Vec<R::Committed>> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(FormError::RowOutOfRange { index, len })?;
        edit(row);
        Ok(self.recommit())
    }

    /// Remove one row and recompute the committed list.
    pub fn remove_row(&mut self, index: usize) -> FormResult<Vec<R::Committed>> {
        if index >= self.rows.len() {
            return Err(FormError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        self.rows.remove(index);
        let committed = self.recommit();
        if self.rows.is_empty() {
            self.rows.push(R::default());
        }
        Ok(committed)
    }

    fn recommit(&mut self) -> Vec<R::Committed> {
        self.committed = self.rows.iter().filter_map(R::commit).collect();
        self.committed.clone()
    }
}

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ── Egress ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EgressDraft {
    pub domain: String,
    pub port: String,
}

impl DraftRow for EgressDraft {
    type Committed = EgressEndpoint;
    const FIELD: TopField = TopField::EgressEndpointsList;

    fn commit(&self) -> Option<EgressEndpoint> {
        Some(EgressEndpoint {
            domain: trimmed(&self.domain)?,
            port: trimmed(&self.port),
        })
    }

    fn from_committed(entry: &EgressEndpoint) -> Self {
        Self {
            domain: entry.domain.clone(),
            port: entry.port.clone().unwrap_or_default(),
        }
    }

    fn field_value(list: Vec<EgressEndpoint>) -> FieldValue {
        FieldValue::EgressEndpoints(list)
    }
}

// ── Ingress ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngressDraft {
    pub domain: String,
    pub port: String,
    pub tls_mode: TlsMode,
}

impl DraftRow for IngressDraft {
    type Committed = ExposedDomain;
    const FIELD: TopField = TopField::ExposedDomainsList;

    fn commit(&self) -> Option<ExposedDomain> {
        Some(ExposedDomain {
            domain: trimmed(&self.domain)?,
            port: self.port.trim().to_string(),
            tls_mode: self.tls_mode,
        })
    }

    fn from_committed(entry: &ExposedDomain) -> Self {
        Self {
            domain: entry.domain.clone(),
            port: entry.port.clone(),
            tls_mode: entry.tls_mode,
        }
    }

    fn field_value(list: Vec<ExposedDomain>) -> FieldValue {
        FieldValue::ExposedDomains(list)
    }
}

// ── Storage ────────────────────────────────────────────────────────

/// Storage row. `location` is the EFS access point id or the Islon share
/// path, depending on `storage_type`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageDraft {
    pub storage_type: StorageType,
    pub storage_size: f64,
    pub location: String,
}

impl StorageDraft {
    /// Change the type; the old type's location does not carry over.
    pub fn set_storage_type(&mut self, storage_type: StorageType) {
        if self.storage_type != storage_type {
            self.storage_type = storage_type;
            self.location.clear();
        }
    }
}

impl DraftRow for StorageDraft {
    type Committed = StorageRequirement;
    const FIELD: TopField = TopField::StorageRequirements;
    const COMMIT_ON_ADD: bool = true;

    /// Storage rows are never dropped; validation reports incomplete ones.
    fn commit(&self) -> Option<StorageRequirement> {
        let location = trimmed(&self.location);
        let backend = match self.storage_type {
            StorageType::Efs => StorageBackend::Efs {
                access_point_id: location,
            },
            StorageType::Islon => StorageBackend::Islon {
                share_path: location,
            },
        };
        let storage_size = if self.storage_size.is_nan() {
            0.0
        } else {
            self.storage_size
        };
        Some(StorageRequirement {
            backend,
            storage_size,
        })
    }

    fn from_committed(entry: &StorageRequirement) -> Self {
        Self {
            storage_type: entry.storage_type(),
            storage_size: entry.storage_size,
            location: entry.backend.location().unwrap_or_default().to_string(),
        }
    }

    fn field_value(list: Vec<StorageRequirement>) -> FieldValue {
        FieldValue::StorageRequirements(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_shows_one_blank_row() {
        let draft = DraftList::<EgressDraft>::from_committed(&[]);
        assert_eq!(draft.rows(), &[EgressDraft::default()]);
        assert!(draft.committed().is_empty());
    }

    #[test]
    fn blank_rows_are_filtered_from_commit() {
        let mut draft = DraftList::<EgressDraft>::from_committed(&[]);
        draft.add_row();
        let committed = draft
            .update_row(1, |row| {
                row.domain = "  api.slack.com ".into();
                row.port = " 443".into();
            })
            .unwrap();
        assert_eq!(draft.rows().len(), 2);
        assert_eq!(committed, vec![EgressEndpoint::new("api.slack.com", Some("443"))]);
    }

    #[test]
    fn removing_last_row_leaves_placeholder() {
        let mut draft = DraftList::<IngressDraft>::from_committed(&[ExposedDomain {
            domain: "portal.example.com".into(),
            port: "443".into(),
            tls_mode: TlsMode::Simple,
        }]);
        let committed = draft.remove_row(0).unwrap();
        assert!(committed.is_empty());
        assert!(draft.committed().is_empty());
        assert_eq!(draft.rows(), &[IngressDraft::default()]);
    }

    #[test]
    fn out_of_range_row_is_an_error() {
        let mut draft = DraftList::<EgressDraft>::from_committed(&[]);
        assert!(matches!(
            draft.remove_row(3),
            Err(FormError::RowOutOfRange { index: 3, len: 1 })
        ));
        assert!(draft.update_row(1, |_| {}).is_err());
    }

    #[test]
    fn storage_type_switch_clears_location() {
        let mut draft =
            DraftList::<StorageDraft>::from_committed(&[StorageRequirement::efs("fsap-1", 10.0)]);
        let committed = draft
            .update_row(0, |row| row.set_storage_type(StorageType::Islon))
            .unwrap();
        assert_eq!(
            committed,
            vec![StorageRequirement {
                backend: StorageBackend::Islon { share_path: None },
                storage_size: 10.0,
            }]
        );
        assert!(draft.rows()[0].location.is_empty());
    }

    #[test]
    fn adding_a_storage_row_commits_it() {
        let mut draft =
            DraftList::<StorageDraft>::from_committed(&[StorageRequirement::efs("fsap-1", 10.0)]);
        let committed = draft.add_row().unwrap();
        assert_eq!(draft.rows().len(), 2);
        assert_eq!(
            committed,
            vec![StorageRequirement::efs("fsap-1", 10.0), StorageRequirement::default()]
        );
        assert_eq!(draft.committed().len(), 2);
    }

    #[test]
    fn adding_an_egress_row_does_not_commit() {
        let mut draft =
            DraftList::<EgressDraft>::from_committed(&[EgressEndpoint::new("github.com", None)]);
        assert!(draft.add_row().is_none());
        assert_eq!(draft.rows().len(), 2);
        assert_eq!(draft.committed().len(), 1);
    }

    #[test]
    fn storage_rows_commit_even_when_incomplete() {
        let mut draft = DraftList::<StorageDraft>::from_committed(&[]);
        let committed = draft.update_row(0, |row| row.storage_size = f64::NAN).unwrap();
        assert_eq!(committed, vec![StorageRequirement::default()]);
    }
}
