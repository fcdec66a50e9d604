//! nsconf-form: editing state for one namespace record.
//!
//! # Components
//!
//! - **`controller`**: record + error map, field-path edits, submit
//! - **`draft`**: editable row buffers for the repeatable list sections
//! - **`sink`**: where successfully validated records go

pub mod controller;
pub mod draft;
pub mod error;
pub mod sink;

pub use controller::{FormController, FormMode, SubmitOutcome};
pub use draft::{DraftList, DraftRow, EgressDraft, IngressDraft, StorageDraft};
pub use error::{FormError, FormResult};
pub use sink::{LogSink, SubmissionSink};
