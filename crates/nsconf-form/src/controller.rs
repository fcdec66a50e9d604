//! Form controller: the editing session for one namespace record.
//!
//! Edits arrive as `(path, value)` pairs and replace exactly one leaf of the
//! record. Validation runs only on submit; editing a field drops the error
//! recorded for that exact path and leaves every other error in place.

use tracing::{debug, info};

use nsconf_core::validation::validate;
use nsconf_core::{FieldPath, FieldValue, NamespaceConfig, ValidationErrors};

use crate::draft::DraftRow;
use crate::error::FormResult;
use crate::sink::SubmissionSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Record came from the default factory.
    Create,
    /// Record was fetched from the data source.
    #[default]
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing loaded; submit was ignored.
    NoRecord,
    /// Validation failed; errors are now on the controller.
    Rejected { error_count: usize },
    /// The record was handed to the sink.
    Submitted { json: String },
}

#[derive(Debug, Default)]
pub struct FormController {
    record: Option<NamespaceConfig>,
    errors: ValidationErrors,
    mode: FormMode,
    submitting: bool,
    success: bool,
    generated_json: Option<String>,
}

impl FormController {
    pub fn new(record: Option<NamespaceConfig>, mode: FormMode) -> Self {
        let mut controller = Self::default();
        controller.reseed(record, mode);
        controller
    }

    /// Replace the record and reset all transient state.
    pub fn reseed(&mut self, record: Option<NamespaceConfig>, mode: FormMode) {
        if let Some(record) = &record {
            debug!(id = %record.id, ?mode, "form seeded");
        }
        self.record = record;
        self.mode = mode;
        self.errors = ValidationErrors::new();
        self.submitting = false;
        self.success = false;
        self.generated_json = None;
    }

    pub fn record(&self) -> Option<&NamespaceConfig> {
        self.record.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn field_error(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn show_success(&self) -> bool {
        self.success
    }

    /// JSON produced by the last successful submit.
    pub fn generated_json(&self) -> Option<&str> {
        self.generated_json.as_deref()
    }

    /// Hide the success indicator.
    pub fn dismiss_success(&mut self) {
        self.success = false;
    }

    /// Apply one field edit. A no-op when no record is loaded.
    pub fn set_field(&mut self, path: &str, value: FieldValue) -> FormResult<()> {
        let field = FieldPath::parse(path)?;
        self.apply(&field, value)
    }

    /// [`Self::set_field`] with an already-parsed path.
    pub fn apply(&mut self, path: &FieldPath, value: FieldValue) -> FormResult<()> {
        let Some(record) = &self.record else {
            debug!(%path, "edit ignored, no record loaded");
            return Ok(());
        };
        let next = record.with_field(path, value)?;
        self.record = Some(next);
        if self.errors.clear(&path.to_string()) {
            debug!(%path, "cleared field error");
        }
        Ok(())
    }

    /// Push a draft list's committed rows into the record.
    pub fn commit_draft<R: DraftRow>(&mut self, committed: Vec<R::Committed>) -> FormResult<()> {
        self.apply(&FieldPath::Top(R::FIELD), R::field_value(committed))
    }

    pub fn get_field(&self, path: &str) -> FormResult<Option<FieldValue>> {
        let field = FieldPath::parse(path)?;
        Ok(self.record.as_ref().map(|r| r.get_field(&field)))
    }

    /// Validate and, if clean, serialize and hand the record to `sink`.
    pub fn submit<S: SubmissionSink + ?Sized>(&mut self, sink: &S) -> FormResult<SubmitOutcome> {
        let Some(record) = &self.record else {
            return Ok(SubmitOutcome::NoRecord);
        };

        self.submitting = true;
        self.success = false;

        let errors = validate(record);
        if errors.has_errors() {
            let error_count = errors.len();
            info!(id = %record.id, error_count, "submission blocked by validation errors");
            self.errors = errors;
            self.submitting = false;
            return Ok(SubmitOutcome::Rejected { error_count });
        }

        self.errors = ValidationErrors::new();
        let json = match record.to_json_pretty() {
            Ok(json) => json,
            Err(e) => {
                self.submitting = false;
                return Err(e.into());
            }
        };
        sink.submit(self.mode, record, &json);

        self.generated_json = Some(json.clone());
        self.success = true;
        self.submitting = false;
        Ok(SubmitOutcome::Submitted { json })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use nsconf_core::{create_default, QuotaCount};

    use crate::error::FormError;

    fn controller() -> FormController {
        FormController::new(Some(create_default()), FormMode::Create)
    }

    #[test]
    fn set_field_replaces_only_the_leaf() {
        let mut form = controller();
        form.set_field("kubernetesQuotas.pods", QuotaCount::new(40).into())
            .unwrap();
        assert_eq!(
            form.get_field("kubernetesQuotas.pods").unwrap(),
            Some(FieldValue::Count(QuotaCount::new(40)))
        );
        assert_eq!(
            form.get_field("kubernetesQuotas.services").unwrap(),
            Some(FieldValue::Count(QuotaCount::new(5)))
        );
    }

    #[test]
    fn edit_clears_only_matching_error() {
        let mut form = controller();
        let sink = |_: FormMode, _: &NamespaceConfig, _: &str| {};
        form.submit(&sink).unwrap();
        assert!(form.field_error("applicationName").is_some());
        assert!(form.field_error("namespaceName").is_some());

        form.set_field("applicationName", "Portal".into()).unwrap();
        assert!(form.field_error("applicationName").is_none());
        assert!(form.field_error("namespaceName").is_some());

        // Editing `approved` does not clear the explanation error.
        form.set_field("techArchReview.approved", true.into()).unwrap();
        assert!(form.field_error("techArchReview.explanation").is_some());
    }

    #[test]
    fn edits_without_record_are_ignored() {
        let mut form = FormController::new(None, FormMode::Edit);
        form.set_field("applicationName", "x".into()).unwrap();
        assert!(form.record().is_none());
        assert_eq!(form.submit(&LogSinkProbe::default()).unwrap(), SubmitOutcome::NoRecord);
    }

    #[test]
    fn bad_path_is_an_error() {
        let mut form = controller();
        let err = form.set_field("kubernetesQuotas.gpus", QuotaCount::new(1).into());
        assert!(matches!(err, Err(FormError::Field(_))));
    }

    #[test]
    fn rejected_submit_does_not_reach_sink() {
        let mut form = controller();
        let probe = LogSinkProbe::default();
        let outcome = form.submit(&probe).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected { error_count: 10 }));
        assert!(probe.calls.borrow().is_empty());
        assert!(!form.show_success());
        assert!(!form.is_submitting());
    }

    #[test]
    fn reseed_clears_errors_and_success() {
        let mut form = controller();
        form.submit(&LogSinkProbe::default()).unwrap();
        assert!(form.errors().has_errors());

        form.reseed(Some(create_default()), FormMode::Create);
        assert!(form.errors().is_empty());
        assert!(form.generated_json().is_none());
        assert!(!form.show_success());
    }

    #[derive(Default)]
    struct LogSinkProbe {
        calls: RefCell<Vec<(FormMode, String)>>,
    }

    impl SubmissionSink for LogSinkProbe {
        fn submit(&self, mode: FormMode, _record: &NamespaceConfig, json: &str) {
            self.calls.borrow_mut().push((mode, json.to_string()));
        }
    }
}
