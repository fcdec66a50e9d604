//! Submission sinks.

use tracing::info;

use nsconf_core::NamespaceConfig;

use crate::controller::FormMode;

/// Receives validated records. Fire-and-forget: no acknowledgement.
pub trait SubmissionSink {
    fn submit(&self, mode: FormMode, record: &NamespaceConfig, json: &str);
}

impl<F> SubmissionSink for F
where
    F: Fn(FormMode, &NamespaceConfig, &str),
{
    fn submit(&self, mode: FormMode, record: &NamespaceConfig, json: &str) {
        self(mode, record, json)
    }
}

/// Logs the submitted JSON. There is no write backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn submit(&self, mode: FormMode, record: &NamespaceConfig, json: &str) {
        match mode {
            FormMode::Create => {
                info!(id = %record.id, namespace = %record.namespace_name, "New Namespace Created:\n{json}")
            }
            FormMode::Edit => {
                info!(id = %record.id, namespace = %record.namespace_name, "Namespace Configuration Updated:\n{json}")
            }
        }
    }
}
