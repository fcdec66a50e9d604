use std::path::Path;

use anyhow::Context;
use tracing::info;

use nsconf_core::schema::parse_endpoint;
use nsconf_core::{AppConfig, EgressEndpoint, FieldPath, FieldValue};
use nsconf_form::{DraftList, EgressDraft, FormController, FormMode, LogSink, SubmitOutcome};

use super::auth::{authorize, load_provider};
use super::catalog::{fetch, open_catalog};
use super::record::print_errors;

pub enum Target {
    Existing(String),
    New,
}

/// Parse `path=value` into a typed edit.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(FieldPath, FieldValue)> {
    let (path, value) = raw
        .split_once('=')
        .with_context(|| format!("expected PATH=VALUE, got {raw:?}"))?;
    let path = FieldPath::parse(path.trim())?;
    let value = FieldValue::from_input(&path, value)?;
    Ok((path, value))
}

/// Fill an egress draft from `domain[:port]` arguments and return the
/// committed list. Arguments split the same way as legacy endpoint strings:
/// only a single colon separates domain and port.
pub fn egress_from_args(args: &[String]) -> anyhow::Result<Vec<EgressEndpoint>> {
    let mut draft = DraftList::<EgressDraft>::from_committed(&[]);
    let mut committed = Vec::new();
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            draft.add_row();
        }
        let endpoint = parse_endpoint(arg);
        committed = draft.update_row(index, |row| {
            row.domain = endpoint.domain;
            row.port = endpoint.port.unwrap_or_default();
        })?;
    }
    Ok(committed)
}

pub async fn edit(
    config: &AppConfig,
    target: Target,
    sets: &[String],
    egress: &[String],
    claims: Option<&Path>,
) -> anyhow::Result<()> {
    let provider = load_provider(config, claims)?;
    authorize(config, &provider).await?;

    let mut catalog = open_catalog(config)?;
    let (record, mode) = match target {
        Target::Existing(id) => (fetch(&mut catalog, &id).await?, FormMode::Edit),
        Target::New => (catalog.create_new().clone(), FormMode::Create),
    };
    let mut form = FormController::new(Some(record), mode);

    for raw in sets {
        let (path, value) = parse_assignment(raw)?;
        form.apply(&path, value)
            .with_context(|| format!("failed to apply {raw:?}"))?;
    }
    if !egress.is_empty() {
        form.commit_draft::<EgressDraft>(egress_from_args(egress)?)?;
    }

    match form.submit(&LogSink)? {
        SubmitOutcome::Submitted { json } => {
            if mode == FormMode::Create {
                catalog.finish_create();
            }
            println!("{json}");
            Ok(())
        }
        SubmitOutcome::Rejected { error_count } => {
            eprintln!("Please fix the following errors:");
            print_errors(form.errors());
            anyhow::bail!("{error_count} validation error(s), nothing submitted")
        }
        SubmitOutcome::NoRecord => {
            info!("no record loaded");
            Ok(())
        }
    }
}
