use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tracing::info;

use nsconf_core::schema::{detect_version, migrate_record, SchemaVersion};
use nsconf_core::{create_default, NamespaceConfig, ReviewKind, ValidationErrors};

pub fn new(format: &str) -> anyhow::Result<()> {
    let record = create_default();
    match format {
        "summary" => print_summary(&record),
        _ => println!("{}", record.to_json_pretty()?),
    }
    Ok(())
}

pub fn validate(file: &Path) -> anyhow::Result<()> {
    let record = read_record(file)?;
    let errors = nsconf_core::validate(&record);
    if errors.has_errors() {
        print_errors(&errors);
        anyhow::bail!("{}: {} validation error(s)", file.display(), errors.len());
    }
    println!("✓ {} is valid", file.display());
    Ok(())
}

pub fn migrate(file: &Path) -> anyhow::Result<()> {
    let raw = read_json(file)?;
    let version = detect_version(&raw);
    if version < SchemaVersion::CURRENT {
        info!(file = %file.display(), ?version, "upgrading legacy record");
    }
    let record = migrate_record(raw)
        .with_context(|| format!("failed to upgrade {}", file.display()))?;
    println!("{}", record.to_json_pretty()?);
    Ok(())
}

fn read_json(file: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", file.display()))
}

pub fn read_record(file: &Path) -> anyhow::Result<NamespaceConfig> {
    let raw = read_json(file)?;
    migrate_record(raw).with_context(|| format!("failed to read record {}", file.display()))
}

pub fn print_errors(errors: &ValidationErrors) {
    for (path, message) in errors.iter() {
        eprintln!("  ✗ {path}: {message}");
    }
}

pub fn print_summary(record: &NamespaceConfig) {
    println!("{} ({})", record.namespace_name, record.id);
    println!("  application:  {}", record.application_name);
    println!("  description:  {}", record.namespace_description);
    println!("  access group: {}", record.namespace_access_ad_group);
    let quotas = &record.kubernetes_quotas;
    println!(
        "  quotas:       services={} pods={} pvcs={} cpu={} mem={}/{} ephemeral={}",
        quotas.services,
        quotas.pods,
        quotas.persistent_volume_claims,
        quotas.requests_cpu,
        quotas.requests_memory,
        quotas.limits_memory,
        quotas.requests_ephemeral_storage,
    );
    for kind in ReviewKind::ALL {
        let review = record.review(kind);
        let status = if review.approved { "approved" } else { "not approved" };
        match review.explanation.as_deref().filter(|e| !e.is_empty()) {
            Some(explanation) => println!("  {:<31} {status} ({explanation})", format!("{}:", kind.label())),
            None => println!("  {:<31} {status}", format!("{}:", kind.label())),
        }
    }
    for endpoint in &record.egress_endpoints_list {
        match &endpoint.port {
            Some(port) => println!("  egress:       {}:{port}", endpoint.domain),
            None => println!("  egress:       {}", endpoint.domain),
        }
    }
    for domain in &record.exposed_domains_list {
        println!("  ingress:      {}:{} {}", domain.domain, domain.port, domain.tls_mode);
    }
    for storage in &record.storage_requirements {
        println!(
            "  storage:      {} {}GB {}",
            storage.storage_type(),
            storage.storage_size,
            storage.backend.location().unwrap_or("-"),
        );
    }
}
