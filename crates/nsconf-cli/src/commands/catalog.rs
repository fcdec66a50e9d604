use nsconf_core::{AppConfig, NamespaceConfig};
use nsconf_source::{open_source, Catalog, SelectOutcome};

use super::record::print_summary;

pub fn open_catalog(config: &AppConfig) -> anyhow::Result<Catalog> {
    Ok(Catalog::new(open_source(&config.source)?))
}

pub async fn list(config: &AppConfig) -> anyhow::Result<()> {
    let mut catalog = open_catalog(config)?;
    catalog.load_names().await?;
    if catalog.names().is_empty() {
        println!("No namespaces found.");
    }
    for summary in catalog.names() {
        println!("{:<12} {}", summary.id, summary.name);
    }
    Ok(())
}

pub async fn show(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let mut catalog = open_catalog(config)?;
    let record = fetch(&mut catalog, id).await?;
    print_summary(&record);
    Ok(())
}

/// Select `id` on the catalog and return the loaded record.
pub async fn fetch(catalog: &mut Catalog, id: &str) -> anyhow::Result<NamespaceConfig> {
    match catalog.select(id).await {
        SelectOutcome::Committed => catalog
            .form_record()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("namespace {id} was not loaded")),
        SelectOutcome::Failed => {
            anyhow::bail!("Error loading namespace: {}", catalog.error().unwrap_or("unknown error"))
        }
        SelectOutcome::Superseded => anyhow::bail!("namespace {id} request was superseded"),
    }
}
