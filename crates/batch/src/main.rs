use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use nippo_ai::ReportGenerator;
use nippo_core::TenantId;
use nippo_infra::{
    GeminiOracle, InMemoryRecordStore, Settings, TenantScope, WeeklyAggregator, WeeklyBatchConfig,
};

#[derive(Parser, Debug)]
#[command(name = "nippo-batch", version)]
#[command(about = "Generate weekly summaries from daily reports")]
struct Cli {
    /// Any day of the target week (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// JSON store snapshot to read members and reports from.
    #[arg(long)]
    snapshot: PathBuf,

    /// Only process members of this tenant.
    #[arg(long)]
    tenant: Option<TenantId>,

    /// Write the snapshot back with the generated summaries.
    #[arg(long)]
    write_back: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nippo_observability::init();
    let cli = Cli::parse();

    let settings = Settings::from_env().context("loading settings")?;
    tracing::info!(
        model = %settings.model,
        concurrency = settings.batch_concurrency,
        "starting weekly batch"
    );

    let store = Arc::new(
        InMemoryRecordStore::load_json(&cli.snapshot)
            .with_context(|| format!("loading snapshot {}", cli.snapshot.display()))?,
    );
    let oracle = GeminiOracle::from_settings(&settings).context("building oracle client")?;
    let generator = ReportGenerator::new(oracle).with_model(&settings.model);

    let scope = cli.tenant.map(TenantScope::Tenant).unwrap_or_default();
    let config = WeeklyBatchConfig::default()
        .with_scope(scope)
        .with_concurrency(settings.batch_concurrency);

    let outcome = WeeklyAggregator::new(store.clone(), generator)
        .with_config(config)
        .run(cli.date)
        .await
        .context("listing members")?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if cli.write_back {
        store
            .save_json(&cli.snapshot)
            .with_context(|| format!("writing snapshot {}", cli.snapshot.display()))?;
    }
    Ok(())
}
