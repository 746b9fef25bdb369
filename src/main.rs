use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use cv_profile_extractor_lib::core::errors::CoreError;
use cv_profile_extractor_lib::core::models::RuntimeSettings;
use cv_profile_extractor_lib::core::profile_store::JsonProfileStore;
use cv_profile_extractor_lib::core::runtime::ExtractionRuntime;
use cv_profile_extractor_lib::core::service::BatchService;
use cv_profile_extractor_lib::core::settings_store::SettingsStore;
use cv_profile_extractor_lib::core::upserter::ProfileUpserter;
use cv_profile_extractor_lib::init_tracing;

/// Extract consultant profiles from CV documents into the profile registry.
#[derive(Parser, Debug)]
#[command(name = "cv-profile-extractor", version, about)]
struct Cli {
    /// A CV file, or a directory whose .pdf/.docx files are processed in name order
    #[arg(required_unless_present = "write_config")]
    source: Option<PathBuf>,

    /// Settings file (JSON); defaults to the platform data directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Profile registry file; overrides `registryPath` from the settings
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Write the batch report as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Assemble profiles without writing the registry
    #[arg(long)]
    dry_run: bool,

    /// Documents processed at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Skip OCR for documents without a text layer
    #[arg(long)]
    no_ocr: bool,

    /// Write default settings to the config path and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            let fatal_config = err
                .downcast_ref::<CoreError>()
                .is_some_and(CoreError::is_batch_fatal);
            if fatal_config {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_store = cli
        .config
        .clone()
        .map(SettingsStore::with_path)
        .unwrap_or_default();

    if cli.write_config {
        settings_store.save(&RuntimeSettings::default()).await?;
        println!("{}", settings_store.path().display());
        return Ok(());
    }

    let mut settings = settings_store.load().await?;
    if cli.no_ocr {
        settings.ocr_enabled = false;
    }
    if let Some(concurrency) = cli.concurrency {
        settings.max_concurrent_documents = concurrency;
    }

    let source = cli
        .source
        .clone()
        .context("a source file or directory is required")?;

    let upserter = if cli.dry_run {
        None
    } else {
        let store = match cli.registry.clone().or_else(|| settings.registry_path.clone()) {
            Some(path) => JsonProfileStore::new_with_path(path),
            None => JsonProfileStore::new(),
        };
        tracing::info!(registry = %store.path().display(), "profile registry");
        Some(ProfileUpserter::new(
            Arc::new(store),
            settings.default_skill_level,
            settings.availability_window_days,
        ))
    };

    let runtime = ExtractionRuntime::initialize(settings).await?;
    if !runtime.ocr_available() {
        tracing::warn!("OCR is off; documents without a text layer will be rejected");
    }
    let service = BatchService::new(runtime, upserter)?;
    let result = service.run_batch(&source).await;
    service.shutdown();
    let report = result?;

    for outcome in &report.outcomes {
        println!("{}", outcome.summary_line());
    }
    println!(
        "created: {}, updated: {}, accepted: {}, rejected: {} ({:.1}s)",
        report.created, report.updated, report.accepted, report.rejected, report.duration_seconds
    );

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    Ok(())
}
