use std::path::PathBuf;

use clap::Parser;

use cv_profile_extractor_lib::core::runtime::ExtractionRuntime;
use cv_profile_extractor_lib::core::settings_store::SettingsStore;
use cv_profile_extractor_lib::init_tracing;

/// Print the profile assembled from one CV as JSON, without touching the registry.
#[derive(Parser, Debug)]
#[command(name = "extract_one", version, about)]
struct Args {
    /// CV file (.pdf or .docx)
    file: PathBuf,

    /// Settings file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    no_ocr: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let store = args
        .config
        .map(SettingsStore::with_path)
        .unwrap_or_default();
    let mut settings = store.load().await?;
    if args.no_ocr {
        settings.ocr_enabled = false;
    }

    let runtime = ExtractionRuntime::initialize(settings).await?;
    let parser = runtime.build_parser()?;
    let parsed = parser.parse_path(&args.file).await;
    runtime.shutdown();

    println!("{}", serde_json::to_string_pretty(&parsed?)?);
    Ok(())
}
