//! Analyze one video file and print the result.
//!
//! Usage: `deconstruct <video-path> [platform]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::json;
use tracing::info;

use deconstruct_ai::{AnalysisClient, GeminiClient, TranslationClient};
use deconstruct_app::{init_tracing, AnalysisFlow, AppConfig, FlowError, StderrNotifier};
use deconstruct_media::UploadedFile;
use deconstruct_models::Platform;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: deconstruct <video-path> [tiktok|instagram|youtube]");
    };
    let platform = match args.next() {
        Some(raw) => raw.parse::<Platform>()?,
        None => Platform::default(),
    };

    let config = AppConfig::from_env();
    info!(
        model = %config.model,
        max_video_size_mb = config.max_video_size_mb,
        "Starting deconstruct"
    );

    let gemini = Arc::new(
        GeminiClient::new(config.gemini_config()?).context("Failed to create Gemini client")?,
    );
    let analyzer = Arc::new(AnalysisClient::new(gemini.clone()));
    let translator = Arc::new(TranslationClient::new(gemini));

    let mut flow = AnalysisFlow::new(analyzer, translator, Arc::new(StderrNotifier))
        .with_policy(config.upload_policy())
        .with_sync_debounce(config.sync_debounce);
    flow.set_platform(platform);

    let file = UploadedFile::from_path(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match flow.select_file(file).await {
        Ok(()) => {}
        Err(e @ FlowError::Busy(_)) => return Err(e.into()),
        // Validation and analysis failures were already shown by the notifier.
        Err(_) => std::process::exit(1),
    }

    let (Some(result), Some(session)) = (flow.result(), flow.session()) else {
        bail!("analysis finished without a result");
    };
    let snapshot = session.export_snapshot().await;

    let output = json!({
        "analysisId": flow.analysis_id(),
        "platform": platform,
        "result": result,
        "export": {
            "fileName": snapshot.file_name(),
            "snapshot": snapshot,
        },
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
