use std::{fs, path::PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use serde_json::json;
use snacks::{MetricMode, geometry};
use tracing_subscriber::{EnvFilter, fmt};
use vision::{Classifier, GeminiClient, GeminiConfig, ImagePayload};

/// Measure a snack photo from disk without running the server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    image: PathBuf,

    #[arg(long, default_value = "area")]
    mode: MetricMode,

    #[arg(long, default_value = vision::DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let api_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
    let bytes = fs::read(&args.image)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let image = ImagePayload::from_bytes(mime_type(&args.image)?, &bytes);

    let client = GeminiClient::new(GeminiConfig {
        model: args.model,
        ..GeminiConfig::new(api_key)
    })?;
    let estimate = client.classify(&image).await?;

    let dimensions = estimate.dimensions().map(geometry::normalize);
    let metric = match (estimate.error_message(), dimensions) {
        (Some(error), _) => Err(error.to_string()),
        (None, Some(dimensions)) => {
            geometry::compute(args.mode, estimate.snack_type, &dimensions).map_err(|e| e.to_string())
        }
        (None, None) => Err("The model could not identify the snack.".to_string()),
    };

    let report = match metric {
        Ok(metric) => json!({
            "type": estimate.snack_type,
            "dimensions": dimensions,
            "mode": args.mode,
            "metric": metric,
            "error": null,
        }),
        Err(error) => json!({
            "type": estimate.snack_type,
            "dimensions": dimensions,
            "mode": args.mode,
            "metric": null,
            "error": error,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn mime_type(path: &std::path::Path) -> anyhow::Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    Ok(match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        other => bail!("Unsupported image extension `{other}`"),
    })
}
