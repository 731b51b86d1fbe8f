use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use ai_client::Gemini;
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plantscan::image::LocalImage;
use plantscan::render;
use plantscan::{WorkflowController, WorkflowState};
use plantscan_common::Config;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "plantscan")]
#[command(about = "Identify a plant from a photo")]
#[command(version)]
struct Cli {
    /// Photo of the plant (any image/* file up to the size limit)
    image: PathBuf,

    /// Print the record as JSON instead of labelled text
    #[arg(long)]
    json: bool,

    /// Override GEMINI_MODEL
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("plantscan=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.gemini_model = model;
    }
    config.log_redacted();

    let image = LocalImage::open(&cli.image)
        .await
        .with_context(|| format!("cannot open {}", cli.image.display()))?;
    if !image.is_image() {
        bail!("{} is not an image file", image.path().display());
    }

    let http = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    let gemini = Gemini::with_http_client(&config.gemini_api_key, &config.gemini_model, http)
        .with_base_url(&config.gemini_base_url);
    info!(model = gemini.model(), "Gemini client ready");

    let controller =
        WorkflowController::new(Arc::new(gemini)).with_max_file_bytes(config.max_file_bytes);

    let mut updates = controller.subscribe();
    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().state.clone();
            if let Some(message) = render::progress_message(&state) {
                eprintln!("{message}");
            }
        }
    });

    let outcome = controller.select_file(Some(Arc::new(image))).await;
    // Closing the channel lets the printer drain what it has and exit.
    drop(controller);
    progress.await?;

    match outcome {
        Some(WorkflowState::Succeeded(record)) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", render::render_record(&record));
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(WorkflowState::Failed(err)) => {
            eprintln!("{}", render::error_message(&err));
            Ok(ExitCode::from(1))
        }
        other => bail!("analysis ended without a result: {other:?}"),
    }
}
