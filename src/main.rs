use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wall_submit::{
    client::BackendClient,
    config::Config,
    hooks::{SubmitOutcome, UiHooks},
    intake::StagedFile,
    model::Category,
    notify::{Notification, NotifyKind},
    workflow::{SubmissionFields, SubmissionWorkflow},
};

/// Submit one wallpaper: validate, upload, record.
#[derive(Debug, Parser)]
#[command(name = "wall-submit", version, about)]
struct Cli {
    /// Image file to submit (JPG, PNG, or WEBP)
    file: PathBuf,

    /// Wallpaper title
    #[arg(long)]
    title: String,

    /// Category: abstract, anime, cars, city, games, minimal, nature, space
    #[arg(long)]
    category: Category,

    /// Submitter display name (blank submits as "Anonymous")
    #[arg(long, default_value = "")]
    submitter: String,
}

/// Renders workflow callbacks to stderr.
struct TerminalHooks;

impl UiHooks for TerminalHooks {
    fn on_file_staged(&self, _file: &StagedFile, _preview: &str, info: &str) {
        eprintln!("staged: {info}");
    }

    fn on_progress(&self, _percent: u8, label: &str) {
        eprintln!("{label}");
    }

    fn on_notification(&self, notification: &Notification) {
        match notification.kind {
            NotifyKind::Error => eprintln!("error: {}", notification.message),
            NotifyKind::Info => eprintln!("{}", notification.message),
        }
    }

    fn on_result(&self, outcome: &SubmitOutcome) {
        if let SubmitOutcome::Accepted { .. } = outcome {
            eprintln!("Submission accepted for review.");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "wall-submit starting");

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;
    info!(endpoint = %config.backend.endpoint, "Loaded configuration");

    // Connect the backend handle (one retry after a short delay, then fail)
    let backend = Arc::new(BackendClient::connect(&config).await?);

    let mut workflow = SubmissionWorkflow::new(&config, Arc::new(TerminalHooks));
    workflow.attach_backend(backend);

    // Stage the file from disk, guessing the declared type from the path
    let data = tokio::fs::read(&cli.file).await?;
    let media_type = mime_guess::from_path(&cli.file)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.file.display().to_string());

    workflow.stage_file(name, media_type, data.into())?;

    let receipt = workflow
        .submit(SubmissionFields {
            title: cli.title,
            category: Some(cli.category),
            submitter_name: cli.submitter,
        })
        .await?;

    println!("{}", receipt.image_url);
    Ok(())
}
