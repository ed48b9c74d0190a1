//! Dropkit CLI: pick a local file, validate it, upload it to the configured
//! bucket, and print the outcome plus the preview decision.
//!
//! Configure via environment (or `.env`): STORAGE_BACKEND (`local`|`s3`),
//! LOCAL_STORAGE_PATH / LOCAL_STORAGE_BASE_URL, or S3_BUCKET / S3_REGION /
//! S3_ENDPOINT. MAX_FILE_SIZE_BYTES and ALLOWED_CONTENT_TYPES override the
//! validation defaults.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use dropkit_cli::{format_size, init_tracing};
use dropkit_core::{resolve_preview, Config, FileValidator};
use dropkit_pipeline::{FilePicker, FsByteLoader, PathPicker, UploadOutcome, UploadPipeline};
use dropkit_storage::create_storage;

#[derive(Parser)]
#[command(name = "dropkit", about = "File upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and upload a file (PNG, JPEG, or PDF)
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Override the size ceiling in bytes
        #[arg(long)]
        max_size_bytes: Option<u64>,
    },
    /// Show the preview decision for a MIME type and URL
    Preview {
        /// MIME type, e.g. image/png
        mime_type: String,
        /// Public URL of the uploaded file
        url: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            max_size_bytes,
        } => {
            let mut config = Config::from_env().context(
                "Failed to load configuration. Set LOCAL_STORAGE_PATH and \
                 LOCAL_STORAGE_BASE_URL, or STORAGE_BACKEND=s3 with S3_BUCKET and S3_REGION",
            )?;
            if let Some(max) = max_size_bytes {
                config.max_file_size_bytes = max;
            }

            let storage = create_storage(&config)
                .await
                .context("Failed to create storage backend")?;
            let validator = FileValidator::from_config(&config);
            let pipeline = UploadPipeline::with_bucket(
                storage,
                Arc::new(FsByteLoader),
                validator,
                config.bucket(),
            );

            let Some(descriptor) = PathPicker::new(&file).pick().await? else {
                print_json(&serde_json::json!({
                    "status": "failed",
                    "message": "No file selected.",
                }))?;
                std::process::exit(1);
            };

            match pipeline.run(&descriptor).await {
                UploadOutcome::Succeeded {
                    public_url,
                    mime_type,
                } => {
                    let preview = resolve_preview(Some(&mime_type), Some(&public_url));
                    print_json(&serde_json::json!({
                        "status": "succeeded",
                        "file": descriptor.display_name,
                        "size": descriptor.size_bytes.map(format_size),
                        "public_url": public_url,
                        "mime_type": mime_type,
                        "preview": preview,
                    }))?;
                }
                UploadOutcome::Failed { message } => {
                    print_json(&serde_json::json!({
                        "status": "failed",
                        "file": descriptor.display_name,
                        "message": message,
                    }))?;
                    std::process::exit(1);
                }
            }
        }
        Commands::Preview { mime_type, url } => {
            let preview = resolve_preview(Some(&mime_type), Some(&url));
            print_json(&preview)?;
        }
    }

    Ok(())
}
