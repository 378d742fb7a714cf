//! Command-line interface for fitcheck
//!
//! Argument parsing and command execution. All output, including error
//! reporting, happens here; `main.rs` only maps the result to a process
//! exit code.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;

use crate::provider::ImageGenProvider;
use crate::{
    Angle, Caller, Config, ImagePayload, MediaType, MemoryStore, MultiAngleOrchestrator,
    PromptSet, RecordStore, TryOnError, TryOnOptions, TryOnService,
};

/// User-facing message for runs with no usable result. Internal error
/// detail goes to the log, never to this message.
const RETRY_MESSAGE: &str =
    "Try-on generation is temporarily unavailable. Please try again in a moment.";

/// fitcheck - virtual try-on generation
#[derive(Parser)]
#[command(name = "fitcheck")]
#[command(about = "Composite a garment onto a person across front, back, and side views")]
#[command(version)]
pub struct Cli {
    /// Explicit config file path (default: discover fitcheck.toml upward from CWD)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a multi-angle try-on from a person photo and a garment photo
    Tryon(TryonArgs),
    /// Print the effective per-angle prompt table
    Prompts(PromptsArgs),
}

#[derive(Args)]
pub struct TryonArgs {
    /// Path to the person photo
    #[arg(long)]
    pub person: PathBuf,

    /// Path to the garment photo
    #[arg(long)]
    pub garment: PathBuf,

    /// Directory the generated images are written to
    #[arg(long, default_value = "tryon-out")]
    pub out: PathBuf,

    /// Garment description stored on the record
    #[arg(long, default_value = "")]
    pub description: String,

    /// Tag to attach to the record (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Mark the try-on publicly visible
    #[arg(long)]
    pub public: bool,
}

#[derive(Args)]
pub struct PromptsArgs {
    /// Print only this angle's prompt (front, back, side)
    #[arg(long)]
    pub angle: Option<String>,
}

/// Run the CLI. Returns the process exit code on failure.
pub async fn run() -> Result<(), i32> {
    init_tracing();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => Ok(()),
        Err(CliError::Retryable) => {
            eprintln!("{RETRY_MESSAGE}");
            Err(1)
        }
        Err(CliError::Other(err)) => {
            eprintln!("Error: {err:#}");
            Err(2)
        }
    }
}

enum CliError {
    /// No usable result; the user should simply retry.
    Retryable,
    /// Everything else: bad arguments, unreadable files, config problems.
    Other(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Tryon(args) => run_tryon(&config, args).await,
        Command::Prompts(args) => {
            run_prompts(&args);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config from {}", path.display()))?
        }
        None => Config::discover().context("discovering configuration")?,
    };
    config.validate().context("validating configuration")?;
    Ok(config)
}

async fn run_tryon(config: &Config, args: TryonArgs) -> Result<(), CliError> {
    let person = read_image(&args.person)?;
    let garment = read_image(&args.garment)?;

    let provider: Arc<dyn ImageGenProvider> = Arc::from(
        crate::provider::from_config(config).context("constructing image generation backend")?,
    );
    let orchestrator = MultiAngleOrchestrator::from_config(config, provider, PromptSet::default());
    let store = Arc::new(MemoryStore::new());
    let service = TryOnService::new(orchestrator, Arc::clone(&store) as Arc<dyn RecordStore>);

    let options = TryOnOptions {
        garment_description: args.description,
        tags: args.tags,
        is_public: args.public,
        ..TryOnOptions::default()
    };

    let record = match service
        .create_try_on(&Caller::Anonymous, person, garment, options)
        .await
    {
        Ok(record) => record,
        Err(TryOnError::Generation(err)) => {
            // Operators get the cause; end users only get RETRY_MESSAGE.
            error!(error = %err, "try-on generation failed");
            return Err(CliError::Retryable);
        }
        Err(TryOnError::Store(err)) => {
            return Err(anyhow::Error::new(err)
                .context("persisting try-on record")
                .into());
        }
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let mut written = Vec::new();
    for angle in Angle::ALL {
        if let Some(image) = record.multi_angle.get(angle) {
            written.push(write_image(&args.out, angle.as_str(), image)?);
        }
    }
    written.push(write_image(&args.out, "primary", &record.result_image)?);

    let summary = serde_json::json!({
        "id": record.id,
        "created_at": record.created_at,
        "angles": {
            "front": record.multi_angle.front.is_some(),
            "back": record.multi_angle.back.is_some(),
            "side": record.multi_angle.side.is_some(),
        },
        "primary_bytes": record.result_image.len(),
        "output_dir": args.out,
        "files": written,
    });
    println!("{summary:#}");

    Ok(())
}

fn run_prompts(args: &PromptsArgs) {
    let prompts = PromptSet::default();
    match &args.angle {
        Some(label) => println!("{}", prompts.for_label(label)),
        None => {
            for angle in Angle::ALL {
                println!("[{angle}]");
                println!("{}\n", prompts.for_angle(angle));
            }
        }
    }
}

fn read_image(path: &Path) -> Result<ImagePayload> {
    let data =
        std::fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
    let media_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(MediaType::from_extension)
        .unwrap_or_default();
    Ok(ImagePayload::new(data, media_type))
}

fn write_image(dir: &Path, stem: &str, image: &ImagePayload) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}.{}", image.media_type.extension()));
    std::fs::write(&path, &image.data)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryon_args_parse() {
        let cli = Cli::try_parse_from([
            "fitcheck", "tryon", "--person", "p.jpg", "--garment", "g.png", "--out", "dir",
            "--tag", "jacket", "--tag", "red", "--public",
        ])
        .unwrap();

        match cli.command {
            Command::Tryon(args) => {
                assert_eq!(args.person, PathBuf::from("p.jpg"));
                assert_eq!(args.garment, PathBuf::from("g.png"));
                assert_eq!(args.out, PathBuf::from("dir"));
                assert_eq!(args.tags, vec!["jacket", "red"]);
                assert!(args.public);
            }
            Command::Prompts(_) => panic!("Expected tryon command"),
        }
    }

    #[test]
    fn test_tryon_requires_both_images() {
        assert!(Cli::try_parse_from(["fitcheck", "tryon", "--person", "p.jpg"]).is_err());
    }

    #[test]
    fn test_prompts_args_parse() {
        let cli = Cli::try_parse_from(["fitcheck", "prompts", "--angle", "back"]).unwrap();
        match cli.command {
            Command::Prompts(args) => assert_eq!(args.angle.as_deref(), Some("back")),
            Command::Tryon(_) => panic!("Expected prompts command"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from([
            "fitcheck", "prompts", "--config", "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
