use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;

use shelf_catalog::locate_array;
use shelf_server::{credential_from_env, AppState, ServerConfig, ShelfServer, StoreStatus};
use shelf_store::{ContentStore, GitHubContentStore, InMemoryContentStore};
use shelf_types::{ProductType, UploadRequest};
use shelf_upload::{UploadOrchestrator, UploadOutcome, UploadResponse};

use crate::cli::{CheckArgs, Cli, Command, LocateArgs, OutputFormat, ServeArgs, UploadArgs};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let config = load_config(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Upload(args) => cmd_upload(config, args, format).await,
        Command::Check(args) => cmd_check(config, args, format).await,
        Command::Locate(args) => cmd_locate(config, args, format),
    }
}

/// Load the config file (or defaults), then apply overrides from `env`.
fn load_config<F>(path: Option<&Path>, env: F) -> anyhow::Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    config.apply_env_with(env)?;
    config.validate()?;
    Ok(config)
}

fn remote_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn ContentStore>> {
    let Some(credential) = credential_from_env() else {
        bail!("GITHUB_TOKEN is not set");
    };
    Ok(Arc::new(GitHubContentStore::new(&config.store, credential)?))
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    let credential = credential_from_env();
    if credential.is_none() {
        tracing::warn!("GITHUB_TOKEN not set; uploads are refused until a token is provided");
    }
    let state = AppState::from_config(config, credential)?;
    ShelfServer::new(state).serve().await?;
    Ok(())
}

async fn cmd_upload(
    config: ServerConfig,
    args: UploadArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let image = std::fs::read(&args.image)
        .with_context(|| format!("failed to read image {}", args.image.display()))?;

    let memory = args.dry_run.then(|| Arc::new(InMemoryContentStore::new()));
    let store: Arc<dyn ContentStore> = match &memory {
        Some(memory) => {
            if let Some(catalog) = &args.catalog {
                let product: ProductType = args.product_type.parse()?;
                let text = std::fs::read(catalog)
                    .with_context(|| format!("failed to read catalog {}", catalog.display()))?;
                memory.seed(config.layout.catalog_path(product), text)?;
            }
            memory.clone()
        }
        None => remote_store(&config)?,
    };

    let orchestrator = UploadOrchestrator::new(store, config.layout.clone(), config.upload.clone());
    let outcome = orchestrator
        .upload(UploadRequest {
            product_type: args.product_type,
            name: args.name,
            shelf: args.shelf,
            image,
            extension: extension_of(&args.image),
        })
        .await;

    print_outcome(&outcome, format)?;

    if let (Some(memory), Some(receipt)) = (&memory, outcome.receipt()) {
        if receipt.catalog_version.is_some() && format == OutputFormat::Text {
            if let Some(blob) = memory.read(&receipt.catalog_path).await? {
                println!("\n{}", blob.text()?);
            }
        }
    }

    if outcome.is_failure() {
        bail!("upload failed");
    }
    Ok(())
}

fn print_outcome(outcome: &UploadOutcome, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&UploadResponse::from(outcome))?);
        }
        OutputFormat::Text => {
            let message = outcome.message();
            match outcome {
                UploadOutcome::Success(r) => {
                    println!("{} {}", "✓".green().bold(), message);
                    println!("  {} {}", "image:".dimmed(), r.blob_path);
                    println!("  {} {}", "entry:".dimmed(), r.entry.image());
                }
                UploadOutcome::SuccessWithWarning(r, e) => {
                    println!("{} {}", "!".yellow().bold(), message);
                    println!("  {} {}", "image:".dimmed(), r.blob_path);
                    println!("  {} {}", "reason:".dimmed(), e.kind().yellow());
                }
                UploadOutcome::Failure(_) => {
                    println!("{} {}", "✗".red().bold(), message);
                }
            }
        }
    }
    Ok(())
}

async fn cmd_check(
    config: ServerConfig,
    _args: CheckArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let status = match credential_from_env() {
        None => StoreStatus {
            status: "no_token".into(),
            message: "GITHUB_TOKEN is not set".into(),
        },
        Some(credential) => {
            let store = GitHubContentStore::new(&config.store, credential)?;
            match store.probe().await {
                Ok(()) => StoreStatus {
                    status: "connected".into(),
                    message: format!("Connected to {}", store.describe()),
                },
                Err(e) => StoreStatus {
                    status: "error".into(),
                    message: format!("Store connection error: {e}"),
                },
            }
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Text if status.status == "connected" => {
            println!("{} {}", "✓".green().bold(), status.message)
        }
        OutputFormat::Text => println!("{} {}", "✗".red().bold(), status.message),
    }

    if status.status != "connected" {
        bail!("store check failed: {}", status.status);
    }
    Ok(())
}

/// Where the catalog array sits in a file.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct LocateReport {
    variable: String,
    start: usize,
    end: usize,
    line: usize,
    blank: bool,
}

fn locate_report(text: &str, variable: &str) -> anyhow::Result<LocateReport> {
    let region = locate_array(text, variable)?;
    Ok(LocateReport {
        line: text[..region.start].matches('\n').count() + 1,
        blank: region.is_blank(text),
        variable: region.variable_name,
        start: region.start,
        end: region.end,
    })
}

fn cmd_locate(config: ServerConfig, args: LocateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let variable = match args.variable {
        Some(v) => v,
        None => {
            let product: ProductType = args.product_type.parse()?;
            config.layout.variable_name(product).to_string()
        }
    };
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let report = locate_report(&text, &variable)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let contents = if report.blank { "empty" } else { "has entries" };
            println!(
                "{} {} at line {} (bytes {}..{}, {})",
                "✓".green().bold(),
                report.variable.bold(),
                report.line,
                report.start,
                report.end,
                contents,
            );
        }
    }
    Ok(())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_string)
}
