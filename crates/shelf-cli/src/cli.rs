use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Remote Shelf: photo uploads into a git-hosted catalog",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file; environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the upload server
    Serve(ServeArgs),
    /// Upload one photo and add it to the catalog
    Upload(UploadArgs),
    /// Check that the store is reachable with the configured token
    Check(CheckArgs),
    /// Show where a catalog array sits in a local file
    Locate(LocateArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Override the bind address from the config
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Product type: TV or AC
    #[arg(short = 't', long = "type")]
    pub product_type: String,
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long)]
    pub shelf: String,
    /// Image file to upload
    pub image: PathBuf,
    /// Run against an in-memory store instead of the remote repository
    #[arg(long)]
    pub dry_run: bool,
    /// Local catalog file to seed the in-memory store with (dry runs only)
    #[arg(long, requires = "dry_run")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct LocateArgs {
    /// Catalog source file
    pub file: PathBuf,
    /// Product type whose catalog variable to look for
    #[arg(short = 't', long = "type", default_value = "TV", conflicts_with = "variable")]
    pub product_type: String,
    /// Explicit variable name
    #[arg(long)]
    pub variable: Option<String>,
}
