mod manifest;

use aargs::{Args, Schema};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::load_manifest;

#[derive(Parser)]
#[command(name = "aargs")]
#[command(version, about = "Scan and bind command lines against an aargs schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split tokens into prologue, flags and epilogue
    Scan(TokenArgs),

    /// Bind tokens against a schema and print the named values
    Bind(TokenArgs),

    /// Print usage text for a schema
    Usage(SchemaArgs),
}

#[derive(Parser)]
struct SchemaArgs {
    /// Path to a JSON schema (default: aargs.json if present)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Program name shown in usage text (overrides the schema)
    #[arg(long, value_name = "NAME")]
    program: Option<String>,
}

#[derive(Parser)]
struct TokenArgs {
    #[command(flatten)]
    schema: SchemaArgs,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Tokens to interpret, given after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => scan_command(args),
        Commands::Bind(args) => bind_command(args),
        Commands::Usage(args) => usage_command(args),
    }
}

fn load_schema(args: &SchemaArgs) -> Result<Schema> {
    let manifest = load_manifest(args.schema.as_deref())?.unwrap_or_default();
    manifest.into_schema(args.program.clone())
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

fn scan_command(args: TokenArgs) -> Result<()> {
    tracing::debug!("executing scan command");

    let schema = load_schema(&args.schema)?;
    let parsed = schema
        .scan(&args.tokens)
        .context("failed to scan tokens")?;

    print_json(&parsed.into_option(), args.compact)
}

fn bind_command(args: TokenArgs) -> Result<()> {
    tracing::debug!("executing bind command");

    let schema = load_schema(&args.schema)?;
    let mut bound = Args::new(schema);
    bound
        .bind(&args.tokens)
        .context("failed to bind tokens")?;

    print_json(bound.values(), args.compact)
}

fn usage_command(args: SchemaArgs) -> Result<()> {
    tracing::debug!("executing usage command");

    let schema = load_schema(&args)?;
    for line in schema.help() {
        println!("{line}");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
