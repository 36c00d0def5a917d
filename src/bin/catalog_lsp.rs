//! Catalog Language Server binary
//!
//! Serves catalog version hints, hover and go-to-definition over stdio.

use catalog_lsp::ResolverConfig;
use catalog_lsp::lsp::start_server;
use clap::{Parser, Subcommand};

/// Catalog Language Server
#[derive(Parser, Debug)]
#[command(name = "catalog-lsp")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Inlay hint refresh delay in milliseconds
    #[arg(long, default_value = "300")]
    refresh_delay: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print environment details for bug reports
    Rage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();

    let args = Args::parse();

    if let Some(Command::Rage) = args.command {
        print_environment()?;
        return Ok(());
    }

    // stdout carries the protocol, so logs go to stderr
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .target(env_logger::Target::Stderr)
        .init();

    log::info!(
        "Starting Catalog Language Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = ResolverConfig {
        refresh_debounce_ms: args.refresh_delay,
        ..ResolverConfig::default()
    };
    start_server(config).await;

    log::info!("Catalog Language Server stopped");
    Ok(())
}

fn print_environment() -> anyhow::Result<()> {
    let exe = std::env::current_exe()?;
    println!("Platform: {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Path: {}", exe.display());
    Ok(())
}
