//! `triad` — command-line front end for the tiered memory engine
//! (SPEC_FULL.md §2 workspace layout, §5.1 logging).

mod commands;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use triad_core::embeddings::StubEmbeddingProvider;
use triad_core::storage::Storage;
use triad_core::{Engine, TriadConfig};

use commands::{Cli, Commands};

const DEFAULT_EMBEDDING_DIMENSION: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let data_dir: Option<PathBuf> = cli.data_dir.clone().or_else(TriadConfig::data_dir_from_env);

    let storage = match Storage::new(data_dir) {
        Ok(s) => {
            info!("storage initialized");
            Arc::new(s)
        }
        Err(e) => {
            error!("failed to initialize storage: {e}");
            std::process::exit(1);
        }
    };

    let embeddings = Arc::new(StubEmbeddingProvider::ready(DEFAULT_EMBEDDING_DIMENSION));
    let engine = Engine::new(storage, embeddings, TriadConfig::default())?;
    engine.init().await?;

    commands::run(cli.command, &engine).await
}
