//! Subcommand definitions and dispatch (SPEC_FULL.md §2: `src/commands.rs`).
//!
//! Every command prints its machine-readable result as one JSON line on
//! stdout; human-facing status goes to stderr via `colored`, mirroring the
//! teacher's `vestige` CLI texture.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use triad_core::model::{Context, Layer, Role};
use triad_core::{ConflictAction, Engine, RetrieveOptions, WriteRequest};

/// clap's `value_parser!()` needs a `FromStr::Err` that implements
/// `std::error::Error`; `Layer`/`Context` parse errors are plain `String`s,
/// so wrap them here rather than pulling clap into `triad-core`.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ParseEnumError(String);

fn parse_layer(s: &str) -> Result<Layer, ParseEnumError> {
    s.parse().map_err(ParseEnumError)
}

fn parse_context(s: &str) -> Result<Context, ParseEnumError> {
    s.parse().map_err(ParseEnumError)
}

fn parse_conflict_action(s: &str) -> Result<ConflictAction, ParseEnumError> {
    match s {
        "keep-existing" | "keep" => Ok(ConflictAction::KeepExisting),
        "update-new" | "update" => Ok(ConflictAction::UpdateNew),
        "ask-later" | "ask" => Ok(ConflictAction::AskLater),
        other => Err(ParseEnumError(format!("unknown conflict action '{other}', expected keep-existing, update-new, or ask-later"))),
    }
}

#[derive(Parser)]
#[command(name = "triad")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for the triad tiered associative memory engine")]
pub struct Cli {
    /// Override the default data directory (also settable via TRIAD_DATA_DIR).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route and store one utterance (spec.md §4.8).
    Write {
        content: String,
        /// Force a layer instead of routing (imm, emm, kmm).
        #[arg(long, value_parser = parse_layer)]
        layer: Option<Layer>,
        /// Conversational context tag (general, family, work, college, personal, health, hobby).
        #[arg(long, default_value = "general", value_parser = parse_context)]
        context: Context,
        /// Treat the content as an assistant utterance instead of a user one.
        #[arg(long)]
        assistant: bool,
        /// Recent conversation lines, comma-separated, fed into the
        /// router's context-blended embedding step (spec.md §4.4 step 4).
        #[arg(long)]
        recent_context: Option<String>,
    },

    /// Query across all three layers (spec.md §4.9).
    Retrieve {
        query: String,
        #[arg(long, default_value_t = 5)]
        top_k: usize,
        #[arg(long, value_parser = parse_context)]
        context: Option<Context>,
    },

    /// One online-learning correction for the router (spec.md §4.2).
    Teach {
        text: String,
        #[arg(value_parser = parse_layer)]
        correct_layer: Layer,
        /// Recent context strings, comma-separated.
        #[arg(long)]
        context: Option<String>,
    },

    /// Reset the classifier and replay the seed corpus plus the full
    /// correction log (spec.md §4.2, §9).
    Retrain,

    /// List every entry in one layer.
    List {
        #[arg(value_parser = parse_layer)]
        layer: Layer,
    },

    /// Count entries in one layer.
    Count {
        #[arg(value_parser = parse_layer)]
        layer: Layer,
    },

    /// Delete every entry in one layer.
    Clear {
        #[arg(value_parser = parse_layer)]
        layer: Layer,
    },

    /// Delete one entry by id.
    Delete {
        #[arg(value_parser = parse_layer)]
        layer: Layer,
        id: String,
    },

    /// Run the experience importance decay sweep (spec.md §4.6).
    Decay,

    /// Drop experience entries below an importance threshold (SPEC_FULL.md §6).
    Prune {
        #[arg(long, default_value_t = 0.15)]
        threshold: f32,
    },

    /// Per-store snapshot counts (SPEC_FULL.md §6).
    Stats,

    /// Apply a decision on an identity conflict surfaced by `write` (spec.md §4.8).
    ResolveConflict {
        key: String,
        new_value: String,
        #[arg(value_parser = parse_conflict_action)]
        action: ConflictAction,
    },
}

pub async fn run(command: Commands, engine: &Engine) -> anyhow::Result<()> {
    match command {
        Commands::Write { content, layer, context, assistant, recent_context } => {
            let role = if assistant { Role::Assistant } else { Role::User };
            let mut req = WriteRequest::new(content, role).with_context(context);
            if let Some(layer) = layer {
                req = req.with_force_layer(layer);
            }
            if let Some(recent_context) = recent_context {
                let lines: Vec<String> = recent_context.split(',').map(|s| s.trim().to_string()).collect();
                req = req.with_recent_context(lines);
            }
            let result = engine.write(req).await?;
            if result.success {
                eprintln!("{}", "write accepted".green());
            } else {
                eprintln!("{}", "write not accepted".yellow());
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Retrieve { query, top_k, context } => {
            let mut options = RetrieveOptions::from_config(engine.config());
            options.top_k = top_k;
            options.context_filter = context;
            let results = engine.retrieve(&query, &options).await?;
            eprintln!("{}", format!("{} result(s)", results.len()).cyan());
            println!("{}", serde_json::to_string_pretty(&results)?);
        }

        Commands::Teach { text, correct_layer, context } => {
            let context: Vec<String> = context.map(|c| c.split(',').map(|s| s.trim().to_string()).collect()).unwrap_or_default();
            engine.teach(&text, &context, correct_layer).await?;
            eprintln!("{}", "router updated".green());
        }

        Commands::Retrain => {
            engine.retrain().await?;
            eprintln!("{}", "classifier retrained from seed corpus and correction log".green());
        }

        Commands::List { layer } => {
            let json = match layer {
                Layer::Imm => serde_json::to_string_pretty(&engine.list_identity()?)?,
                Layer::Emm => serde_json::to_string_pretty(&engine.list_experience()?)?,
                Layer::Kmm => serde_json::to_string_pretty(&engine.list_knowledge()?)?,
            };
            println!("{json}");
        }

        Commands::Count { layer } => {
            println!("{}", engine.count(layer)?);
        }

        Commands::Clear { layer } => {
            engine.clear(layer)?;
            eprintln!("{}", format!("{layer} cleared").yellow());
        }

        Commands::Delete { layer, id } => {
            engine.delete(layer, &id)?;
            eprintln!("{}", format!("deleted {id} from {layer}").yellow());
        }

        Commands::Decay => {
            let updated = engine.apply_decay()?;
            eprintln!("{}", format!("{updated} experience entr(y/ies) decayed").cyan());
        }

        Commands::Prune { threshold } => {
            let pruned = engine.prune_experience(threshold)?;
            eprintln!("{}", format!("{pruned} experience entr(y/ies) pruned").yellow());
        }

        Commands::Stats => {
            let stats = serde_json::json!({
                "identity": engine.identity_stats()?,
                "experience": engine.experience_stats()?,
                "knowledge": engine.knowledge_stats()?,
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        Commands::ResolveConflict { key, new_value, action } => {
            let result = engine.resolve_conflict(&key, &new_value, action)?;
            eprintln!("{}", "conflict resolved".green());
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}
