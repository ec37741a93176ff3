pub mod cli;
pub mod grid;
pub mod journal;
pub mod model;
pub mod parser;
pub mod placement;
pub mod processor;
pub mod writer;

use anyhow::Context;
use clap::Parser;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    run_with(&args)
}

pub fn run_with(args: &cli::Cli) -> anyhow::Result<()> {
    // 1. ── Parse ──────────────────────────────────────────────────────
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let session = parser::load(&json).with_context(|| "Parsing session JSON")?;

    // 2. ── Process ────────────────────────────────────────────────────
    let config = processor::ReplayConfig {
        tick_rate: args.tick_rate,
        initial_size: args.initial_size(),
    };
    let outcome = processor::run(&session, &config).with_context(|| "Replaying session")?;

    // 3. ── Write outputs ──────────────────────────────────────────────
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Creating {}", args.output.display()))?;

    let level = writer::csv::emit(&outcome.grid, &args.output)
        .with_context(|| "Writing level export")?;
    writer::actions::emit(&outcome.actions, &args.output)
        .with_context(|| "Writing action log")?;

    log::info!(
        "wrote {} ({} objects, {}x{})",
        level.display(),
        outcome.grid.objects().len(),
        outcome.grid.width(),
        outcome.grid.height()
    );
    Ok(())
}
