mod runner;
mod scenario;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tessera_blocks::BlockRegistry;

use crate::runner::ScenarioEngine;
use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "tessera", about = "Replay multiblock placement scenarios against a sparse grid")]
struct Cli {
    /// Scenario file to play
    scenario: PathBuf,
    /// Block type definitions
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Print every non-air cell after the run
    #[arg(long)]
    dump: bool,
}

fn level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let lvl = level(cli.verbose);
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            simplelog::CombinedLogger::init(vec![
                simplelog::TermLogger::new(
                    lvl,
                    simplelog::Config::default(),
                    simplelog::TerminalMode::Mixed,
                    simplelog::ColorChoice::Auto,
                ),
                simplelog::WriteLogger::new(lvl, simplelog::Config::default(), file),
            ])?;
        }
        None => {
            env_logger::Builder::from_default_env()
                .filter_level(lvl)
                .init();
        }
    }
    Ok(())
}

fn report(engine: &ScenarioEngine, dump: bool) {
    let stats = engine.stats();
    println!("ticks: {}", engine.tick());
    println!(
        "events: {}  tasks run: {}  writes: {}  skipped clears: {}",
        stats.events, stats.tasks_run, stats.writes, stats.skipped_clears
    );
    println!(
        "validation failures: {}  resolution failures: {}  partial writes: {}  consistency aborts: {}",
        stats.validation_failures,
        stats.resolution_failures,
        stats.partial_write_failures,
        stats.consistency_aborts
    );
    for ev in &engine.host().log {
        println!("host: {:?}", ev);
    }
    if dump {
        let reg = engine.registry();
        for (p, b) in engine.world().snapshot() {
            let Some(ty) = reg.get(b.id) else {
                continue;
            };
            let states: Vec<String> = ty
                .state_pairs(b.state)
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            println!("{} {} [{}]", p, ty.name, states.join(", "));
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let reg = Arc::new(BlockRegistry::load_from_path(&cli.blocks)?);
    log::info!("loaded {} block types from {}", reg.blocks.len(), cli.blocks.display());
    let sc = Scenario::load_from_path(&cli.scenario)?;
    log::info!(
        "running {} ({} steps)",
        sc.name.as_deref().unwrap_or("unnamed scenario"),
        sc.steps.len()
    );

    let engine = runner::run(reg, &sc)?;
    report(&engine, cli.dump);
    Ok(())
}
