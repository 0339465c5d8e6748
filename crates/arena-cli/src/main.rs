//! Arena CLI - headless skirmishes for the online-learning combat brains.
//!
//! - `arena run` - play rounds against a scripted player, carrying learned
//!   weights from each dead elite to the next spawn of its archetype
//! - `arena init` - write a default configuration file
//! - `arena archetypes` - print the per-archetype combat stats

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ai_rl::Archetype;

mod config;
mod round;
mod world;

use config::{ArenaConfig, DEFAULT_CONFIG};
use round::Arena;

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Headless skirmishes for online-learning combat brains", version)]
struct Cli {
    /// Configuration file (YAML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds, persisting weights between lives
    Run {
        /// Number of rounds (overrides the config)
        #[arg(long)]
        rounds: Option<u32>,

        /// Master seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the final weight store as JSON
        #[arg(long)]
        dump_weights: Option<PathBuf>,

        /// Stream decision traces at TRACE level
        #[arg(long)]
        trace: bool,
    },

    /// Write a default configuration file
    Init {
        #[arg(long, default_value = "arena.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the default combat stats per archetype
    Archetypes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    let filter = if matches!(cli.command, Commands::Run { trace: true, .. }) {
        filter.add_directive("ai_tools=trace".parse()?)
    } else {
        filter
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run {
            rounds,
            seed,
            dump_weights,
            trace,
        } => {
            let mut config = ArenaConfig::load_or_default(cli.config.as_deref())?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let rounds = rounds.unwrap_or(config.rounds);
            run_rounds(config, rounds, dump_weights.as_deref(), trace)
        }
        Commands::Init { path, force } => init_config(&path, force),
        Commands::Archetypes => {
            show_archetypes();
            Ok(())
        }
    }
}

fn run_rounds(
    config: ArenaConfig,
    rounds: u32,
    dump_weights: Option<&Path>,
    trace: bool,
) -> Result<()> {
    let mut arena = Arena::new(config).with_trace(trace);
    tracing::info!(
        rounds,
        seed = arena.config().seed,
        elites = arena.config().elites_per_round(),
        "Starting arena"
    );
    let reports = arena.run(rounds);

    println!(
        "{:>5} {:>7} {:>6} {:>6} {:>9} {:>9} {:>5} {:>6} {:>5} {:>7} {:>7}",
        "round",
        "seconds",
        "killed",
        "player",
        "to_elites",
        "to_player",
        "hits",
        "whiffs",
        "heals",
        "healing",
        "explore"
    );
    for r in &reports {
        println!(
            "{:>5} {:>7.1} {:>3}/{:<2} {:>6} {:>9.0} {:>9.0} {:>5} {:>6} {:>5} {:>7.0} {:>7.2}",
            r.round,
            r.seconds,
            r.killed,
            r.spawned,
            if r.player_survived { "alive" } else { "dead" },
            r.damage_to_elites,
            r.damage_to_player,
            r.hits,
            r.whiffs,
            r.heals,
            r.healing,
            r.exploration_rate(),
        );
    }

    if let Some(path) = dump_weights {
        let json = serde_json::to_string_pretty(arena.store())
            .context("Failed to serialize weight store")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write weights to {}", path.display()))?;
        println!();
        println!("Wrote {} weight tables to {}", arena.store().len(), path.display());
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default arena configuration to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Adjust the roster and learning rates");
    println!("  2. Run: arena --config {} run", path.display());
    Ok(())
}

fn show_archetypes() {
    println!(
        "{:<8} {:>6} {:>6} {:>7} {:>6} {:>8} {:>6} {:>5}",
        "name", "damage", "range", "windup", "cd", "speed", "heal", "hp"
    );
    for archetype in Archetype::ALL {
        let s = archetype.default_stats();
        println!(
            "{:<8} {:>6.0} {:>6.0} {:>7.2} {:>6.2} {:>8.0} {:>6.0} {:>5.0}",
            archetype.name(),
            s.attack_damage,
            s.max_attack_range,
            s.windup_seconds,
            s.cooldown_seconds,
            s.movement_speed,
            s.heal_amount,
            s.max_health,
        );
    }
}
