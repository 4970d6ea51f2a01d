//! pherotrace - CLI entry point
//!
//! Ant colony optimization over volumetric density maps.

use clap::{Parser, Subcommand};
use pherotrace::checkpoint::{Checkpoint, CheckpointManager};
use pherotrace::{benchmark, Colony, Config, DensityField, SimError};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "pherotrace")]
#[command(version)]
#[command(about = "Ant colony optimization over volumetric density maps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Density map (JSON); defaults to the configured synthetic map
        #[arg(short, long)]
        density: Option<PathBuf>,

        /// Output directory for checkpoints and stats
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Resume simulation from checkpoint
    Resume {
        /// Checkpoint file to resume from
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// Number of additional rounds
        #[arg(short, long, default_value = "10")]
        rounds: u32,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of rounds
        #[arg(short, long, default_value = "20")]
        rounds: u32,

        /// Ants spawned per round
        #[arg(short, long, default_value = "10")]
        ants: u32,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Analyze a checkpoint file
    Analyze {
        /// Checkpoint file
        checkpoint: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            density,
            output,
            seed,
            quiet,
        } => run_simulation(config, density, output, seed, quiet),

        Commands::Resume {
            checkpoint,
            rounds,
            output,
        } => resume_simulation(checkpoint, rounds, output),

        Commands::Benchmark { rounds, ants } => run_benchmark(rounds, ants),

        Commands::Init { output } => generate_config(output),

        Commands::Analyze { checkpoint } => analyze_checkpoint(checkpoint),
    }
}

fn run_simulation(
    config_path: PathBuf,
    density_path: Option<PathBuf>,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };

    // Load or synthesize the density map
    let density = match &density_path {
        Some(path) => {
            println!("Loading density map from: {:?}", path);
            DensityField::load_json(path)?
        }
        None => config.map.build(config.grid.shape)?,
    };

    std::fs::create_dir_all(&output)?;

    let mut colony = match seed {
        Some(s) => {
            println!("Using seed: {}", s);
            Colony::new_with_seed(config.clone(), density, s)?
        }
        None => Colony::new(config.clone(), density)?,
    };

    println!("Starting simulation");
    println!("  Grid: {:?}", config.grid.shape);
    println!("  Start: {}  Goal: {}", config.start(), config.goal());
    println!(
        "  Rounds: {} x {} ants x {} ticks",
        config.colony.rounds, config.colony.ants_per_round, config.colony.ticks_per_round
    );
    println!();

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        config.logging.checkpoint_interval,
        10, // Keep last 10 checkpoints
    );

    let start = Instant::now();

    while colony.round < config.colony.rounds {
        if let Err(e) = colony.run_round() {
            log::error!("simulation aborted: {}", e);
            return Err(e.into());
        }

        if !quiet {
            println!("{}", colony.stats.summary());
        }

        if checkpoint_mgr.should_save(colony.time) {
            let checkpoint = colony.create_checkpoint();
            match checkpoint_mgr.save(&checkpoint) {
                Ok(path) => {
                    if !quiet {
                        println!("  Checkpoint saved: {}", path);
                    }
                }
                Err(e) => eprintln!("  Checkpoint error: {}", e),
            }
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Ticks: {}", colony.time);
    println!("Speed: {:.1} ticks/s", colony.time as f64 / elapsed.as_secs_f64());
    println!("Population: {}", colony.population());
    println!("Valid paths: {}", colony.valid_count());

    report_best(&colony);

    // Final checkpoint
    let final_checkpoint = colony.create_checkpoint();
    let final_path = output.join("checkpoint_final.bin");
    final_checkpoint.save(&final_path)?;
    println!("Final checkpoint: {:?}", final_path);

    // Save stats history
    let stats_path = output.join("stats_history.json");
    colony.stats_history.save(stats_path.to_string_lossy().as_ref())?;
    println!("Stats history: {:?}", stats_path);

    Ok(())
}

fn resume_simulation(
    checkpoint_path: PathBuf,
    rounds: u32,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading checkpoint: {:?}", checkpoint_path);

    let checkpoint = Checkpoint::load(&checkpoint_path)?;
    let mut colony = Colony::from_checkpoint(checkpoint);

    println!("Resumed at tick {} (round {})", colony.time, colony.round);
    println!("Population: {}", colony.population());
    println!("Running {} additional rounds", rounds);
    println!();

    std::fs::create_dir_all(&output)?;

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        colony.config.logging.checkpoint_interval,
        10,
    );

    let target = colony.round + rounds;
    colony.config.colony.rounds = colony.config.colony.rounds.max(target);

    let start = Instant::now();

    while colony.round < target {
        colony.run_round()?;
        println!("{}", colony.stats.summary());

        if checkpoint_mgr.should_save(colony.time) {
            let checkpoint = colony.create_checkpoint();
            if let Ok(path) = checkpoint_mgr.save(&checkpoint) {
                println!("  Checkpoint: {}", path);
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("=== Resume Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Final tick: {}", colony.time);
    println!("Population: {}", colony.population());

    report_best(&colony);

    Ok(())
}

fn report_best(colony: &Colony) {
    println!();
    match colony.best_solution() {
        Ok(solution) => {
            println!("Best path found:");
            println!("  {}", solution);
        }
        Err(SimError::NoSolutionFound) => {
            println!("No valid path found.");
        }
        Err(e) => println!("Reporting failed: {}", e),
    }
}

fn run_benchmark(rounds: u32, ants: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== pherotrace Benchmark ===");
    println!("Rounds: {}", rounds);
    println!("Ants per round: {}", ants);
    println!();

    let result = benchmark(rounds, ants)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn analyze_checkpoint(checkpoint_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint Analysis ===");
    println!("File: {:?}", checkpoint_path);
    println!();

    let checkpoint = Checkpoint::load(&checkpoint_path)?;

    println!("Tick: {}", checkpoint.time);
    println!("Round: {}", checkpoint.round);
    println!("Population: {}", checkpoint.ants.len());
    println!();

    let alive = checkpoint.ants.iter().filter(|a| a.is_alive()).count();
    let valid: Vec<_> = checkpoint.ants.iter().filter(|a| a.is_valid()).collect();
    println!("Alive ants: {}", alive);
    println!("Valid paths: {}", valid.len());

    let mut best: Option<&pherotrace::Ant> = None;
    for &ant in &valid {
        if best.map_or(true, |b| ant.score > b.score) {
            best = Some(ant);
        }
    }
    if let Some(best) = best {
        println!("Best score: {:.4}", best.score);
        println!("{}", best);
    }

    println!();
    println!(
        "Checkpoint size: {:.2} MB",
        checkpoint.size_bytes() as f64 / 1_000_000.0
    );

    Ok(())
}
