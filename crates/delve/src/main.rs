//! # Delve
//!
//! Command line front end for the tunnel carver.
//!
//! ```bash
//! # Create a 64^3 layered world with grass at y = 40
//! delve init world.dlv
//!
//! # Carve the player tunnel plus four random tunnels, reproducibly
//! delve carve world.dlv --tunnels 4 --seed 12345
//!
//! # Walk-by-walk trace
//! delve -v carve world.dlv --config delve.toml
//! ```
//!
//! Logs go to stderr and honour `RUST_LOG`; the run summary goes to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use delve_procedural::{
    Block, CarveConfig, CarveError, ConfigError, Coord, Excavation, GridBounds, Spawn,
    TracingObserver, VoxelWorld, WalkKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "delve", version, about = "Carve tunnel networks into voxel worlds", long_about = None)]
struct Cli {
    /// Verbose output
    ///
    /// When specified, logs every walk step at debug level and ignores the
    /// `RUST_LOG` environment variable.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a layered world with the spawn at the surface centre
    Init {
        /// World file to create
        world: PathBuf,

        /// Size along x
        #[arg(long, default_value_t = 64)]
        width: u16,

        /// Size along y
        #[arg(long, default_value_t = 64)]
        height: u16,

        /// Size along z
        #[arg(long, default_value_t = 64)]
        depth: u16,

        /// Height of the grass layer
        #[arg(long, default_value_t = 40)]
        surface: u16,
    },

    /// Carve tunnels into a world file in place
    Carve {
        /// World file to modify
        world: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Extra tunnels at random columns
        #[arg(long)]
        tunnels: Option<u32>,

        /// Tube walks at random columns
        #[arg(long)]
        tubes: Option<u32>,

        /// RNG seed (default: derived from the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the tunnel in front of the player
        #[arg(long, default_value_t = false)]
        no_player_tunnel: bool,
    },
}

/// Everything that can end a run early.
#[derive(Error, Debug)]
enum CliError {
    #[error("world file {path}: {source}")]
    World {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Carve(#[from] CarveError),

    #[error("invalid world size: {0}")]
    Size(String),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()))
}

fn world_error(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::World {
        path: path.to_path_buf(),
        source,
    }
}

fn init(path: &Path, width: u16, height: u16, depth: u16, surface: u16) -> Result<(), CliError> {
    if width == 0 || height == 0 || depth == 0 {
        return Err(CliError::Size(format!("{width}x{height}x{depth} has an empty axis")));
    }
    if surface == 0 || surface >= height {
        return Err(CliError::Size(format!(
            "surface {surface} must lie strictly between 0 and height {height}"
        )));
    }

    let bounds = GridBounds::from_size(i32::from(width), i32::from(height), i32::from(depth));
    let spawn = Spawn {
        position: [
            f64::from(width / 2),
            f64::from(surface) + 1.0,
            f64::from(depth / 2),
        ],
        yaw_degrees: 0.0,
    };
    let world = VoxelWorld::layered(bounds, i32::from(surface)).with_spawn(spawn);
    let bytes = world.save(path).map_err(world_error(path))?;

    println!("Created {} ({width}x{height}x{depth}, {bytes} bytes)", path.display());
    println!(
        "  Spawn: ({}, {}, {})",
        spawn.position[0], spawn.position[1], spawn.position[2]
    );
    Ok(())
}

fn carve(
    path: &Path,
    config_path: Option<&Path>,
    tunnels: Option<u32>,
    tubes: Option<u32>,
    seed: Option<u64>,
    no_player_tunnel: bool,
) -> Result<(), CliError> {
    let mut config = match config_path {
        Some(p) => CarveConfig::load(p)?,
        None => CarveConfig::default(),
    };
    if let Some(n) = tunnels {
        config.tunnels = n;
    }
    if let Some(n) = tubes {
        config.tubes = n;
    }
    if no_player_tunnel {
        config.player_tunnel = false;
    }
    let seed = seed.or(config.seed).unwrap_or_else(clock_seed);
    config.seed = Some(seed);
    config.validate()?;
    tracing::info!("Using seed {}", seed);

    let mut world = VoxelWorld::load(path).map_err(world_error(path))?;
    let spawn = world.spawn;
    let air_before = world.count(Block::is_air);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report =
        Excavation::new(&config).run(&mut world, spawn.as_ref(), &mut rng, &mut TracingObserver)?;

    let air_after = world.count(Block::is_air);
    world.save(path).map_err(world_error(path))?;

    println!("Carved {} (seed {seed})", path.display());
    for record in &report.walks {
        let Coord { x, y, z } = record.start.origin;
        println!(
            "  {:<6} ({x}, {y}, {z}) @ {:>3.0} deg: {} after {} blocks, {} branches",
            format!("{:?}", record.kind),
            record.start.yaw.to_degrees(),
            record.outcome.reason,
            record.outcome.length,
            record.outcome.branch_count()
        );
    }
    println!(
        "  Walks: {} player, {} tunnel, {} tube ({} skipped)",
        report.count(WalkKind::Player),
        report.count(WalkKind::Tunnel),
        report.count(WalkKind::Tube),
        report.skipped
    );
    println!(
        "  Total length: {}, branches: {}, air blocks: {} -> {}",
        report.total_length(),
        report.branch_count(),
        air_before,
        air_after
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Init {
            world,
            width,
            height,
            depth,
            surface,
        } => init(&world, width, height, depth, surface),
        Command::Carve {
            world,
            config,
            tunnels,
            tubes,
            seed,
            no_player_tunnel,
        } => carve(&world, config.as_deref(), tunnels, tubes, seed, no_player_tunnel),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
