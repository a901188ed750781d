use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dodgecoin_input::InputScript;
use dodgecoin_play::{DEFAULT_FRAME_SECS, LevelConfig, Session};
use dodgecoin_stream::{GridCoord, LevelScene, RoomGridStreamer};
use dodgecoin_tools::{LevelInspector, LevelSummary, RoomInfo};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dodgecoin-cli", about = "CLI tool for dodgecoin levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the default level configuration as YAML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generate one neighborhood and print it
    Generate {
        /// Level configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Center cell, as `col,row`
        #[arg(long, default_value = "0,0", allow_hyphen_values = true)]
        center: GridCoord,
        /// Override the window radius
        #[arg(short, long)]
        radius: Option<u32>,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print JSON instead of a map
        #[arg(long)]
        json: bool,
    },
    /// Play a scripted headless session and report what happened
    Walk {
        /// Level configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Input script, e.g. "start right:120 down:60"
        #[arg(long, default_value = "start right:120 down:60")]
        script: String,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Seconds per frame
        #[arg(long, default_value_t = DEFAULT_FRAME_SECS)]
        dt: f32,
    },
}

#[derive(Serialize)]
struct GenerateReport {
    summary: LevelSummary,
    rooms: Vec<RoomInfo>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("dodgecoin-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: frame={}", LevelScene::new().frame());
            println!("stream: {}", dodgecoin_stream::crate_info());
            println!("input: {}", dodgecoin_input::crate_info());
            println!("play: {}", dodgecoin_play::crate_info());
            println!("tools: {}", dodgecoin_tools::crate_info());
        }
        Commands::Config { out } => {
            let config = LevelConfig::default();
            match out {
                Some(path) => {
                    config
                        .save(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{}", config.to_yaml_string()?),
            }
        }
        Commands::Generate {
            config,
            center,
            radius,
            seed,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(radius) = radius {
                config.stream.radius = radius;
            }
            let mut streamer = RoomGridStreamer::new(config.stream, config.archetypes)
                .context("invalid level configuration")?;
            let mut scene = LevelScene::new();
            let mut rng = StdRng::seed_from_u64(seed);
            streamer
                .generate(&mut scene, center, &mut rng)
                .with_context(|| format!("generating around {center}"))?;

            let summary = LevelInspector::summary(&scene, &streamer);
            if json {
                let rooms = LevelInspector::list_rooms(&scene)
                    .into_iter()
                    .flat_map(|id| LevelInspector::inspect_room(&scene, id))
                    .collect();
                let report = GenerateReport { summary, rooms };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{summary}");
                print!("{}", LevelInspector::ascii_map(&scene, &streamer, None));
            }
        }
        Commands::Walk {
            config,
            script,
            seed,
            dt,
        } => {
            let config = load_config(config.as_deref())?;
            let script = InputScript::parse(&script).context("parsing input script")?;
            let mut session = Session::new(config, seed).context("starting session")?;

            println!(
                "Walk: seed={seed}, frames={}, dt={dt:.4}",
                script.frame_count()
            );
            let log = session.run_script(&script, dt)?;
            for entry in &log {
                println!("  frame {:>5}: {:?}", entry.frame, entry.event);
            }

            let cell = session.streamer().cell_size();
            let player = GridCoord::from_position(session.player().position(), cell);
            println!(
                "State: {:?}, survived {:.1}s, player at {player}",
                session.state(),
                session.survived_secs()
            );
            println!("{}", LevelInspector::summary(session.scene(), session.streamer()));
            let counters = session.scene_counters();
            println!(
                "Scene nodes: {} added, {} freed, {} live",
                counters.added,
                counters.freed,
                counters.live()
            );
            print!(
                "{}",
                LevelInspector::ascii_map(session.scene(), session.streamer(), Some(player))
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LevelConfig> {
    tracing::debug!(path = ?path, "loading level config");
    match path {
        Some(path) => LevelConfig::load(path)
            .with_context(|| format!("loading level config {}", path.display())),
        None => Ok(LevelConfig::default()),
    }
}
