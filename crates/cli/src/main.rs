use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use tracing::info;

use vfh_sim::{run, SimConfig};

/// Exit codes: 0 success, 1 bad arguments, 2 config parse failure,
/// 3 no valid agents configured.
#[derive(Parser)]
#[command(name = "vfh", about = "VFH obstacle-avoidance simulation")]
struct Cli {
    /// Path to the TOML run configuration.
    config: PathBuf,
}

fn main() {
    init_tracing();

    let cli = Cli::try_parse().unwrap_or_else(|err| {
        eprintln!("{err}");
        exit(1);
    });

    let config = match SimConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load {}: {}", cli.config.display(), err);
            exit(2);
        }
    };

    if config.agents.is_empty() {
        eprintln!("no valid agents configured in {}", cli.config.display());
        exit(3);
    }

    info!(
        agents = config.agents.len(),
        obstacles = config.obstacles.len(),
        ticks = config.world.ticks,
        "starting run"
    );

    let report = run(&config);

    println!("=== Run Report ===");
    println!(
        "Ticks: {} ({:.1}s simulated)",
        report.ticks,
        report.ticks as f32 * config.world.dt
    );
    for agent in &report.agents {
        let goal = match agent.goal_reached {
            Some(true) => "goal reached",
            Some(false) => "goal not reached",
            None => "no goal",
        };
        println!(
            "  {}: position ({:.2}, {:.2}), {}",
            agent.name, agent.position.x, agent.position.y, goal
        );
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
