//! Engine binary for the Colony simulation.
//!
//! Wires the tick loop to a generated starting world, a seeded set of
//! workers, and a player's opening orders, then runs until the tick limit
//! or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`colony-config.yaml`, or the path given as the
//!    first argument)
//! 2. Initialize structured logging (tracing), text or JSON
//! 3. Create the starting world
//! 4. Spawn the initial workers
//! 5. Assemble the simulation state and register the job ledger
//! 6. Queue the opening orders
//! 7. Run the simulation loop
//! 8. Log the result

mod colony_callback;
mod error;
mod ledger;
mod orders;
mod spawner;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use colony_core::config::{LoggingConfig, SimulationConfig};
use colony_core::control::RunControl;
use colony_core::runner;
use colony_core::tick::SimulationState;
use colony_core::world::ColonyWorld;
use colony_jobs::{JobListener, JobManagerListener};
use colony_types::PlayerId;
use colony_world::{StartingWorldParams, create_starting_world};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::colony_callback::ColonyCallback;
use crate::ledger::JobLedger;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "colony-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = SimulationConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        colony = %config.world.name,
        seed = config.world.seed,
        path = %config_path.display(),
        "colony-engine starting"
    );

    // 3. Create the starting world.
    let owner = PlayerId::new();
    let start = create_starting_world(StartingWorldParams {
        width: config.world.width,
        height: config.world.height,
        crop_growth_ticks: config.world.crop_growth_ticks,
        owner,
    })
    .context("creating starting world")?;

    // 4. Spawn the initial workers.
    let mut world = ColonyWorld::from_starting(start.clone(), config.workers.clone());
    let spawned = spawner::spawn_initial_workers(
        &mut world.roster,
        owner,
        start.spawn_area,
        config.world.initial_workers,
        config.world.seed,
    )?;
    info!(workers = ?spawned.names, "colonists arrived");

    // 5. Assemble simulation state.
    let opening = orders::initial_orders(&start, &world.roster)?;
    let mut state = SimulationState::from_config(&config, world)?;
    state.add_player(owner);
    let ledger = Arc::new(JobLedger::new());
    if let Some(manager) = state.manager(owner) {
        manager.add_listener(Arc::clone(&ledger) as Arc<dyn JobManagerListener>);
        manager.add_job_listener(Arc::clone(&ledger) as Arc<dyn JobListener>);
    }

    // 6. Queue the opening orders and wire up Ctrl-C.
    let control = Arc::new(RunControl::from_bounds(&config.simulation));
    for order in opening {
        control.queue_command(owner, order).await;
    }
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    // 7. Run the simulation.
    let mut callback = ColonyCallback::new(
        Arc::clone(&ledger),
        config.logging.summary_interval_ticks,
    );
    let result = runner::run_simulation(&mut state, &control, &mut callback).await?;

    // 8. Log results.
    runner::log_simulation_end(&result);
    let totals = ledger.totals();
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        jobs_completed = totals.completed,
        jobs_interrupted = totals.interrupted,
        open_jobs = ledger.board().len(),
        "colony-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
