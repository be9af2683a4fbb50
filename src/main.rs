//! AED Trainer host entry point
//!
//! Hexagonal architecture: the controller runs the scripted procedure and
//! talks only to port traits; the simulated panel implements them.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedPanel: PanelInputs · DisplayMirror · CuePlayer       │
//! │                  ScaledClock · LogEventSink                    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AedController (pure logic)                │    │
//! │  │  Context · SafetyMonitor · RhythmAnalyzer · Battery    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (battery drain) · PowerButton (long press)          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `aedsim [config.json] [scenario.json]`.  Without a scenario the
//! built-in demo runs.  `AEDSIM_MS_PER_SEC` sets how many wall-clock
//! milliseconds one simulated second takes (default 0, as fast as
//! possible); `RUST_LOG` sets the log filter.
#![deny(unused_must_use)]

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tracing_subscriber::EnvFilter;

use aedsim::adapters::panel::{PanelInputs, SimulatedPanel};
use aedsim::adapters::time::ScaledClock;
use aedsim::app::service::AedController;
use aedsim::config::DeviceConfig;
use aedsim::scenario::{Scenario, run_scenario};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    info!("╔══════════════════════════════════════╗");
    info!("║  AED Trainer v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config and scenario ────────────────────────────────
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => DeviceConfig::default(),
    };
    let scenario = match args.next() {
        Some(path) => load_scenario(Path::new(&path))?,
        None => Scenario::demo(),
    };

    let ms_per_sim_sec = match std::env::var("AEDSIM_MS_PER_SEC") {
        Ok(v) => v
            .parse::<u64>()
            .with_context(|| format!("AEDSIM_MS_PER_SEC is not a number: {v}"))?,
        Err(_) => 0,
    };

    // ── 3. Wire panel and controller ──────────────────────────
    let inputs = Arc::new(PanelInputs::default());
    let panel = SimulatedPanel::new(Arc::clone(&inputs), ScaledClock::new(ms_per_sim_sec));
    let mut controller = AedController::new(config, panel);

    // ── 4. Run ────────────────────────────────────────────────
    let report = run_scenario(&mut controller, &inputs, &scenario);

    let display = controller.hw().display();
    info!(
        "scenario done: {} steps, {} failed | state={} powered={} battery={}% shocks={} events={}",
        report.steps_run,
        report.failed_steps.len(),
        controller.state(),
        controller.is_powered(),
        controller.battery_level(),
        display.shock_count,
        controller.hw().events_emitted(),
    );
    if let Some(fault) = controller.last_fault() {
        info!("last fault: {fault}");
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<DeviceConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = DeviceConfig::from_json(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    Scenario::from_json(&text).with_context(|| format!("parsing scenario {}", path.display()))
}
