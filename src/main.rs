//! Habitat Controller Firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │     EspBoard (Sensor + Actuator + Time)    LogEventSink        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌──────────────┐   ObservationStore   ┌──────────────────┐    │
//! │  │ sampling ×N  │ ───────────────────▶ │ heat lamp        │    │
//! │  │ (thresholds) │                      │ indicators       │    │
//! │  │              │ ─── WakeSignal ────▶ │ motor            │    │
//! │  └──────────────┘                      │ motion alarm     │    │
//! │                                        └──────────────────┘    │
//! │        TaskGraph (per Variant) · spawn_graph (orchestrator)    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{error, info, warn};

use habitat::adapters::hardware::EspBoard;
use habitat::adapters::log_sink::LogEventSink;
use habitat::app::graph::TaskGraph;
use habitat::app::orchestrator::spawn_graph;
use habitat::config::ControllerConfig;
use habitat::drivers::hw_init;

/// Optional JSON override baked in at build time, e.g.
/// `HABITAT_CONFIG='{"variant":"Motor"}' cargo build`.
const CONFIG_OVERRIDE: Option<&str> = option_env!("HABITAT_CONFIG");

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Habitat v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = match CONFIG_OVERRIDE {
        Some(json) => ControllerConfig::from_json(json).context("HABITAT_CONFIG")?,
        None => {
            let c = ControllerConfig::default();
            c.validate().context("default config")?;
            c
        }
    };
    let graph = TaskGraph::from_config(&config).context("task graph")?;
    info!(
        "Variant {:?}: {} sensors, {} actuators",
        graph.variant,
        graph.sensors.len(),
        graph.actuators.len()
    );

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        return Err(e).context("peripheral init");
    }

    // ── 4. Tasks ──────────────────────────────────────────────
    let running = spawn_graph(&graph, EspBoard::new(), LogEventSink::new()).map_err(|e| {
        error!("Startup aborted: {}", e);
        e
    })?;
    info!("System ready.");

    // Tasks never return; reaching the end of a join means one died.
    for handle in running.handles {
        let name = handle.thread().name().unwrap_or("?").to_owned();
        match handle.join() {
            Ok(()) => warn!("task '{}' exited", name),
            Err(_) => warn!("task '{}' panicked", name),
        }
    }
    Ok(())
}
