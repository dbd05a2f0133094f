use anyhow::Context;
use clap::Parser;
use generator::scenario::{build_intake, ScenarioConfig};
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::DashboardModel;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Rust-facing FastLane dispatch workflow driver")]
struct Args {
    /// Run a single scripted emergency wave offline and emit a baseline summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Use the simulation-mode presets (20-minute golden hour, lighter traffic)
    #[arg(long, default_value_t = false)]
    simulation_mode: bool,
    /// Nominal travel speed in km/h
    #[arg(long)]
    speed_kmh: Option<f64>,
    /// Traffic inefficiency multiplier applied to the ideal travel time
    #[arg(long)]
    inefficiency: Option<f64>,
    /// Seed for scenario selection and unit assignment
    #[arg(long)]
    seed: Option<u64>,
    /// Keep the GUI bridge alive for incoming triage and SOS requests
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.simulation_mode,
            args.speed_kmh,
            args.inefficiency,
            args.seed,
        )
    };

    log::info!(
        "workflow config ready: simulation_mode={}, speed {} km/h, factor {}",
        workflow_config.simulation_mode,
        workflow_config.nominal_speed_kmh,
        workflow_config.inefficiency_factor
    );

    let runner = Runner::new(workflow_config.clone());
    let gui_bridge = GuiBridge::new(Arc::new(runner.clone()));

    if args.offline {
        let scenario = ScenarioConfig {
            seed: workflow_config.seed,
            ..Default::default()
        };
        let intake = build_intake(&scenario)?;
        let result = runner.execute(&intake)?;

        println!(
            "Offline run -> triage {}, unit {}, ETA {}s, distance {:.2} km, efficiency {}%",
            result.handoff.overall(),
            result.assigned.unit_id,
            result.assigned.eta_seconds,
            result.estimate.distance_km,
            result.estimate.efficiency_percent
        );

        let model = DashboardModel::from_result(&result, runner.metrics());
        gui_bridge.publish(&model)?;
        gui_bridge.publish_status("Offline dispatch results ready.");

        let report = format!(
            "overall={} unit={} eta_s={} golden_s={} distance_km={:.2} efficiency={}% escalated={}\n",
            result.handoff.overall(),
            result.assigned.unit_id,
            result.assigned.eta_seconds,
            result.assigned.golden_hour_seconds,
            result.estimate.distance_km,
            result.estimate.efficiency_percent,
            result.escalated
        );
        let report_path = PathBuf::from("tools/data/offline_dispatch.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
