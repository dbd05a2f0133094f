use crate::gui_bridge::model::DashboardModel;
use crate::workflow::runner::Runner;
use anyhow::Result;
use fastlanecore::dispatch::ClockDriver;
use fastlanecore::handoff::LocationFix;
use fastlanecore::prelude::TriageInput;
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Emergency confirmation payload. The captured fix is optional; the
/// fallback coordinates substitute when it is absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SosRequest {
    location: Option<LocationFix>,
}

type SharedModel = Arc<RwLock<DashboardModel>>;
type ActiveDispatch = Arc<RwLock<Option<ClockDriver>>>;

/// Bridge that hosts the dashboard HTTP endpoints for the UI collaborator.
pub struct GuiBridge {
    state: SharedModel,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state: SharedModel = Arc::new(RwLock::new(DashboardModel::default()));
        let active: ActiveDispatch = Arc::new(RwLock::new(None));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let active_for_filter = active.clone();
        let active_filter = warp::any().map(move || active_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let dispatch_route = warp::path("dispatch")
            .and(warp::get())
            .and(state_filter.clone())
            .and(active_filter.clone())
            .map(|state: SharedModel, active: ActiveDispatch| {
                let mut model = state.read().unwrap().clone();
                if let Some(driver) = active.read().unwrap().as_ref() {
                    model.dispatch = Some(driver.latest());
                }
                warp::reply::json(&model)
            });

        let triage_route = warp::path("triage")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |input: TriageInput, state: SharedModel, runner: Arc<Runner>| async move {
                    match runner.assess(&input) {
                        Ok(assessment) => {
                            {
                                let mut guard = state.write().unwrap();
                                guard.apply_assessment(&assessment);
                                guard.metrics = runner.metrics();
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "severity": assessment.severity.label(),
                                    "escalate": assessment.escalate,
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("triage error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let sos_route = warp::path("sos")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(active_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |request: SosRequest,
                 state: SharedModel,
                 active: ActiveDispatch,
                 runner: Arc<Runner>| async move {
                    let severity = state.read().unwrap().overall();
                    match runner.begin_live(severity, request.location) {
                        Ok(driver) => {
                            let snapshot = driver.latest();
                            {
                                let mut guard = state.write().unwrap();
                                guard.dispatch = Some(snapshot.clone());
                                guard.status_line = "Dispatching nearest ambulance...".into();
                                guard.metrics = runner.metrics();
                            }
                            *active.write().unwrap() = Some(driver);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "unit": snapshot.unit_id,
                                    "eta_seconds": snapshot.eta_seconds,
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("sos error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let cancel_route = warp::path("cancel")
            .and(warp::post())
            .and(state_filter)
            .and(active_filter)
            .and(runner_filter)
            .map(|state: SharedModel, active: ActiveDispatch, runner: Arc<Runner>| {
                let latest = {
                    let guard = active.read().unwrap();
                    guard.as_ref().map(|driver| {
                        driver.cancel();
                        driver.latest()
                    })
                };
                let status = if latest.is_some() {
                    runner.record_cancellation();
                    "cancelled"
                } else {
                    "idle"
                };
                {
                    let mut guard = state.write().unwrap();
                    if let Some(snapshot) = latest {
                        guard.dispatch = Some(snapshot);
                    }
                    guard.status_line = "Dispatch cancelled".into();
                    guard.metrics = runner.metrics();
                }
                warp::reply::json(&json!({ "status": status }))
            });

        thread::spawn(move || {
            let routes = dispatch_route
                .or(triage_route)
                .or(sos_route)
                .or(cancel_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &DashboardModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[GUI] triage {} / sos alert {} / unit {}",
            guard.overall().label(),
            guard.sos_alert,
            guard
                .dispatch
                .as_ref()
                .map(|snapshot| snapshot.unit_id.as_str())
                .unwrap_or("none")
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> DashboardModel {
        self.state.read().unwrap().clone()
    }
}
