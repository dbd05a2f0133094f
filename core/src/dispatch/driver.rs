use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::dispatch::session::{DispatchSession, DispatchSnapshot, DispatchStatus};

#[derive(Clone, Copy)]
enum ClockKind {
    Eta,
    GoldenHour,
}

/// Drives the two independent one-second clocks of a dispatch session and
/// publishes a snapshot after every tick. Must be created inside a tokio
/// runtime; the tasks stop on their own once their clock is exhausted.
pub struct ClockDriver {
    session: Arc<Mutex<DispatchSession>>,
    sender: Arc<watch::Sender<DispatchSnapshot>>,
    updates: watch::Receiver<DispatchSnapshot>,
    tasks: Vec<JoinHandle<()>>,
}

impl ClockDriver {
    pub fn spawn(session: DispatchSession, tick: Duration) -> Self {
        let initial = session.snapshot();
        let session = Arc::new(Mutex::new(session));
        let (sender, updates) = watch::channel(initial);
        let sender = Arc::new(sender);

        let tasks = vec![
            tokio::spawn(run_clock(
                session.clone(),
                sender.clone(),
                tick,
                ClockKind::Eta,
            )),
            tokio::spawn(run_clock(
                session.clone(),
                sender.clone(),
                tick,
                ClockKind::GoldenHour,
            )),
        ];

        Self {
            session,
            sender,
            updates,
            tasks,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DispatchSnapshot> {
        self.updates.clone()
    }

    pub fn latest(&self) -> DispatchSnapshot {
        self.updates.borrow().clone()
    }

    /// Cancels the session and stops both clock tasks. No tick mutates the
    /// session after this returns. Idempotent.
    pub fn cancel(&self) {
        if let Ok(mut guard) = self.session.lock() {
            guard.cancel();
            let _ = self.sender.send(guard.snapshot());
        }
        for task in &self.tasks {
            task.abort();
        }
    }

    /// Resolves once the unit is en route or the session is cancelled.
    pub async fn wait_until_en_route(&self) -> DispatchSnapshot {
        let mut updates = self.updates.clone();
        loop {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.cancelled || snapshot.status == DispatchStatus::EnRoute {
                return snapshot;
            }
            if updates.changed().await.is_err() {
                return self.latest();
            }
        }
    }
}

async fn run_clock(
    session: Arc<Mutex<DispatchSession>>,
    sender: Arc<watch::Sender<DispatchSnapshot>>,
    tick: Duration,
    clock: ClockKind,
) {
    let mut interval = tokio::time::interval(tick);
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let mut guard = match session.lock() {
            Ok(guard) => guard,
            Err(_) => break,
        };
        if guard.cancelled() {
            break;
        }
        match clock {
            ClockKind::Eta => {
                guard.tick_eta();
            }
            ClockKind::GoldenHour => {
                guard.tick_golden_hour();
            }
        }
        let _ = sender.send(guard.snapshot());
        let finished = match clock {
            ClockKind::Eta => guard.eta_finished(),
            ClockKind::GoldenHour => guard.golden_hour_finished(),
        };
        if finished {
            break;
        }
    }
}
