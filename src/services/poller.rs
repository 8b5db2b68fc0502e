//! Background thread that runs fetch cycles on a timer.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use crate::app::FetchEvent;
use crate::config::Config;
use crate::data::CycleId;

use super::fetch::{CycleSummary, FetchOrchestrator};
use super::github::GitHubClient;

/// Progress reported from the poller thread to the UI thread.
#[derive(Debug)]
pub enum PollerUpdate {
    CycleStarted(CycleId),
    Event(FetchEvent),
    CycleFinished(CycleSummary),
}

/// UI-side end of the poller: refresh requests go out, updates come back.
pub struct PollerHandle {
    refresh_tx: UnboundedSender<()>,
    update_rx: Receiver<PollerUpdate>,
}

impl PollerHandle {
    /// Ask for a cycle now. Returns false when the poller has stopped.
    pub fn request_refresh(&self) -> bool {
        self.refresh_tx.send(()).is_ok()
    }

    pub fn try_next(&self) -> Option<PollerUpdate> {
        self.update_rx.try_recv().ok()
    }
}

/// Start polling on a dedicated thread with a single-threaded runtime.
///
/// The first cycle starts immediately; later cycles run every
/// `config.refresh_interval` or on request. Cycles never overlap.
pub fn spawn_poller(config: Config) -> PollerHandle {
    let (refresh_tx, refresh_rx) = unbounded_channel::<()>();
    let (update_tx, update_rx) = mpsc::channel::<PollerUpdate>();

    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "failed to start poller runtime");
                let _ = update_tx.send(failure(format!("Failed to start fetcher: {e}")));
                return;
            }
        };
        runtime.block_on(poll_loop(config, refresh_rx, update_tx));
    });

    PollerHandle {
        refresh_tx,
        update_rx,
    }
}

async fn poll_loop(
    config: Config,
    mut refresh_rx: UnboundedReceiver<()>,
    update_tx: Sender<PollerUpdate>,
) {
    let client = match GitHubClient::new(&config.token, &config.api_base, config.request_timeout)
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build GitHub client");
            let _ = update_tx.send(failure(e.to_string()));
            return;
        }
    };
    let mut orchestrator = FetchOrchestrator::from_config(client, &config);

    let mut ticker = tokio::time::interval(config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            request = refresh_rx.recv() => {
                if request.is_none() {
                    break;
                }
                // Collapse refresh requests queued while the last cycle ran.
                while refresh_rx.try_recv().is_ok() {}
                ticker.reset();
            }
        }

        let next = orchestrator.last_cycle().next();
        if update_tx.send(PollerUpdate::CycleStarted(next)).is_err() {
            break;
        }

        let summary = orchestrator
            .run_cycle(|event| {
                let _ = update_tx.send(PollerUpdate::Event(event));
            })
            .await;

        if update_tx.send(PollerUpdate::CycleFinished(summary)).is_err() {
            break;
        }
    }

    debug!("poller stopped");
}

fn failure(error: String) -> PollerUpdate {
    PollerUpdate::Event(FetchEvent::FetchFailed {
        cycle: CycleId::default(),
        repo: None,
        error,
    })
}
