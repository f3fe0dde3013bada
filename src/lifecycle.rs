//! Starting and stopping the watch loop.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::watcher::Watcher;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Longest accepted poll interval (one week). Longer values are clamped.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Shortest poll interval the timer accepts. Shorter values are clamped.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Lifecycle phase of a watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, loop not started
    Idle,
    /// Loop active, cycles firing
    Running,
    /// Terminal, no further cycles
    Stopped,
}

/// When the first cycle runs after start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstCycle {
    /// Wait one poll interval
    #[default]
    AfterInterval,
    /// Run a cycle right away
    Immediately,
}

/// Handle to a running watcher.
///
/// Dropping the handle cancels the loop without waiting for it.
pub struct WatcherHandle {
    cancel: CancellationToken,
    triggers: mpsc::Sender<()>,
    phase: watch::Receiver<Phase>,
    task: Option<JoinHandle<Watcher>>,
}

impl Watcher {
    /// Moves the watcher into a single background task that runs a cycle every
    /// `poll_interval` until the returned handle is stopped.
    pub fn start(self, poll_interval: Duration, first_cycle: FirstCycle) -> WatcherHandle {
        self.start_with_token(poll_interval, first_cycle, CancellationToken::new())
    }

    /// Like [`Watcher::start`], stopping when `cancel` (or a parent token) is cancelled
    pub fn start_with_token(
        self,
        poll_interval: Duration,
        first_cycle: FirstCycle,
        cancel: CancellationToken,
    ) -> WatcherHandle {
        // Capacity one: at most one pending trigger, extras coalesce
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (phase_tx, phase_rx) = watch::channel(Phase::Running);

        ::log::info!(
            "Watching {} every {:?}",
            self.target(),
            poll_interval
        );

        let task = tokio::spawn(run_loop(
            self,
            poll_interval,
            first_cycle,
            trigger_rx,
            cancel.clone(),
            phase_tx,
        ));

        WatcherHandle {
            cancel,
            triggers: trigger_tx,
            phase: phase_rx,
            task: Some(task),
        }
    }

    /// Phase of a watcher that has not been started
    pub fn phase(&self) -> Phase {
        Phase::Idle
    }
}

impl WatcherHandle {
    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Requests a cycle as soon as the current one (if any) completes.
    ///
    /// Returns false when a trigger is already pending or the loop has stopped.
    pub fn trigger(&self) -> bool {
        self.triggers.try_send(()).is_ok()
    }

    /// Receiver that observes phase changes
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.clone()
    }

    /// Token that stops the loop when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops scheduling new cycles, lets an in-flight cycle finish, releases the
    /// collaborators' resources and hands the watcher back in its final state.
    ///
    /// Returns `None` if the loop task panicked.
    pub async fn stop(mut self) -> Option<Watcher> {
        self.cancel.cancel();
        let task = self.task.take()?;
        match task.await {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                ::log::error!("Watch loop terminated abnormally: {}", e);
                None
            }
        }
    }

    /// Waits for the loop to end on its own (external cancellation)
    pub async fn join(mut self) -> Option<Watcher> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The single worker: waits for a tick, a trigger, or cancellation, then runs
/// the cycle inline. Cycles cannot overlap because nothing else owns the watcher.
async fn run_loop(
    mut watcher: Watcher,
    poll_interval: Duration,
    first_cycle: FirstCycle,
    mut triggers: mpsc::Receiver<()>,
    cancel: CancellationToken,
    phase: watch::Sender<Phase>,
) -> Watcher {
    // Publishes Stopped on every exit, including a panicking cycle
    let _phase = StoppedOnDrop(phase);

    let poll_interval = poll_interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL);
    let now = Instant::now();
    let first_tick = match first_cycle {
        FirstCycle::Immediately => now,
        FirstCycle::AfterInterval => now.checked_add(poll_interval).unwrap_or(now),
    };
    let mut ticker = tokio::time::interval_at(first_tick, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                ::log::trace!("Poll timer fired");
            }
            Some(()) = triggers.recv() => {
                ::log::debug!("Manual trigger received");
            }
        }

        let outcome = watcher.run_cycle().await;
        ::log::debug!("Cycle {} finished: {:?}", watcher.cycles(), outcome);
    }

    ::log::info!("Stopping watcher for {}", watcher.target());
    watcher.close().await;

    watcher
}

struct StoppedOnDrop(watch::Sender<Phase>);

impl Drop for StoppedOnDrop {
    fn drop(&mut self) {
        self.0.send_replace(Phase::Stopped);
    }
}

/// Resolves on SIGINT or SIGTERM (Ctrl-C only on non-unix platforms)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::log::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                ::log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    ::log::info!("Received shutdown signal, stopping");
}
