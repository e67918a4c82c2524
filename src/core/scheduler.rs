//! Periodic drain-and-trigger loop.
//!
//! One scheduler task runs for the lifetime of the daemon. It sleeps for the
//! configured interval, drains the pending set and, when anything was
//! pending, runs the action once with the whole batch. Failures are logged
//! and never retried; the drained hosts are not put back.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::action::{Action, ActionReport};
use super::batch::{Batch, JoinStrategy};
use super::event_log::{build_log_event, EventKind, SharedEventSink};
use super::pending_set::PendingSet;
use super::RtcnError;

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Sleeping until the next cycle.
    Waiting,
    /// Running the action for a drained batch.
    Triggering,
    /// `run` has returned.
    Stopped,
}

impl SchedulerState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Waiting,
            1 => Self::Triggering,
            _ => Self::Stopped,
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            Self::Waiting => 0,
            Self::Triggering => 1,
            Self::Stopped => 2,
        }
    }
}

/// What a single cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Nothing was pending.
    Idle,
    /// A batch was drained and the action ran.
    Triggered {
        /// Hosts drained for this cycle.
        batch: Batch,
        /// Argument the action was invoked with.
        argument: String,
        /// Action result; errors are already logged.
        result: Result<ActionReport, RtcnError>,
    },
}

impl CycleOutcome {
    /// Whether the action ran.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

/// Single periodic driver of the trigger cycle.
pub struct Scheduler<A> {
    interval: Duration,
    join: JoinStrategy,
    pending: Arc<PendingSet>,
    action: A,
    sink: SharedEventSink,
    state: AtomicU8,
    triggered: AtomicU64,
}

impl<A: Action> Scheduler<A> {
    /// Create a scheduler draining `pending` every `interval`.
    pub fn new(
        interval: Duration,
        pending: Arc<PendingSet>,
        action: A,
        sink: SharedEventSink,
    ) -> Self {
        Self {
            interval,
            join: JoinStrategy::default(),
            pending,
            action,
            sink,
            state: AtomicU8::new(SchedulerState::Waiting.as_u8()),
            triggered: AtomicU64::new(0),
        }
    }

    /// Use `join` to render batches.
    #[must_use]
    pub fn with_join(mut self, join: JoinStrategy) -> Self {
        self.join = join;
        self
    }

    /// Configured interval.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Number of cycles that ran the action, successful or not.
    pub fn triggered_cycles(&self) -> u64 {
        self.triggered.load(Ordering::Acquire)
    }

    /// The action this scheduler runs.
    pub const fn action(&self) -> &A {
        &self.action
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Run cycles until `shutdown` turns `true` or its sender is dropped.
    ///
    /// Shutdown interrupts either the sleep or a running action; an action
    /// interrupted this way is killed and its batch is logged as failed.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "scheduler started: interval {:?}, action `{}`",
            self.interval,
            self.action.describe()
        );
        loop {
            self.set_state(SchedulerState::Waiting);
            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                () = shutdown_signalled(&mut shutdown) => break,
            }
            let Some(batch) = self.drain() else {
                continue;
            };
            let argument = self.join.render(&batch);
            let size = batch.len();
            // Poll the trigger first so its start line precedes any interruption.
            tokio::select! {
                biased;
                _ = self.trigger(batch, argument.clone()) => {}
                () = shutdown_signalled(&mut shutdown) => {
                    let command = self.action.describe();
                    warn!("`{}` interrupted by shutdown for {}", command, argument);
                    self.record(
                        EventKind::ActionFailed,
                        format!(
                            "{command} interrupted by shutdown for {argument} ({size} host(s))"
                        ),
                    );
                    break;
                }
            }
        }
        self.set_state(SchedulerState::Stopped);
        info!("scheduler stopped");
    }

    /// Drain the pending set once and run the action if anything was pending.
    pub async fn run_cycle(&self) -> CycleOutcome {
        match self.drain() {
            Some(batch) => {
                let argument = self.join.render(&batch);
                self.trigger(batch, argument).await
            }
            None => CycleOutcome::Idle,
        }
    }

    fn drain(&self) -> Option<Batch> {
        let batch = self.pending.drain_if_non_empty();
        if batch.is_none() {
            debug!("no pending hosts, skipping cycle");
        }
        batch
    }

    async fn trigger(&self, batch: Batch, argument: String) -> CycleOutcome {
        self.set_state(SchedulerState::Triggering);
        let cycle = self.triggered.fetch_add(1, Ordering::AcqRel) + 1;
        let command = self.action.describe();
        let size = batch.len();

        info!(cycle, batch_size = size, "running `{}` for {}", command, argument);
        self.record(
            EventKind::Triggered,
            format!(
                "possible changes to {argument} ({size} host(s)) during the last {:?}, running {command}",
                self.interval
            ),
        );

        let result = self.action.invoke(&argument).await;
        match &result {
            Ok(report) => {
                info!(cycle, "action finished in {:?}", report.duration);
                self.record(
                    EventKind::ActionSucceeded,
                    format!("{command} finished for {size} host(s) in {:?}", report.duration),
                );
            }
            Err(e) => {
                error!(cycle, "action failed: {}", e);
                self.record(
                    EventKind::ActionFailed,
                    format!("{command} failed for {argument} ({size} host(s)): {e}"),
                );
            }
        }

        self.set_state(SchedulerState::Waiting);
        CycleOutcome::Triggered {
            batch,
            argument,
            result,
        }
    }

    fn record(&self, kind: EventKind, message: String) {
        self.sink.lock().record(build_log_event(kind, message));
    }
}

/// Resolves once shutdown is requested or the sender is gone.
async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
