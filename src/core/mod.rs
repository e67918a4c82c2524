//! Pending-set accumulation and the periodic trigger cycle.

pub mod action;
pub mod batch;
pub mod error;
pub mod event_log;
pub mod pending_set;
pub mod scheduler;

pub use action::{Action, ActionReport, CommandAction};
pub use batch::{Batch, JoinStrategy};
pub use error::{AppResult, RtcnError};
pub use event_log::{
    build_log_event, shared_sink, EventKind, EventSink, FileEventSink, InMemoryEventReader,
    InMemoryEventSink, LogEvent, SharedEventSink,
};
pub use pending_set::{AddResult, PendingSet};
pub use scheduler::{CycleOutcome, Scheduler, SchedulerState};
