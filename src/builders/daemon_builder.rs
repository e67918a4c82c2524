//! Builders to construct the daemon from configuration.

use std::sync::Arc;

use crate::config::DaemonConfig;
use crate::core::{
    shared_sink, Action, CommandAction, FileEventSink, PendingSet, RtcnError, Scheduler,
    SharedEventSink,
};
use crate::ingress::{HostnameValidator, Ingress};
use crate::runtime::Daemon;

/// Build the daemon with the configured command and log file.
///
/// # Errors
///
/// Returns an error when the configuration is invalid or the log file
/// cannot be opened.
pub fn build_daemon(cfg: &DaemonConfig) -> Result<Daemon<CommandAction>, RtcnError> {
    cfg.validate()?;
    let action = CommandAction::from_descriptor(&cfg.ncm_command)?.with_timeout(cfg.action_timeout());
    let sink = shared_sink(FileEventSink::open(&cfg.log_path)?);
    build_daemon_with(cfg, action, sink)
}

/// Build the daemon around a caller-supplied action and event sink.
///
/// One pending set is created and shared by the ingress and the scheduler.
///
/// # Errors
///
/// Returns [`RtcnError::Config`] when the configuration is invalid.
pub fn build_daemon_with<A: Action>(
    cfg: &DaemonConfig,
    action: A,
    sink: SharedEventSink,
) -> Result<Daemon<A>, RtcnError> {
    cfg.validate()?;

    let pending = Arc::new(PendingSet::new());
    let validator = if cfg.hostname_full_match {
        HostnameValidator::full_match(&cfg.hostname_format)?
    } else {
        HostnameValidator::new(&cfg.hostname_format)?
    };
    let ingress = Ingress::new(Arc::clone(&pending), validator, Arc::clone(&sink));
    let scheduler =
        Scheduler::new(cfg.interval(), pending, action, sink).with_join(cfg.join.clone());

    tracing::debug!(
        "built daemon: interval {:?}, bind {}",
        cfg.interval(),
        cfg.bind_addr
    );
    Ok(Daemon::new(cfg.bind_addr.clone(), ingress, scheduler))
}
