//! Tests for builder modules

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use rtcnd::builders::{build_daemon, build_daemon_with};
use rtcnd::config::DaemonConfig;
use rtcnd::core::{
    shared_sink, Action, ActionReport, InMemoryEventSink, RtcnError, SchedulerState,
};
use rtcnd::ingress::ReportOutcome;

struct NoopAction;

#[async_trait]
impl Action for NoopAction {
    async fn invoke(&self, _argument: &str) -> Result<ActionReport, RtcnError> {
        Ok(ActionReport {
            exit_code: Some(0),
            duration: Duration::ZERO,
        })
    }

    fn describe(&self) -> String {
        "noop".into()
    }
}

fn config(log_path: PathBuf) -> DaemonConfig {
    DaemonConfig::from_json_str(&format!(
        r#"{{
            "ncm_command": "/usr/local/sbin/ansible_ncm.sh --check",
            "check_interval_secs": 5,
            "hostname_format": "[A-Z]{{3}}\\d[A-Z]{{2,5}}\\d{{2}}",
            "log_path": {:?},
            "bind_addr": "127.0.0.1:0",
            "action_timeout_secs": 120
        }}"#,
        log_path.display().to_string()
    ))
    .unwrap()
}

#[test]
fn test_build_daemon_shares_pending_set() {
    let cfg = config(PathBuf::from("/tmp/unused.log"));
    let daemon = build_daemon_with(&cfg, NoopAction, shared_sink(InMemoryEventSink::new(8))).unwrap();

    assert_eq!(daemon.bind_addr(), "127.0.0.1:0");
    assert_eq!(daemon.scheduler().interval(), Duration::from_secs(5));
    assert_eq!(daemon.scheduler().state(), SchedulerState::Waiting);

    assert_eq!(daemon.ingress().report("ABC1DEF23"), ReportOutcome::Added);
    assert!(daemon.ingress().pending().contains("ABC1DEF23"));
}

#[test]
fn test_build_daemon_with_command_and_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("rtcn.log");
    let daemon = build_daemon(&config(log.clone())).unwrap();

    let action = daemon.scheduler().action();
    assert_eq!(action.program(), "/usr/local/sbin/ansible_ncm.sh");
    assert_eq!(action.args(), ["--check"]);
    assert!(log.exists());
}

#[test]
fn test_build_daemon_rejects_invalid_config() {
    let mut cfg = config(PathBuf::from("/tmp/unused.log"));
    cfg.check_interval_secs = 0;
    assert!(build_daemon_with(&cfg, NoopAction, shared_sink(InMemoryEventSink::new(8))).is_err());
}

#[test]
fn test_build_daemon_hostname_matching_modes() {
    let mut cfg = config(PathBuf::from("/tmp/unused.log"));
    let daemon = build_daemon_with(&cfg, NoopAction, shared_sink(InMemoryEventSink::new(8))).unwrap();
    assert_eq!(
        daemon.ingress().report("ABC1DEF23.example.net"),
        ReportOutcome::Added
    );

    cfg.hostname_full_match = true;
    let daemon = build_daemon_with(&cfg, NoopAction, shared_sink(InMemoryEventSink::new(8))).unwrap();
    assert_eq!(
        daemon.ingress().report("ABC1DEF23.example.net"),
        ReportOutcome::Rejected
    );
    assert_eq!(daemon.ingress().report("ABC1DEF23"), ReportOutcome::Added);
}
