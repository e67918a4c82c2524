//! Tests for configuration validation and environment loading

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use rtcnd::config::{env_checklist, DaemonConfig};
use rtcnd::core::{JoinStrategy, RtcnError};

fn valid() -> DaemonConfig {
    DaemonConfig {
        ncm_command: "sudo -u ansible /usr/local/sbin/ansible_ncm.sh".to_string(),
        check_interval_secs: 300,
        hostname_format: r"^[A-Z]{3}\d{1}[A-Z]{2,5}\d{2}".to_string(),
        hostname_full_match: false,
        log_path: PathBuf::from("/var/log/rtcn.log"),
        join: JoinStrategy::default(),
        bind_addr: "127.0.0.1:8000".to_string(),
        action_timeout_secs: None,
    }
}

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

const REQUIRED: [(&str, &str); 4] = [
    ("RTCND_NCM_COMMAND", "/usr/local/sbin/ansible_ncm.sh"),
    ("RTCND_CHECK_INTERVAL", "300"),
    ("RTCND_HOSTNAME_FORMAT", r"^[A-Z]{3}\d{1}[A-Z]{2,5}\d{2}"),
    ("RTCND_LOG", "/var/log/rtcn.log"),
];

#[test]
fn test_config_validation() {
    assert!(valid().validate().is_ok());
    assert_eq!(valid().interval(), Duration::from_secs(300));
    assert_eq!(valid().action_timeout(), None);
}

#[test]
fn test_config_invalid_interval() {
    let mut cfg = valid();
    cfg.check_interval_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_invalid_command() {
    let mut cfg = valid();
    cfg.ncm_command = "  ".to_string();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_invalid_regex() {
    let mut cfg = valid();
    cfg.hostname_format = "[A-Z".to_string();
    assert!(matches!(cfg.validate(), Err(RtcnError::Config(_))));
}

#[test]
fn test_config_invalid_separator_and_timeout() {
    let mut cfg = valid();
    cfg.join.separator = String::new();
    assert!(cfg.validate().is_err());

    let mut cfg = valid();
    cfg.action_timeout_secs = Some(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_invalid_bind_addr() {
    let mut cfg = valid();
    cfg.bind_addr = "not-an-address".to_string();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "ncm_command": "/usr/local/sbin/ansible_ncm.sh",
        "check_interval_secs": 60,
        "hostname_format": "[A-Z]{3}\\d[A-Z]{2,5}\\d{2}",
        "log_path": "/tmp/rtcn.log",
        "join": { "separator": ":" }
    }"#;

    let cfg = DaemonConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.check_interval_secs, 60);
    assert_eq!(cfg.join.separator, ":");
    assert!(!cfg.join.sorted);
    assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
    assert!(!cfg.hostname_full_match);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    let json = r#"{
        "ncm_command": "x",
        "check_interval_secs": 0,
        "hostname_format": ".*",
        "log_path": "/tmp/rtcn.log"
    }"#;
    assert!(DaemonConfig::from_json_str(json).is_err());
    assert!(DaemonConfig::from_json_str("{").is_err());
}

#[test]
fn test_from_lookup_required_only() {
    let cfg = DaemonConfig::from_lookup(lookup(&REQUIRED)).unwrap();
    assert_eq!(cfg.ncm_command, "/usr/local/sbin/ansible_ncm.sh");
    assert_eq!(cfg.check_interval_secs, 300);
    assert_eq!(cfg.log_path, PathBuf::from("/var/log/rtcn.log"));
    assert_eq!(cfg.join, JoinStrategy::default());
    assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
}

#[test]
fn test_from_lookup_legacy_command_name() {
    let vars = [
        ("RTNCD_NCM_COMMAND", "legacy.sh"),
        REQUIRED[1],
        REQUIRED[2],
        REQUIRED[3],
    ];
    let cfg = DaemonConfig::from_lookup(lookup(&vars)).unwrap();
    assert_eq!(cfg.ncm_command, "legacy.sh");
}

#[test]
fn test_from_lookup_reports_all_missing() {
    let vars = [REQUIRED[0], ("RTCND_CHECK_INTERVAL", "   ")];
    match DaemonConfig::from_lookup(lookup(&vars)) {
        Err(RtcnError::MissingEnv(missing)) => {
            assert_eq!(
                missing,
                vec![
                    "RTCND_CHECK_INTERVAL".to_string(),
                    "RTCND_HOSTNAME_FORMAT".to_string(),
                    "RTCND_LOG".to_string(),
                ]
            );
        }
        other => panic!("expected MissingEnv, got {other:?}"),
    }
}

#[test]
fn test_from_lookup_optional_values() {
    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("RTCND_JOIN_SEPARATOR", " "),
        ("RTCND_JOIN_SORTED", "yes"),
        ("RTCND_BIND", "127.0.0.1:9000"),
        ("RTCND_ACTION_TIMEOUT", "600"),
        ("RTCND_HOSTNAME_FULL_MATCH", "true"),
    ]);
    let cfg = DaemonConfig::from_lookup(lookup(&vars)).unwrap();
    assert_eq!(cfg.join.separator, " ");
    assert!(cfg.join.sorted);
    assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
    assert_eq!(cfg.action_timeout(), Some(Duration::from_secs(600)));
    assert!(cfg.hostname_full_match);
}

#[test]
fn test_from_lookup_bad_full_match_flag() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("RTCND_HOSTNAME_FULL_MATCH", "maybe"));
    assert!(matches!(
        DaemonConfig::from_lookup(lookup(&vars)),
        Err(RtcnError::Config(_))
    ));
}

#[test]
fn test_from_lookup_bad_interval() {
    let mut vars = REQUIRED.to_vec();
    vars[1] = ("RTCND_CHECK_INTERVAL", "five minutes");
    assert!(matches!(
        DaemonConfig::from_lookup(lookup(&vars)),
        Err(RtcnError::Config(_))
    ));
}

#[test]
fn test_env_checklist_marks_missing() {
    let text = env_checklist(&["RTCND_LOG".to_string()]);
    assert!(text.starts_with("rtcnd requires these environment variables to be set:"));
    assert!(text.contains("[x] RTCND_NCM_COMMAND"));
    assert!(text.contains("[ ] RTCND_LOG"));
}
