//! Tests for event sinks

use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rtcnd::core::{
    build_log_event, shared_sink, EventKind, EventSink, FileEventSink, InMemoryEventSink,
};

#[test]
fn test_in_memory_event_sink() {
    let mut sink = InMemoryEventSink::new(10);

    sink.record(build_log_event(EventKind::HostAdded, "ABC1DEF23 added"));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].kind, EventKind::HostAdded);
    assert_eq!(events[0].message, "ABC1DEF23 added");
}

#[test]
fn test_event_sink_overflow() {
    let mut sink = InMemoryEventSink::new(2);

    sink.record(build_log_event(EventKind::Triggered, "evt1"));
    sink.record(build_log_event(EventKind::Triggered, "evt2"));
    sink.record(build_log_event(EventKind::Triggered, "evt3"));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].message, "evt2"); // First one popped
    assert_eq!(events[1].message, "evt3");
}

#[test]
fn test_build_log_event_ids_unique() {
    let a = build_log_event(EventKind::ActionFailed, "x");
    let b = build_log_event(EventKind::ActionFailed, "x");
    assert_ne!(a.event_id, b.event_id);
    assert!(b.created_at >= a.created_at);
}

#[test]
fn test_file_sink_appends_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rtcn.log");
    fs::write(&path, "existing line\n").unwrap();

    {
        let mut sink = FileEventSink::open(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        sink.record(build_log_event(EventKind::HostAdded, "first"));
        sink.record(build_log_event(EventKind::Triggered, "second"));
    }
    let mut sink = FileEventSink::open(&path).unwrap();
    sink.record(build_log_event(EventKind::ActionSucceeded, "third"));
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "existing line");
    assert!(lines[1].ends_with(": first"));
    assert!(lines[2].ends_with(": second"));
    assert!(lines[3].ends_with(": third"));
}

#[test]
fn test_file_sink_open_fails_for_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("rtcn.log");
    assert!(FileEventSink::open(path).is_err());
}

#[test]
fn test_file_sink_keeps_order_and_flushes_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rtcn.log");

    let mut sink = FileEventSink::open(&path).unwrap();
    for i in 0..1_000 {
        sink.record(build_log_event(EventKind::HostAdded, format!("line {i}")));
    }
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1_000);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!(": line {i}")), "out of order: {line}");
    }
}

#[test]
fn test_file_sink_writes_while_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rtcn.log");

    let mut sink = FileEventSink::open(&path).unwrap();
    sink.record(build_log_event(EventKind::Triggered, "queued"));

    let deadline = Instant::now() + Duration::from_secs(5);
    while !fs::read_to_string(&path).unwrap().contains(": queued") {
        assert!(Instant::now() < deadline, "line never reached the file");
        std::thread::sleep(Duration::from_millis(10));
    }
    drop(sink);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_file_sink_shared_across_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rtcn.log");
    let sink = shared_sink(FileEventSink::open(&path).unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|t| {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                for i in 0..50 {
                    sink.lock()
                        .record(build_log_event(EventKind::HostAdded, format!("t{t} e{i}")));
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 400);
}
