//! Integration tests for the line loggers and level filtering.

use ikebus_core::{dbg1, dbg3, sig, Bus, Level, NamedSa, Signal, SignalCategory};
use ikebus_listeners::{build_listeners, FileLogger, LevelFilter, ListenersConfig, StreamLogger};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// In-memory writer shared between the logger and the test.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().clone())
            .expect("log output should be utf-8")
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[test]
fn stream_logger_formats_thread_category_and_sa() {
    let bus = Bus::new();
    let buf = SharedBuf::default();
    bus.add_listener(Arc::new(StreamLogger::new(
        "memory",
        buf.clone(),
        LevelFilter::uniform(Level::CTRL),
    )))
    .expect("bus should accept listeners");

    let sa = NamedSa::handle("home", 1);
    bus.bind_sa(Some(sa.clone()));
    dbg1!(bus, Signal::DbgIke, "initiating IKE_SA %s to %s", &sa, "192.0.2.1");
    bus.bind_sa(None);
    sig!(bus, Signal::ChildUpSuccess, "CHILD_SA established");

    let thread = ikebus_core::ThreadNum::current();
    assert_eq!(
        buf.lines(),
        vec![
            format!("{thread}[IKE] <home[1]> initiating IKE_SA home[1] to 192.0.2.1"),
            format!("{thread}[ANY] CHILD_SA established"),
        ]
    );
}

#[test]
fn category_thresholds_filter_events() {
    let bus = Bus::new();
    let buf = SharedBuf::default();
    let filter = LevelFilter::uniform(Level::CTRL)
        .with(SignalCategory::Knl, Level::RAW)
        .with(SignalCategory::Enc, Level::SILENT);
    bus.add_listener(Arc::new(StreamLogger::new("memory", buf.clone(), filter)))
        .expect("bus should accept listeners");

    dbg3!(bus, Signal::DbgKnl, "kernel detail");
    dbg3!(bus, Signal::DbgNet, "net detail");
    dbg1!(bus, Signal::DbgEnc, "encoder output");
    sig!(bus, Signal::IkeUpStart, "audit line");

    let lines = buf.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("[KNL] kernel detail"));
    assert!(lines[1].ends_with("[ANY] audit line"));
}

#[test]
fn file_logger_appends_with_timestamps() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("charon.log");
    std::fs::write(&path, "previous run\n").expect("should seed log file");

    let bus = Bus::new();
    let logger = FileLogger::open(&path, true, LevelFilter::uniform(Level::AUDIT))
        .expect("should open log file")
        .with_time_format("%Y");
    bus.add_listener(Arc::new(logger))
        .expect("bus should accept listeners");

    sig!(bus, Signal::IkeDownSuccess, "IKE_SA deleted");
    dbg1!(bus, Signal::DbgMgr, "filtered out");

    let contents = std::fs::read_to_string(&path).expect("should read log file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "previous run");
    let year = chrono::Utc::now().format("%Y").to_string();
    assert!(lines[1].starts_with(&year), "line starts with timestamp: {}", lines[1]);
    assert!(lines[1].ends_with("[ANY] IKE_SA deleted"));
}

#[test]
fn file_logger_truncates_when_not_appending() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("fresh.log");
    std::fs::write(&path, "stale\n").expect("should seed log file");

    let bus = Bus::new();
    let logger = FileLogger::open(&path, false, LevelFilter::uniform(Level::AUDIT))
        .expect("should open log file");
    bus.add_listener(Arc::new(logger))
        .expect("bus should accept listeners");
    sig!(bus, Signal::ChildRekeySuccess, "rekeyed");

    let contents = std::fs::read_to_string(&path).expect("should read log file");
    assert!(!contents.contains("stale"));
    assert!(contents.trim_end().ends_with("[ANY] rekeyed"));
}

#[test]
fn build_listeners_from_toml() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("configured.log");
    let raw = format!(
        r#"
[[files]]
path = "{}"
append = false
time_format = ""
default_level = 0
levels = {{ cfg = 2 }}

[tracing]
default_level = 1
"#,
        path.display()
    );
    let config: ListenersConfig = toml::from_str(&raw).expect("config should parse");
    assert_eq!(config.files.len(), 1);
    assert!(config.stderr.is_none());

    let listeners = build_listeners(&config).expect("listeners should build");
    assert_eq!(listeners.len(), 2);

    let bus = Bus::new();
    for listener in listeners {
        bus.add_listener(listener).expect("bus should accept listeners");
    }
    ikebus_core::dbg2!(bus, Signal::DbgCfg, "loaded %u connections", 3u32);
    ikebus_core::dbg2!(bus, Signal::DbgIke, "dropped");

    let contents = std::fs::read_to_string(&path).expect("should read log file");
    let thread = ikebus_core::ThreadNum::current();
    assert_eq!(contents, format!("{thread}[CFG] loaded 3 connections\n"));
}

#[test]
fn build_listeners_reports_unopenable_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let raw = format!(
        "[[files]]\npath = \"{}\"\n",
        dir.path().join("missing").join("nested.log").display()
    );
    let config: ListenersConfig = toml::from_str(&raw).expect("config should parse");

    let error = build_listeners(&config).err().expect("opening should fail");
    assert!(error.to_string().contains("nested.log"));
}
