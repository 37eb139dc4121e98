//! Integration tests for daemon wiring: listener installation and the
//! monitor thread.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ikebus_core::{dbg1, from_fn, sig, Bus, Event, Signal};
use ikebus_daemon::{build_bus, spawn_monitor, Config, MonitorConfig};
use parking_lot::Mutex;

fn wait_for_active(bus: &Bus, count: usize) {
    for _ in 0..500 {
        if bus.active_count() == count {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("monitor never became active");
}

#[test]
fn monitor_reports_lifecycle_events_until_teardown() {
    let bus = Bus::new();
    let monitor = spawn_monitor(bus.clone(), &MonitorConfig::default())
        .expect("monitor should spawn");
    wait_for_active(&bus, 1);

    sig!(bus, Signal::IkeUpStart, "initiating");
    dbg1!(bus, Signal::DbgNet, "sending packet");
    sig!(bus, Signal::IkeUpSuccess, "established");

    bus.teardown();
    let reported = monitor.join().expect("monitor should not panic");
    assert_eq!(reported, 2, "debug signals are skipped");
}

#[test]
fn monitor_can_report_everything() {
    let bus = Bus::new();
    let config = MonitorConfig {
        enabled: true,
        lifecycle_only: false,
    };
    let monitor = spawn_monitor(bus.clone(), &config).expect("monitor should spawn");
    wait_for_active(&bus, 1);

    for i in 0..5u32 {
        dbg1!(bus, Signal::DbgJob, "job %u", i);
    }

    bus.teardown();
    assert_eq!(monitor.join().expect("monitor should not panic"), 5);
}

#[test]
fn emitter_waits_for_monitor() {
    let bus = Bus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.add_listener(from_fn(move |event: &Event| {
        sink.lock().push(event.signal);
    }))
    .expect("bus should accept listeners");

    let monitor = spawn_monitor(bus.clone(), &MonitorConfig::default())
        .expect("monitor should spawn");
    wait_for_active(&bus, 1);

    sig!(bus, Signal::ChildUpSuccess, "tunnel up");
    assert_eq!(*seen.lock(), vec![Signal::ChildUpSuccess]);
    assert!(bus.try_pull().is_none(), "the emitter is never owed its own event");

    bus.teardown();
    assert_eq!(monitor.join().expect("monitor should not panic"), 1);
}

#[test]
fn build_bus_installs_configured_listeners() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("daemon.log");
    let raw = format!(
        "[[listeners.files]]\npath = \"{}\"\ntime_format = \"\"\n\n[listeners.tracing]\n",
        path.display()
    );
    let config: Config = load_from_toml(&raw);

    let bus = build_bus(&config).expect("bus should build");
    assert_eq!(bus.listener_count(), 2);

    dbg1!(bus, Signal::DbgDmn, "daemon started");
    let contents = std::fs::read_to_string(&path).expect("should read log file");
    assert!(contents.ends_with("[DMN] daemon started\n"));
}

fn load_from_toml(raw: &str) -> Config {
    let path = tempfile::NamedTempFile::new().expect("should create temp file");
    std::fs::write(path.path(), raw).expect("should write config");
    ikebus_daemon::load_config(path.path().to_str()).expect("config should load")
}
