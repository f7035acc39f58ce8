use std::sync::Arc;
use std::time::Duration;

use labhost_core::model::{HealthStatus, HostFields, HostRecord, ProbeMethod};
use labhost_core::probe::{HostProber, ProbeError, ProbeResult, SweepObserver};
use labhost_core::storage::MemoryBackend;
use labhost_core::store::Store;
use parking_lot::Mutex;

/// Records every call and every commit into one shared timeline.
struct RecordingProber {
    timeline: Arc<Mutex<Vec<String>>>,
}

impl HostProber for RecordingProber {
    async fn probe_address(&self, address: &str) -> Result<ProbeResult, ProbeError> {
        self.timeline.lock().push(format!("probe {}", address));
        tokio::time::sleep(Duration::from_millis(5)).await;
        if address.ends_with(".2") {
            Err(ProbeError::Transport("connection reset".to_string()))
        } else {
            Ok(ProbeResult::online(ProbeMethod::Http, Duration::from_millis(5)))
        }
    }
}

struct Timeline(Arc<Mutex<Vec<String>>>);

impl SweepObserver for Timeline {
    fn on_checking(&self, host: &HostRecord) {
        assert_eq!(host.health_status, HealthStatus::Checking);
        self.0.lock().push(format!("checking {}", host.ip));
    }

    fn on_committed(&self, host: &HostRecord) {
        self.0
            .lock()
            .push(format!("commit {} {}", host.ip, host.health_status.as_str()));
    }
}

#[tokio::test]
async fn test_three_hosts_three_commits_in_order() {
    let store = Store::new(MemoryBackend::new());
    for (name, ip) in [("a", "10.0.0.1"), ("b", "10.0.0.2"), ("c", "10.0.0.3")] {
        store
            .add_host("default", HostFields::new(name, ip))
            .await
            .unwrap();
    }

    let timeline = Arc::new(Mutex::new(Vec::new()));
    let prober = RecordingProber {
        timeline: timeline.clone(),
    };
    let summary = store.sweep(&prober, &Timeline(timeline.clone())).await;

    assert_eq!(summary.checked, 3);
    assert_eq!(
        *timeline.lock(),
        vec![
            "checking 10.0.0.1",
            "probe 10.0.0.1",
            "commit 10.0.0.1 online",
            "checking 10.0.0.2",
            "probe 10.0.0.2",
            "commit 10.0.0.2 offline",
            "checking 10.0.0.3",
            "probe 10.0.0.3",
            "commit 10.0.0.3 online",
        ]
    );

    let doc = store.load().await;
    assert!(doc.hosts().all(|h| h.health_status.is_terminal()));
    assert!(doc.hosts().all(|h| h.last_health_check_at.is_some()));
    let b = doc.hosts().find(|h| h.name == "b").unwrap();
    assert_eq!(b.health_status, HealthStatus::Offline);
    assert_eq!(b.health_method.map(|m| m.to_string()).as_deref(), Some("error"));
}

#[tokio::test]
async fn test_store_sweep_matches_in_memory_sweep() {
    let store = Store::new(MemoryBackend::new());
    for (name, ip) in [("a", "10.0.0.1"), ("b", "10.0.0.2")] {
        store
            .add_host("default", HostFields::new(name, ip))
            .await
            .unwrap();
    }
    let mut doc = store.load().await;

    let stored_events = Arc::new(Mutex::new(Vec::new()));
    let prober = RecordingProber {
        timeline: Arc::new(Mutex::new(Vec::new())),
    };
    store.sweep(&prober, &Timeline(stored_events.clone())).await;

    let memory_events = Arc::new(Mutex::new(Vec::new()));
    labhost_core::probe::sweep(&mut doc, &prober, &Timeline(memory_events.clone())).await;

    assert_eq!(*stored_events.lock(), *memory_events.lock());
    let stored = store.load().await;
    for host in doc.hosts() {
        let other = stored.host(&host.id).unwrap();
        assert_eq!(other.health_status, host.health_status);
        assert_eq!(other.health_method, host.health_method);
    }
}
