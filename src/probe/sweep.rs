//! Sequential health sweep over a document.
//!
//! Hosts are probed strictly one at a time in document order. Host *i+1* is
//! not probed until host *i* has its terminal result committed.

use chrono::{DateTime, SubsecRound, Utc};

use crate::logging::LogContext;
use crate::model::{Document, HealthStatus, HostRecord};
use crate::{log_info, log_warn};

use super::prober::{HostProber, ProbeResult};

/// Progress callbacks for whatever is rendering the sweep.
pub trait SweepObserver: Send + Sync {
    /// `host` has just been marked `Checking`.
    fn on_checking(&self, _host: &HostRecord) {}

    /// `host` carries its terminal result.
    fn on_committed(&self, _host: &HostRecord) {}
}

impl SweepObserver for () {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub run_id: String,
    pub checked: usize,
    pub online: usize,
    pub offline: usize,
}

impl SweepSummary {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: &ProbeResult) {
        self.checked += 1;
        if result.is_online() {
            self.online += 1;
        } else {
            self.offline += 1;
        }
    }
}

/// Write a terminal result onto a host record. The check time is kept at
/// millisecond precision, the resolution it is persisted with.
pub fn commit_result(host: &mut HostRecord, result: &ProbeResult, now: DateTime<Utc>) {
    host.health_status = result.status;
    host.last_health_check_at = Some(now.trunc_subsecs(3));
    host.response_time_ms = result.response_time_ms;
    host.health_method = Some(result.method);
}

/// Probe one address, turning a prober failure into `Offline`/`error`.
pub async fn probe_or_error<P: HostProber>(
    prober: &P,
    address: &str,
    ctx: &LogContext,
) -> ProbeResult {
    match prober.probe_address(address).await {
        Ok(result) => result,
        Err(e) => {
            log_warn!(ctx, "PROBE_FAILED", address = address, error = e.to_string());
            ProbeResult::error()
        }
    }
}

/// Mark `host` as checking, probe it and commit the terminal result.
pub async fn check_host<P: HostProber, O: SweepObserver>(
    prober: &P,
    observer: &O,
    host: &mut HostRecord,
    ctx: &LogContext,
) -> ProbeResult {
    host.health_status = HealthStatus::Checking;
    observer.on_checking(host);

    let result = probe_or_error(prober, &host.ip, ctx).await;
    commit_result(host, &result, Utc::now());
    log_info!(
        ctx,
        "HOST_COMMITTED",
        status = result.status.as_str(),
        method = result.method.to_string(),
        response_time_ms = result.response_time_ms
    );
    result
}

/// One sweep in progress: run id, running counts and the observer.
///
/// Callers decide where a committed host is stored and report it back with
/// [`SweepRun::committed`].
pub struct SweepRun<'a, P, O> {
    prober: &'a P,
    observer: &'a O,
    ctx: LogContext,
    summary: SweepSummary,
}

impl<'a, P: HostProber, O: SweepObserver> SweepRun<'a, P, O> {
    pub fn start(prober: &'a P, observer: &'a O, hosts: usize) -> Self {
        let ctx = LogContext::generate("sweep");
        log_info!(ctx, "SWEEP_START", hosts = hosts);
        Self {
            prober,
            observer,
            summary: SweepSummary::new(&ctx.run_id),
            ctx,
        }
    }

    pub fn context(&self) -> &LogContext {
        &self.ctx
    }

    pub async fn check(&mut self, host: &mut HostRecord) -> ProbeResult {
        let host_ctx = self.ctx.with_host(&host.id);
        let result = check_host(self.prober, self.observer, host, &host_ctx).await;
        self.summary.record(&result);
        result
    }

    pub fn committed(&self, host: &HostRecord) {
        self.observer.on_committed(host);
    }

    pub fn finish(self) -> SweepSummary {
        log_info!(
            self.ctx,
            "SWEEP_COMPLETE",
            checked = self.summary.checked,
            online = self.summary.online,
            offline = self.summary.offline
        );
        self.summary
    }
}

/// Probe every host in `doc`, in order, committing each result in place.
pub async fn sweep<P: HostProber, O: SweepObserver>(
    doc: &mut Document,
    prober: &P,
    observer: &O,
) -> SweepSummary {
    let mut run = SweepRun::start(prober, observer, doc.host_count());
    for host in doc.hosts_mut() {
        run.check(host).await;
        run.committed(host);
    }
    run.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Environment, HealthMethod, HostFields, ProbeMethod};
    use crate::probe::transport::ProbeError;
    use crate::store::{add_host, export_document, import_document};
    use chrono::TimeZone;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Online for addresses starting with `10.`, a prober error for `bad`,
    /// offline otherwise.
    #[derive(Default)]
    struct ScriptedProber {
        calls: Mutex<Vec<String>>,
    }

    impl HostProber for ScriptedProber {
        async fn probe_address(&self, address: &str) -> Result<ProbeResult, ProbeError> {
            self.calls.lock().push(address.to_string());
            if address == "bad" {
                return Err(ProbeError::Transport("boom".to_string()));
            }
            if address.starts_with("10.") {
                Ok(ProbeResult::online(ProbeMethod::Http, Duration::from_millis(5)))
            } else {
                Ok(ProbeResult::all_failed())
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SweepObserver for Recorder {
        fn on_checking(&self, host: &HostRecord) {
            assert_eq!(host.health_status, HealthStatus::Checking);
            self.events.lock().push(format!("checking:{}", host.name));
        }

        fn on_committed(&self, host: &HostRecord) {
            assert!(host.health_status.is_terminal());
            self.events.lock().push(format!("committed:{}", host.name));
        }
    }

    fn sample() -> Document {
        let mut doc = Document::default();
        doc.envs.push(Environment::new("lab", "Lab-A"));
        add_host(&mut doc, "default", HostFields::new("a", "10.0.0.1")).unwrap();
        add_host(&mut doc, "lab", HostFields::new("b", "bad")).unwrap();
        add_host(&mut doc, "lab", HostFields::new("c", "192.0.2.1")).unwrap();
        doc
    }

    #[tokio::test]
    async fn test_sweep_commits_in_order() {
        let mut doc = sample();
        let prober = ScriptedProber::default();
        let observer = Recorder::default();

        let summary = sweep(&mut doc, &prober, &observer).await;

        assert_eq!(summary.checked, 3);
        assert_eq!(summary.online, 1);
        assert_eq!(summary.offline, 2);
        assert!(summary.run_id.starts_with("sweep-"));
        assert_eq!(*prober.calls.lock(), vec!["10.0.0.1", "bad", "192.0.2.1"]);
        assert_eq!(
            *observer.events.lock(),
            vec![
                "checking:a",
                "committed:a",
                "checking:b",
                "committed:b",
                "checking:c",
                "committed:c"
            ]
        );
    }

    #[tokio::test]
    async fn test_prober_error_degrades_to_offline() {
        let mut doc = sample();
        sweep(&mut doc, &ScriptedProber::default(), &()).await;

        let b = doc.hosts().find(|h| h.name == "b").unwrap();
        assert_eq!(b.health_status, HealthStatus::Offline);
        assert_eq!(b.health_method, Some(HealthMethod::Error));
        assert!(b.last_health_check_at.is_some());

        let c = doc.hosts().find(|h| h.name == "c").unwrap();
        assert_eq!(c.health_method, Some(HealthMethod::AllFailed));
        assert_eq!(c.response_time_ms, None);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let mut doc = Document::default();
        let summary = sweep(&mut doc, &ScriptedProber::default(), &()).await;
        assert_eq!(summary.checked, 0);
    }

    #[test]
    fn test_commit_result_clears_stale_response_time() {
        let mut doc = sample();
        let host = doc.hosts_mut().next().unwrap();
        let now = Utc::now();

        commit_result(
            host,
            &ProbeResult::online(ProbeMethod::Port(22), Duration::from_millis(12)),
            now,
        );
        assert_eq!(host.response_time_ms, Some(12));
        assert_eq!(host.last_health_check_at, Some(now.trunc_subsecs(3)));

        commit_result(host, &ProbeResult::all_failed(), now);
        assert_eq!(host.health_status, HealthStatus::Offline);
        assert_eq!(host.response_time_ms, None);
    }

    #[tokio::test]
    async fn test_swept_document_survives_export_import() {
        let mut doc = sample();
        sweep(&mut doc, &ScriptedProber::default(), &()).await;
        let host = doc.hosts_mut().next().unwrap();
        commit_result(
            host,
            &ProbeResult::online(ProbeMethod::Http, Duration::from_millis(3)),
            Utc.timestamp_nanos(1_700_000_000_123_456_789),
        );
        assert_eq!(
            host.last_health_check_at,
            Some(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap())
        );

        let text = export_document(&doc).unwrap();
        assert_eq!(import_document(&text).unwrap(), doc);
    }

    #[tokio::test]
    async fn test_check_host_reports_checking_once() {
        let mut doc = sample();
        let observer = Recorder::default();
        let host = doc.hosts_mut().next().unwrap();

        let ctx = LogContext::new("t");
        let result = check_host(&ScriptedProber::default(), &observer, host, &ctx).await;

        assert!(result.is_online());
        assert_eq!(host.health_status, HealthStatus::Online);
        assert_eq!(*observer.events.lock(), vec!["checking:a"]);
    }
}
