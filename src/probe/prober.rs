//! Reachability prober.
//!
//! Walks a `ProbePlan` one step at a time. Each attempt is bounded by its own
//! timeout and the first success short-circuits the rest, so a probe always
//! ends in `Online` or `Offline` within `plan.worst_case()`.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout, Instant};

use crate::model::{HealthMethod, HealthStatus, ProbeMethod};

use super::plan::ProbePlan;
use super::transport::{NetTransport, ProbeError, ProbeTransport};

/// Terminal outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: HealthStatus,
    pub method: HealthMethod,
    /// Milliseconds from the start of the probe to the first success.
    pub response_time_ms: Option<u64>,
}

impl ProbeResult {
    pub fn online(method: ProbeMethod, elapsed: Duration) -> Self {
        Self {
            status: HealthStatus::Online,
            method: HealthMethod::Probe(method),
            response_time_ms: Some(elapsed.as_millis() as u64),
        }
    }

    pub fn all_failed() -> Self {
        Self {
            status: HealthStatus::Offline,
            method: HealthMethod::AllFailed,
            response_time_ms: None,
        }
    }

    /// The probe itself blew up rather than every attempt failing.
    pub fn error() -> Self {
        Self {
            status: HealthStatus::Offline,
            method: HealthMethod::Error,
            response_time_ms: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == HealthStatus::Online
    }
}

/// Anything that can probe one address. The sweep only sees this seam, so
/// tests substitute recording fakes.
///
/// An `Err` is a failure of the prober itself; callers turn it into an
/// `Offline`/`error` result instead of propagating it.
pub trait HostProber: Send + Sync {
    fn probe_address(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<ProbeResult, ProbeError>> + Send;
}

pub struct Prober<T> {
    transport: T,
    plan: ProbePlan,
}

impl Prober<NetTransport> {
    /// Prober over the real network with the default plan.
    pub fn network() -> Result<Self, ProbeError> {
        Ok(Self::new(NetTransport::new()?))
    }
}

impl<T: ProbeTransport> Prober<T> {
    pub fn new(transport: T) -> Self {
        Self::with_plan(transport, ProbePlan::default())
    }

    pub fn with_plan(transport: T, plan: ProbePlan) -> Self {
        Self { transport, plan }
    }

    pub fn plan(&self) -> &ProbePlan {
        &self.plan
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the plan against `address`. Attempt failures are absorbed.
    pub async fn probe(&self, address: &str) -> ProbeResult {
        let started = Instant::now();

        for step in self.plan.steps() {
            let outcome = match timeout(step.timeout, self.transport.attempt(address, step.method)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(ProbeError::Timeout(step.timeout)),
            };

            match outcome {
                Ok(()) => {
                    let result = ProbeResult::online(step.method, started.elapsed());
                    log::debug!(
                        "PROBE_ONLINE address={} method={} response_time_ms={:?}",
                        address,
                        step.method,
                        result.response_time_ms
                    );
                    return result;
                }
                Err(e) => {
                    log::debug!(
                        "PROBE_ATTEMPT_FAILED address={} method={} error={}",
                        address,
                        step.method,
                        e
                    );
                }
            }
        }

        log::debug!(
            "PROBE_ALL_FAILED address={} attempts={} elapsed_ms={}",
            address,
            self.plan.steps().len(),
            started.elapsed().as_millis()
        );
        ProbeResult::all_failed()
    }
}

impl<T: ProbeTransport> HostProber for Prober<T> {
    async fn probe_address(&self, address: &str) -> Result<ProbeResult, ProbeError> {
        Ok(self.probe(address).await)
    }
}
