//! Probe policy as data: an ordered list of (method, timeout) steps evaluated
//! in sequence, stopping at the first success.

use std::time::Duration;

use crate::model::ProbeMethod;

/// Per-attempt budget for the plain and encrypted web checks.
pub const WEB_TIMEOUT: Duration = Duration::from_millis(3000);
/// Per-port budget for the fallback port checks.
pub const PORT_TIMEOUT: Duration = Duration::from_millis(2000);
/// Fallback ports, tried strictly in this order.
pub const FALLBACK_PORTS: [u16; 7] = [22, 23, 80, 443, 3389, 8080, 8443];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeStep {
    pub method: ProbeMethod,
    pub timeout: Duration,
}

impl ProbeStep {
    pub fn new(method: ProbeMethod, timeout: Duration) -> Self {
        Self { method, timeout }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    steps: Vec<ProbeStep>,
}

impl Default for ProbePlan {
    /// HTTP, then HTTPS, then each fallback port.
    fn default() -> Self {
        let mut steps = vec![
            ProbeStep::new(ProbeMethod::Http, WEB_TIMEOUT),
            ProbeStep::new(ProbeMethod::Https, WEB_TIMEOUT),
        ];
        steps.extend(
            FALLBACK_PORTS
                .iter()
                .map(|&port| ProbeStep::new(ProbeMethod::Port(port), PORT_TIMEOUT)),
        );
        Self { steps }
    }
}

impl ProbePlan {
    pub fn new(steps: Vec<ProbeStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProbeStep] {
        &self.steps
    }

    /// Upper bound on how long one probe can take.
    pub fn worst_case(&self) -> Duration {
        self.steps.iter().map(|s| s.timeout).sum()
    }
}
