//! Host reachability probing.
//!
//! ICMP is not assumed to be available, so reachability is approximated with
//! `HEAD` requests over HTTP, HTTPS and then plain HTTP on common service
//! ports. The probe order lives in a `ProbePlan`; the network side sits
//! behind `ProbeTransport` and the sweep only sees `HostProber`.

pub mod plan;
pub mod prober;
pub mod sweep;
pub mod transport;

pub use plan::*;
pub use prober::*;
pub use sweep::*;
pub use transport::*;
