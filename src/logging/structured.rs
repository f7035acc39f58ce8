//! Structured logging utilities.
//!
//! Provides context-aware logging with the sweep/run id and host id included
//! in every log message.

use std::fmt;

use uuid::Uuid;

/// Logging context for a store operation or probe run.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub host_id: Option<String>,
}

impl LogContext {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            host_id: None,
        }
    }

    /// Fresh context with a short random id, e.g. `sweep-1a2b3c4d`.
    pub fn generate(prefix: &str) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self::new(&format!("{}-{}", prefix, &id[..8]))
    }

    pub fn with_host(&self, host_id: &str) -> Self {
        Self {
            run_id: self.run_id.clone(),
            host_id: Some(host_id.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host_id {
            Some(hid) => write!(f, "[run={}] [host={}]", self.run_id, hid),
            None => write!(f, "[run={}]", self.run_id),
        }
    }
}

/// Shared expansion for the levelled macros below: `CONTEXT EVENT key=value ...`.
#[doc(hidden)]
#[macro_export]
macro_rules! log_kv {
    ($level:expr, $ctx:expr, $event:expr $(, $key:ident = $value:expr)*) => {
        log::log!(
            $level,
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_kv!(log::Level::Info, $ctx, $event $(, $key = $value)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_kv!(log::Level::Warn, $ctx, $event $(, $key = $value)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_kv!(log::Level::Debug, $ctx, $event $(, $key = $value)*)
    };
}
