//! Structured logging with run context.
//!
//! Provides logging macros and utilities that include the run id and host id
//! in every log message for easy correlation.

pub mod structured;

pub use structured::*;
