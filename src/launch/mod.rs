//! Host launch actions.

pub mod commands;
pub mod outbound;

pub use commands::*;
pub use outbound::*;
