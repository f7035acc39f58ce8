//! Storage module.
//!
//! Whole-blob persistence behind the `StorageBackend` trait, with a
//! file-backed implementation for real use and an in-memory one for tests.

pub mod backend;
pub mod file;
pub mod memory;

pub use backend::*;
pub use file::*;
pub use memory::*;
