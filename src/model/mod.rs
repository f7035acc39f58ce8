//! Data model.
//!
//! The persisted host document (environments of host records) and the
//! separately persisted settings document.

pub mod document;
pub mod host;
pub mod pending;
pub mod settings;

pub use document::*;
pub use host::*;
pub use pending::*;
pub use settings::*;
