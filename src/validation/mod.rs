//! Validation module.
//!
//! Input checks applied before anything touches the document:
//! - Host form fields (required name/address, port range, tags)
//! - Page selections offered as new hosts (IPv4 only)
//! - Imported documents (required fields, unique ids)

pub mod address;
pub mod document;
pub mod host;

pub use address::*;
pub use document::*;
pub use host::*;
