//! Host store.
//!
//! Pure operations over an in-memory [`Document`](crate::model::Document)
//! (`ops`, `query`, `transfer`) and the persisted [`Store`] service built on
//! top of them.

pub mod error;
pub mod ops;
pub mod query;
pub mod service;
pub mod transfer;

pub use error::*;
pub use ops::*;
pub use query::*;
pub use service::*;
pub use transfer::*;
