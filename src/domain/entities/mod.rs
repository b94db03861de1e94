//! Core domain entities.
//!
//! - [`Link`] - A stored URL mapping with access statistics
//! - [`NewLink`] - Input for inserting a link
//! - [`LinkRecord`] - Read-only projection handed to callers

pub mod link;

pub use link::{Link, LinkRecord, NewLink};
