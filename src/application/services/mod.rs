//! Business logic services for the application layer.

pub mod link_manager;

pub use link_manager::LinkManager;
