//! Application layer implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! - [`services::link_manager::LinkManager`] - Link creation, resolution, listing and deletion
//! - [`options::LinkManagerOptions`] - Validated hashing and retry settings

pub mod options;
pub mod services;
