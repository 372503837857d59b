//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the domain core depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStore`] - Remote folder operations (list, upload, delete, stat)

pub mod remote_store;

pub use remote_store::{IRemoteStore, RootInfo};
