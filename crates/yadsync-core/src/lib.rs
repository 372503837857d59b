//! yadsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `FileRecord`, `Inventory`, `ActionSet`, `SyncOutcome`, `CycleReport`
//! - **Reconciliation** - the pure diff between a local and a remote inventory
//! - **Port definitions** - the `IRemoteStore` trait implemented by storage adapters
//! - **Configuration** - YAML + environment configuration shared by all binaries
//!
//! # Architecture
//!
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.

pub mod config;
pub mod domain;
pub mod ports;
