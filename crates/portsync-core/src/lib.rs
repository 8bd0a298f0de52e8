//! portsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `Preferences` and the error taxonomy shared by every adapter
//! - **Use cases** - the single read-compare-write reconciliation pass
//! - **Port definitions** - Traits for adapters: `IPortSource`, `IControlSession`
//! - **Configuration** - typed settings with validation and a builder
//!
//! # Architecture
//!
//! The domain module has no I/O. Ports define the trait interfaces that the
//! gateway and qBittorrent adapter crates implement, and use cases drive the
//! domain through those ports.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
