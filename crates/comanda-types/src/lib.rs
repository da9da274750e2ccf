//! Shared domain types for Comanda.
//!
//! This crate contains the domain types used across the dashboard: session
//! messages and snapshots, the query service contract, catalog records
//! (customers, menu, reservations), configuration, events and errors.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod query;
pub mod session;
