//! Session logic and port definitions for Comanda.
//!
//! This crate defines the "ports" (query service and catalog traits) that
//! the infrastructure layer implements, and the conversational session
//! controller that drives them. It depends only on `comanda-types` -- never
//! on `comanda-infra` or any network/IO crate.

pub mod catalog;
pub mod event;
pub mod query;
pub mod session;
