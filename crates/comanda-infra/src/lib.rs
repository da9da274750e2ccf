//! Infrastructure layer for Comanda.
//!
//! Contains implementations of the ports defined in `comanda-core`: the
//! HTTP query service adapter and the TOML fixture catalog, plus the
//! configuration loader and data-directory layout.

pub mod config;
pub mod filesystem;
pub mod fixtures;
pub mod query;
