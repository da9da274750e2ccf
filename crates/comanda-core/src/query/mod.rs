//! Query service abstractions for Comanda.
//!
//! - `QueryService`: RPITIT trait for concrete backends (HTTP, in-process)
//! - `BoxQueryService`: object-safe, cloneable wrapper for runtime selection

pub mod box_service;
pub mod service;

pub use box_service::BoxQueryService;
pub use service::QueryService;
