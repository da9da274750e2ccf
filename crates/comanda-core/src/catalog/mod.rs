//! Catalog port and view logic (ports).
//!
//! `CatalogSource` is the data-access interface the infrastructure layer
//! implements. Filtering and summary figures live here so every front end
//! (HTTP, CLI) shows the same numbers.

pub mod filter;
pub mod service;
pub mod source;

pub use filter::{CustomerFilter, MenuFilter, ReservationFilter};
pub use service::CatalogService;
pub use source::CatalogSource;
