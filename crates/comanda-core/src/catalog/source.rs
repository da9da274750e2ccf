//! Catalog source trait definition.

use comanda_types::catalog::{Customer, MenuItem, Reservation};
use comanda_types::error::RepositoryError;

/// Read-only access to the restaurant's catalog records.
///
/// Implementations live in comanda-infra (e.g., `FixtureCatalog`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait CatalogSource: Send + Sync {
    fn customers(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Customer>, RepositoryError>> + Send;

    fn menu_items(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<MenuItem>, RepositoryError>> + Send;

    fn reservations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Reservation>, RepositoryError>> + Send;
}
