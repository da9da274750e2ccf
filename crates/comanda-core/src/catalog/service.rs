//! Catalog service: filtered listings and summary figures.

use comanda_types::catalog::{
    Customer, CustomerSummary, MenuCategory, MenuItem, Reservation, ReservationSummary,
};
use comanda_types::error::RepositoryError;
use tracing::debug;

use super::filter::{self, CustomerFilter, MenuFilter, ReservationFilter};
use super::source::CatalogSource;

/// Read-side service over a [`CatalogSource`].
///
/// Generic over the source to keep comanda-core free of any storage crate.
pub struct CatalogService<S: CatalogSource> {
    source: S,
}

impl<S: CatalogSource> CatalogService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn customers(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, RepositoryError> {
        let customers: Vec<Customer> = self
            .source
            .customers()
            .await?
            .into_iter()
            .filter(|customer| filter.matches(customer))
            .collect();
        debug!(count = customers.len(), "customers listed");
        Ok(customers)
    }

    /// Summary over all customers, regardless of any search.
    pub async fn customer_summary(&self) -> Result<CustomerSummary, RepositoryError> {
        let customers = self.source.customers().await?;
        Ok(filter::summarize_customers(&customers))
    }

    pub async fn menu(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, RepositoryError> {
        let items: Vec<MenuItem> = self
            .source
            .menu_items()
            .await?
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();
        debug!(count = items.len(), "menu items listed");
        Ok(items)
    }

    pub async fn menu_categories(&self) -> Result<Vec<MenuCategory>, RepositoryError> {
        let items = self.source.menu_items().await?;
        Ok(filter::menu_categories(&items))
    }

    /// Reservations ordered by date, then time.
    pub async fn reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let mut reservations: Vec<Reservation> = self
            .source
            .reservations()
            .await?
            .into_iter()
            .filter(|reservation| filter.matches(reservation))
            .collect();
        reservations.sort_by_key(|r| (r.date, r.time));
        debug!(count = reservations.len(), "reservations listed");
        Ok(reservations)
    }

    pub async fn reservation_summary(&self) -> Result<ReservationSummary, RepositoryError> {
        let reservations = self.source.reservations().await?;
        Ok(filter::summarize_reservations(&reservations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::tests::{customer, item, reservation};
    use chrono::NaiveDate;
    use comanda_types::catalog::ReservationStatus;

    struct InMemorySource {
        customers: Vec<Customer>,
        items: Vec<MenuItem>,
        reservations: Vec<Reservation>,
    }

    impl CatalogSource for InMemorySource {
        async fn customers(&self) -> Result<Vec<Customer>, RepositoryError> {
            Ok(self.customers.clone())
        }

        async fn menu_items(&self) -> Result<Vec<MenuItem>, RepositoryError> {
            Ok(self.items.clone())
        }

        async fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
            Ok(self.reservations.clone())
        }
    }

    struct BrokenSource;

    impl CatalogSource for BrokenSource {
        async fn customers(&self) -> Result<Vec<Customer>, RepositoryError> {
            Err(RepositoryError::Read("disk gone".to_string()))
        }

        async fn menu_items(&self) -> Result<Vec<MenuItem>, RepositoryError> {
            Err(RepositoryError::Read("disk gone".to_string()))
        }

        async fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
            Err(RepositoryError::Read("disk gone".to_string()))
        }
    }

    fn service() -> CatalogService<InMemorySource> {
        let mut late = reservation("Carlos Rodríguez", "Centro", 6, ReservationStatus::Confirmed);
        late.date = NaiveDate::from_ymd_opt(2025, 11, 12).unwrap();

        CatalogService::new(InMemorySource {
            customers: vec![
                customer("Juan Pérez", "juan@email.com", "+52 81 1234 5678", 15, true),
                customer("María García", "maria@email.com", "+52 81 8765 4321", 8, false),
            ],
            items: vec![
                item("Tacos al Pastor", "Cerdo marinado", "Platillos Fuertes", true),
                item("Guacamole", "Aguacate fresco", "Entradas", false),
            ],
            reservations: vec![
                late,
                reservation("Juan Pérez", "La Casona", 4, ReservationStatus::Confirmed),
                reservation("María García", "Centro", 2, ReservationStatus::Pending),
            ],
        })
    }

    #[tokio::test]
    async fn filtered_listings() {
        let service = service();

        let customers = service
            .customers(&CustomerFilter {
                search: Some("maría".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "María García");

        let menu = service
            .menu(&MenuFilter {
                search: None,
                category: Some("Entradas".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "Guacamole");
    }

    #[tokio::test]
    async fn reservations_sorted_by_date() {
        let service = service();
        let reservations = service
            .reservations(&ReservationFilter::default())
            .await
            .unwrap();
        assert_eq!(reservations.len(), 3);
        assert_eq!(reservations[2].customer_name, "Carlos Rodríguez");
    }

    #[tokio::test]
    async fn summaries() {
        let service = service();
        let customers = service.customer_summary().await.unwrap();
        assert_eq!(customers.total, 2);
        assert_eq!(customers.average_visits, 11.5);

        let reservations = service.reservation_summary().await.unwrap();
        assert_eq!(reservations.expected_guests, 12);

        let categories = service.menu_categories().await.unwrap();
        assert_eq!(categories[1].name, "Entradas");
        assert_eq!(categories[1].available, 0);
    }

    #[tokio::test]
    async fn source_errors_propagate() {
        let service = CatalogService::new(BrokenSource);
        let err = service.customer_summary().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Read(_)));
        assert!(service.menu(&MenuFilter::default()).await.is_err());
    }
}
