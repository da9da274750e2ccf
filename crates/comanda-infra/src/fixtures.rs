//! TOML-backed catalog source.
//!
//! The restaurant's customers, menu and reservations are read from a single
//! fixture file (`{data_dir}/fixtures.toml` by default) with one array of
//! tables per record type. Dates and times are quoted strings
//! (`"2025-11-10"`, `"19:00:00"`).

use std::path::Path;

use serde::Deserialize;

use comanda_core::catalog::CatalogSource;
use comanda_types::catalog::{Customer, MenuItem, Reservation};
use comanda_types::error::RepositoryError;

#[derive(Debug, Clone, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    customers: Vec<Customer>,
    #[serde(default)]
    menu: Vec<MenuItem>,
    #[serde(default)]
    reservations: Vec<Reservation>,
}

/// In-memory catalog loaded once from a fixture file.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    data: FixtureFile,
}

impl FixtureCatalog {
    /// Load the fixture file at `path`.
    ///
    /// A missing file yields an empty catalog; an unreadable or malformed
    /// file is an error.
    pub async fn load(path: &Path) -> Result<Self, RepositoryError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No fixture file at {}, catalog is empty", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(RepositoryError::Read(format!("{}: {err}", path.display())));
            }
        };

        let catalog = Self::from_toml(&content)
            .map_err(|err| RepositoryError::Parse(format!("{}: {err}", path.display())))?;
        tracing::info!(
            customers = catalog.data.customers.len(),
            menu_items = catalog.data.menu.len(),
            reservations = catalog.data.reservations.len(),
            "catalog fixtures loaded from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Parse fixture TOML.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let data: FixtureFile = toml::from_str(content)?;
        Ok(Self { data })
    }

    pub fn is_empty(&self) -> bool {
        self.data.customers.is_empty()
            && self.data.menu.is_empty()
            && self.data.reservations.is_empty()
    }
}

impl CatalogSource for FixtureCatalog {
    async fn customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.data.customers.clone())
    }

    async fn menu_items(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        Ok(self.data.menu.clone())
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self.data.reservations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use comanda_types::catalog::ReservationStatus;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[[customers]]
id = "1"
name = "Juan Pérez"
email = "juan.perez@email.com"
phone = "+52 81 1234 5678"
total_visits = 15
last_visit = "2025-11-01"
preferences = ["Mesa junto a la ventana", "Vino tinto"]
allergies = ["Mariscos"]
vip = true

[[menu]]
id = "1"
name = "Tacos al Pastor"
description = "Tacos de cerdo marinado con piña, cebolla y cilantro"
price = 120
category = "Platillos Fuertes"

[[menu]]
id = "3"
name = "Guacamole"
description = "Aguacate fresco con tomate, cebolla y limón"
price = 80
category = "Entradas"
available = false

[[reservations]]
id = "1"
customer_name = "Juan Pérez"
phone = "+52 81 1234 5678"
date = "2025-11-10"
time = "19:00:00"
guests = 4
location = "La Casona"
status = "confirmed"
"#;

    #[test]
    fn parses_all_sections() {
        let catalog = FixtureCatalog::from_toml(SAMPLE).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.data.customers[0].allergies, vec!["Mariscos"]);
        assert_eq!(
            catalog.data.customers[0].last_visit,
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
        );
        assert!(catalog.data.menu[0].available);
        assert!(!catalog.data.menu[1].available);
        assert_eq!(
            catalog.data.reservations[0].time,
            NaiveTime::from_hms_opt(19, 0, 0).unwrap()
        );
        assert_eq!(catalog.data.reservations[0].status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn bundled_sample_catalog_parses() {
        let catalog =
            FixtureCatalog::from_toml(include_str!("../../../fixtures/restaurant.toml")).unwrap();
        assert_eq!(catalog.customers().await.unwrap().len(), 3);
        assert_eq!(catalog.menu_items().await.unwrap().len(), 4);
        let reservations = catalog.reservations().await.unwrap();
        assert_eq!(reservations.len(), 3);
        assert_eq!(reservations[2].location, "Valle");
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let catalog = FixtureCatalog::load(&tmp.path().join("fixtures.toml"))
            .await
            .unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_from_disk_serves_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fixtures.toml");
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let catalog = FixtureCatalog::load(&path).await.unwrap();
        assert_eq!(catalog.customers().await.unwrap().len(), 1);
        assert_eq!(catalog.menu_items().await.unwrap().len(), 2);
        assert_eq!(catalog.reservations().await.unwrap()[0].guests, 4);
    }

    #[tokio::test]
    async fn load_malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fixtures.toml");
        tokio::fs::write(&path, "[[customers]]\nid = 1\n").await.unwrap();

        let err = FixtureCatalog::load(&path).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Parse(_)));
    }
}
