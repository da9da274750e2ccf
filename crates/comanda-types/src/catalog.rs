//! Catalog record types for Comanda: customers, menu items, reservations.
//!
//! These are read-only records served by a data-access collaborator and
//! rendered by the CRM, menu and reservations views, plus the summary
//! figures those views show above their tables.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A customer relationship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_visits: u32,
    pub last_visit: NaiveDate,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub vip: bool,
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in the restaurant's currency, whole units.
    pub price: u32,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Confirmation state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "pending" => Ok(ReservationStatus::Pending),
            "cancelled" | "canceled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("invalid reservation status: '{other}'")),
        }
    }
}

/// A table reservation at one of the restaurant's locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: u32,
    pub location: String,
    pub status: ReservationStatus,
}

/// Figures shown above the customer table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub total: usize,
    pub vip: usize,
    /// Average visits per customer, rounded to one decimal.
    pub average_visits: f64,
    pub with_preferences: usize,
}

/// Figures shown above the reservation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationSummary {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
    /// Guests across reservations that are not cancelled.
    pub expected_guests: u32,
}

/// One menu category with availability counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub name: String,
    pub items: usize,
    pub available: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_status_from_str() {
        assert_eq!(
            "Confirmed".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Confirmed
        );
        assert_eq!(
            "canceled".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Cancelled
        );
        assert!("seated".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_menu_item_available_defaults_true() {
        let json = r#"{
            "id": "3",
            "name": "Guacamole",
            "description": "Fresh avocado with tomatoes, onions, and lime",
            "price": 80,
            "category": "Entradas"
        }"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.available);
    }

    #[test]
    fn test_reservation_deserialize() {
        let json = r#"{
            "id": "1",
            "customer_name": "Juan Pérez",
            "phone": "+52 81 1234 5678",
            "date": "2025-11-10",
            "time": "19:00:00",
            "guests": 4,
            "location": "La Casona",
            "status": "confirmed"
        }"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();
        assert_eq!(reservation.guests, 4);
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.time, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }
}
