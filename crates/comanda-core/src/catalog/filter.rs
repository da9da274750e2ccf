//! Catalog filters and summary figures.

use comanda_types::catalog::{
    Customer, CustomerSummary, MenuCategory, MenuItem, Reservation, ReservationStatus,
    ReservationSummary,
};

/// Category values that select every menu item.
const ALL_CATEGORIES: [&str; 2] = ["todos", "all"];

/// Search criteria for the customer table.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive on name and email; raw substring on phone.
    pub search: Option<String>,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        let Some(search) = self.search.as_deref() else {
            return true;
        };
        let needle = search.to_lowercase();
        customer.name.to_lowercase().contains(&needle)
            || customer.email.to_lowercase().contains(&needle)
            || customer.phone.contains(search)
    }
}

/// Search and category criteria for the menu.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    /// Case-insensitive on name and description.
    pub search: Option<String>,
    /// Exact category; `Todos`/`all` or `None` select every category.
    pub category: Option<String>,
}

impl MenuFilter {
    pub fn matches(&self, item: &MenuItem) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(search) => {
                let needle = search.to_lowercase();
                item.name.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
            }
            None => true,
        };
        let matches_category = match self.category.as_deref() {
            Some(category) if !is_all_categories(category) => item.category == category,
            _ => true,
        };
        matches_search && matches_category
    }
}

fn is_all_categories(category: &str) -> bool {
    ALL_CATEGORIES.contains(&category.to_lowercase().as_str())
}

/// Status and search criteria for the reservation table.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    /// Case-insensitive on customer name, location and phone.
    pub search: Option<String>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if self.status.is_some_and(|status| reservation.status != status) {
            return false;
        }
        let Some(search) = self.search.as_deref() else {
            return true;
        };
        let needle = search.to_lowercase();
        reservation.customer_name.to_lowercase().contains(&needle)
            || reservation.location.to_lowercase().contains(&needle)
            || reservation.phone.to_lowercase().contains(&needle)
    }
}

pub fn summarize_customers(customers: &[Customer]) -> CustomerSummary {
    let total = customers.len();
    let visits: u64 = customers.iter().map(|c| u64::from(c.total_visits)).sum();
    let average_visits = if total == 0 {
        0.0
    } else {
        (visits as f64 / total as f64 * 10.0).round() / 10.0
    };

    CustomerSummary {
        total,
        vip: customers.iter().filter(|c| c.vip).count(),
        average_visits,
        with_preferences: customers.iter().filter(|c| !c.preferences.is_empty()).count(),
    }
}

pub fn summarize_reservations(reservations: &[Reservation]) -> ReservationSummary {
    let count = |status| reservations.iter().filter(|r| r.status == status).count();

    ReservationSummary {
        total: reservations.len(),
        confirmed: count(ReservationStatus::Confirmed),
        pending: count(ReservationStatus::Pending),
        cancelled: count(ReservationStatus::Cancelled),
        expected_guests: reservations
            .iter()
            .filter(|r| r.status != ReservationStatus::Cancelled)
            .map(|r| r.guests)
            .sum(),
    }
}

/// Distinct categories in first-seen order.
pub fn menu_categories(items: &[MenuItem]) -> Vec<MenuCategory> {
    let mut categories: Vec<MenuCategory> = Vec::new();
    for item in items {
        let index = match categories.iter().position(|c| c.name == item.category) {
            Some(index) => index,
            None => {
                categories.push(MenuCategory {
                    name: item.category.clone(),
                    items: 0,
                    available: 0,
                });
                categories.len() - 1
            }
        };
        categories[index].items += 1;
        if item.available {
            categories[index].available += 1;
        }
    }
    categories
}
