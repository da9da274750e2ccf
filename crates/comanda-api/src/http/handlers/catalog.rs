//! Restaurant catalog HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/customers?search=           - Filtered customer list
//! - GET /api/v1/customers/summary           - Customer figures
//! - GET /api/v1/menu?search=&category=      - Filtered menu
//! - GET /api/v1/menu/categories             - Categories with item counts
//! - GET /api/v1/reservations?status=&search= - Filtered reservations
//! - GET /api/v1/reservations/summary        - Reservation figures

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use comanda_core::catalog::{CustomerFilter, MenuFilter, ReservationFilter};
use comanda_types::catalog::{
    Customer, CustomerSummary, MenuCategory, MenuItem, Reservation, ReservationStatus,
    ReservationSummary,
};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReservationQuery {
    /// `confirmed`, `pending`, `cancelled`, or `all`.
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Empty query values mean "no filter".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_status(value: Option<String>) -> Result<Option<ReservationStatus>, AppError> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(AppError::Validation),
    }
}

/// GET /api/v1/customers
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, AppError> {
    let timer = RequestTimer::start();
    let filter = CustomerFilter {
        search: non_empty(query.search),
    };
    let customers = state.catalog.customers(&filter).await?;
    Ok(Json(
        timer
            .respond(customers)
            .with_link("summary", "/api/v1/customers/summary"),
    ))
}

/// GET /api/v1/customers/summary
pub async fn customer_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CustomerSummary>>, AppError> {
    let timer = RequestTimer::start();
    let summary = state.catalog.customer_summary().await?;
    Ok(Json(timer.respond(summary)))
}

/// GET /api/v1/menu
pub async fn list_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<ApiResponse<Vec<MenuItem>>>, AppError> {
    let timer = RequestTimer::start();
    let filter = MenuFilter {
        search: non_empty(query.search),
        category: non_empty(query.category),
    };
    let items = state.catalog.menu(&filter).await?;
    Ok(Json(
        timer
            .respond(items)
            .with_link("categories", "/api/v1/menu/categories"),
    ))
}

/// GET /api/v1/menu/categories
pub async fn menu_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MenuCategory>>>, AppError> {
    let timer = RequestTimer::start();
    let categories = state.catalog.menu_categories().await?;
    Ok(Json(timer.respond(categories)))
}

/// GET /api/v1/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, AppError> {
    let timer = RequestTimer::start();
    let filter = ReservationFilter {
        status: parse_status(query.status)?,
        search: non_empty(query.search),
    };
    let reservations = state.catalog.reservations(&filter).await?;
    Ok(Json(
        timer
            .respond(reservations)
            .with_link("summary", "/api/v1/reservations/summary"),
    ))
}

/// GET /api/v1/reservations/summary
pub async fn reservation_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReservationSummary>>, AppError> {
    let timer = RequestTimer::start();
    let summary = state.catalog.reservation_summary().await?;
    Ok(Json(timer.respond(summary)))
}
