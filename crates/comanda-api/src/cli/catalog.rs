//! Catalog listings: customers, menu and reservations.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use comanda_core::catalog::{CustomerFilter, MenuFilter, ReservationFilter};
use comanda_types::catalog::{
    Customer, CustomerSummary, MenuItem, Reservation, ReservationStatus, ReservationSummary,
};

use crate::state::AppState;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

/// Format a price in whole pesos.
fn format_price(price: u32) -> String {
    format!("${price}")
}

fn status_cell(status: ReservationStatus) -> Cell {
    match status {
        ReservationStatus::Confirmed => Cell::new("● confirmed").fg(Color::Green),
        ReservationStatus::Pending => Cell::new("○ pending").fg(Color::Yellow),
        ReservationStatus::Cancelled => Cell::new("◌ cancelled").fg(Color::DarkGrey),
    }
}

fn customers_table(customers: &[Customer]) -> Table {
    let mut table = table(&["Name", "Email", "Phone", "Visits", "Last visit", "Notes"]);
    for customer in customers {
        let name = if customer.vip {
            Cell::new(format!("★ {}", customer.name)).fg(Color::Yellow)
        } else {
            Cell::new(&customer.name).fg(Color::Cyan)
        };
        let mut notes = customer.preferences.clone();
        notes.extend(customer.allergies.iter().map(|a| format!("alergia: {a}")));
        table.add_row(vec![
            name,
            Cell::new(&customer.email),
            Cell::new(&customer.phone),
            Cell::new(customer.total_visits),
            Cell::new(customer.last_visit.format("%Y-%m-%d")).fg(Color::DarkGrey),
            Cell::new(notes.join(", ")),
        ]);
    }
    table
}

fn print_customer_summary(summary: &CustomerSummary) {
    println!(
        "  {} customers · {} VIP · {} average visits · {} with preferences",
        style(summary.total).bold(),
        style(summary.vip).yellow(),
        style(summary.average_visits).bold(),
        summary.with_preferences
    );
}

/// List customers matching `search`, followed by the overall summary.
pub async fn list_customers(state: &AppState, search: Option<String>, json: bool) -> anyhow::Result<()> {
    let customers = state.catalog.customers(&CustomerFilter { search }).await?;
    let summary = state.catalog.customer_summary().await?;

    if json {
        let out = serde_json::json!({ "customers": customers, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if customers.is_empty() {
        println!("\n  {}\n", style("No customers found.").dim());
    } else {
        println!("\n{}\n", customers_table(&customers));
    }
    print_customer_summary(&summary);
    println!();
    Ok(())
}

fn menu_table(items: &[MenuItem]) -> Table {
    let mut table = table(&["Name", "Category", "Price", "Available", "Description"]);
    for item in items {
        let available = if item.available {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("✗").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&item.name).fg(Color::Cyan),
            Cell::new(&item.category),
            Cell::new(format_price(item.price)),
            available,
            Cell::new(&item.description).fg(Color::DarkGrey),
        ]);
    }
    table
}

/// List menu items matching the search and category.
pub async fn list_menu(
    state: &AppState,
    search: Option<String>,
    category: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let items = state.catalog.menu(&MenuFilter { search, category }).await?;
    let categories = state.catalog.menu_categories().await?;

    if json {
        let out = serde_json::json!({ "items": items, "categories": categories });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("\n  {}\n", style("No menu items found.").dim());
    } else {
        println!("\n{}\n", menu_table(&items));
    }
    let names: Vec<String> = categories
        .iter()
        .map(|c| format!("{} ({}/{})", c.name, c.available, c.items))
        .collect();
    println!("  {} {}", style("Categories:").bold(), names.join(" · "));
    println!();
    Ok(())
}

fn reservations_table(reservations: &[Reservation]) -> Table {
    let mut table = table(&["Date", "Time", "Customer", "Guests", "Location", "Phone", "Status"]);
    for reservation in reservations {
        table.add_row(vec![
            Cell::new(reservation.date.format("%Y-%m-%d")),
            Cell::new(reservation.time.format("%H:%M")),
            Cell::new(&reservation.customer_name).fg(Color::Cyan),
            Cell::new(reservation.guests),
            Cell::new(&reservation.location),
            Cell::new(&reservation.phone).fg(Color::DarkGrey),
            status_cell(reservation.status),
        ]);
    }
    table
}

fn print_reservation_summary(summary: &ReservationSummary) {
    println!(
        "  {} reservations · {} confirmed · {} pending · {} cancelled · {} expected guests",
        style(summary.total).bold(),
        style(summary.confirmed).green(),
        style(summary.pending).yellow(),
        style(summary.cancelled).dim(),
        style(summary.expected_guests).bold()
    );
}

/// Parse the `--status` flag; `all` means no status filter.
fn parse_status(status: Option<&str>) -> anyhow::Result<Option<ReservationStatus>> {
    match status {
        None => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|e: String| anyhow::anyhow!(e)),
    }
}

/// List reservations by date and time.
pub async fn list_reservations(
    state: &AppState,
    status: Option<String>,
    search: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let filter = ReservationFilter {
        status: parse_status(status.as_deref())?,
        search,
    };
    let reservations = state.catalog.reservations(&filter).await?;
    let summary = state.catalog.reservation_summary().await?;

    if json {
        let out = serde_json::json!({ "reservations": reservations, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if reservations.is_empty() {
        println!("\n  {}\n", style("No reservations found.").dim());
    } else {
        println!("\n{}\n", reservations_table(&reservations));
    }
    print_reservation_summary(&summary);
    println!();
    Ok(())
}
