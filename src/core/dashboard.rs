//! Dashboard figures and formatting.
//!
//! All functions are framework-agnostic and return structured data or plain strings
//! that the command-line layer prints as-is.

use crate::{
    core::cost::{PriceBook, portfolio_value},
    models::{Component, Product},
};
use std::fmt::Write as _;

/// Catalog-wide figures.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Number of products
    pub product_count: usize,
    /// Number of components tracked
    pub component_count: usize,
    /// Sum of every product's total unit cost
    pub portfolio_value: f64,
}

/// Cost of a single product, as shown in product listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCostLine {
    /// Product id
    pub id: String,
    /// Product name
    pub name: String,
    /// Stock keeping unit
    pub sku: String,
    /// Material part of the cost
    pub material_cost: f64,
    /// Labor part of the cost
    pub making_charges: f64,
    /// Material plus labor
    pub total_cost: f64,
}

impl DashboardSummary {
    /// Computes the dashboard figures.
    #[must_use]
    pub fn build(products: &[Product], components: &[Component]) -> Self {
        Self {
            product_count: products.len(),
            component_count: components.len(),
            portfolio_value: portfolio_value(products, components),
        }
    }
}

/// Cost line for every product, in catalog order.
#[must_use]
pub fn cost_lines(products: &[Product], components: &[Component]) -> Vec<ProductCostLine> {
    let book = PriceBook::new(components);
    products
        .iter()
        .map(|product| {
            let breakdown = book.breakdown(&product.components, product.making_charges);
            ProductCostLine {
                id: product.id.clone(),
                name: product.name.clone(),
                sku: product.sku.clone(),
                material_cost: breakdown.material_cost,
                making_charges: breakdown.making_charges,
                total_cost: breakdown.total_cost,
            }
        })
        .collect()
}

/// Formats an amount as rupees with two decimals, e.g. `₹25.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-₹{:.2}", amount.abs())
    } else {
        format!("₹{amount:.2}")
    }
}

/// Formats a product cost line for listings.
#[must_use]
pub fn format_cost_line(line: &ProductCostLine) -> String {
    let sku = if line.sku.is_empty() {
        String::new()
    } else {
        format!(" [{}]", line.sku)
    };
    format!(
        "{}{} - total {} (material {}, making {}) id: {}",
        line.name,
        sku,
        format_currency(line.total_cost),
        format_currency(line.material_cost),
        format_currency(line.making_charges),
        line.id
    )
}

/// Formats the dashboard block.
#[must_use]
pub fn format_dashboard(summary: &DashboardSummary, online: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard ({})", mode_label(online));
    let _ = writeln!(
        out,
        "Total catalog value (unit cost): {}",
        format_currency(summary.portfolio_value)
    );
    let _ = writeln!(out, "Active products: {}", summary.product_count);
    let _ = write!(out, "Components tracked: {}", summary.component_count);
    out
}

/// Human-readable persistence mode.
#[must_use]
pub const fn mode_label(online: bool) -> &'static str {
    if online {
        "online: remote backend"
    } else {
        "offline: local storage"
    }
}
