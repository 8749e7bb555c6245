//! Cost calculation.
//!
//! Product cost is derived, never stored:
//! `total = making_charges + Σ price(component) × quantity`.
//! A recipe line whose component no longer exists contributes nothing, and quantities
//! are used as given (zero and negative values are not clamped).

use crate::models::{Component, Product, ProductComponent};
use std::collections::HashMap;

/// Cost of one product split into material and labor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// Sum of resolved component price × quantity
    pub material_cost: f64,
    /// Labor charge added on top
    pub making_charges: f64,
    /// `material_cost + making_charges`
    pub total_cost: f64,
}

/// Component prices indexed by id.
///
/// When ids are duplicated the first component wins, matching a front-to-back search.
#[derive(Debug, Clone, Default)]
pub struct PriceBook<'a> {
    prices: HashMap<&'a str, f64>,
}

impl<'a> PriceBook<'a> {
    /// Indexes the prices of `components`.
    #[must_use]
    pub fn new(components: &'a [Component]) -> Self {
        let mut prices = HashMap::with_capacity(components.len());
        for component in components {
            prices.entry(component.id.as_str()).or_insert(component.price);
        }
        Self { prices }
    }

    /// Price of the component with `id`, if it exists.
    #[must_use]
    pub fn price(&self, id: &str) -> Option<f64> {
        self.prices.get(id).copied()
    }

    /// Material cost of a recipe; unresolved lines contribute 0.
    #[must_use]
    pub fn material_cost(&self, recipe: &[ProductComponent]) -> f64 {
        recipe.iter().fold(0.0, |sum, line| {
            sum + self
                .price(&line.component_id)
                .map_or(0.0, |price| price * line.quantity)
        })
    }

    /// Full breakdown for a recipe and labor charge.
    #[must_use]
    pub fn breakdown(&self, recipe: &[ProductComponent], making_charges: f64) -> CostBreakdown {
        let material_cost = self.material_cost(recipe);
        CostBreakdown {
            material_cost,
            making_charges,
            total_cost: material_cost + making_charges,
        }
    }
}

/// Material cost of `recipe` against the `components` lookup.
#[must_use]
pub fn material_cost(recipe: &[ProductComponent], components: &[Component]) -> f64 {
    PriceBook::new(components).material_cost(recipe)
}

/// Material and total cost of `recipe` plus `making_charges`.
#[must_use]
pub fn calculate_cost(
    recipe: &[ProductComponent],
    components: &[Component],
    making_charges: f64,
) -> CostBreakdown {
    PriceBook::new(components).breakdown(recipe, making_charges)
}

/// Cost of a stored product.
#[must_use]
pub fn product_cost(product: &Product, components: &[Component]) -> CostBreakdown {
    calculate_cost(&product.components, components, product.making_charges)
}

/// Sum of the total cost of every product, one unit each.
#[must_use]
pub fn portfolio_value(products: &[Product], components: &[Component]) -> f64 {
    let book = PriceBook::new(components);
    products.iter().fold(0.0, |sum, product| {
        sum + book
            .breakdown(&product.components, product.making_charges)
            .total_cost
    })
}
