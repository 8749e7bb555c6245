//! Product business logic - recipe building and product creation.
//!
//! A recipe is edited in memory with [`RecipeBuilder`] (which also gives a live cost
//! estimate) and turned into a [`Product`] with [`new_product`]. Persisting it is the
//! data service's job.

use crate::{
    core::cost::{CostBreakdown, calculate_cost},
    errors::{Error, Result},
    models::{Component, Product, ProductComponent, generate_id},
};

/// In-progress recipe for a new product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeBuilder {
    lines: Vec<ProductComponent>,
}

impl RecipeBuilder {
    /// An empty recipe.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Adds one unit of a component: a new line with quantity 1, or +1 on the existing line.
    pub fn add_component(&mut self, component_id: &str) -> &mut Self {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.component_id == component_id)
        {
            line.quantity += 1.0;
        } else {
            self.lines.push(ProductComponent::new(component_id, 1.0));
        }
        self
    }

    /// Sets the quantity of a component, adding the line if it is not there yet.
    pub fn set_quantity(&mut self, component_id: &str, quantity: f64) -> &mut Self {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.component_id == component_id)
        {
            line.quantity = quantity;
        } else {
            self.lines.push(ProductComponent::new(component_id, quantity));
        }
        self
    }

    /// Removes a component's line from the recipe.
    pub fn remove_component(&mut self, component_id: &str) -> &mut Self {
        self.lines.retain(|line| line.component_id != component_id);
        self
    }

    /// Current recipe lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[ProductComponent] {
        &self.lines
    }

    /// Live cost estimate for the recipe with the given making charges.
    #[must_use]
    pub fn estimate(&self, components: &[Component], making_charges: f64) -> CostBreakdown {
        calculate_cost(&self.lines, components, making_charges)
    }

    /// Consumes the builder, returning the recipe lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<ProductComponent> {
        self.lines
    }
}

/// Builds a new product with a fresh id, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The making charges are negative or not finite
pub fn new_product(
    name: &str,
    sku: &str,
    making_charges: f64,
    recipe: Vec<ProductComponent>,
) -> Result<Product> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Product name required".to_string(),
        });
    }

    if !making_charges.is_finite() || making_charges < 0.0 {
        return Err(Error::InvalidAmount {
            amount: making_charges,
        });
    }

    Ok(Product {
        id: generate_id(),
        name: name.to_string(),
        sku: sku.trim().to_string(),
        making_charges,
        components: recipe,
    })
}

/// Parses a recipe line written as `component_id:quantity` (quantity defaults to 1).
///
/// # Errors
/// Returns an error if the id is empty or the quantity is not a finite number.
pub fn parse_recipe_line(spec: &str) -> Result<ProductComponent> {
    let (id, quantity) = match spec.rsplit_once(':') {
        Some((id, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|q| q.is_finite())
                .ok_or_else(|| Error::Validation {
                    message: format!("Invalid quantity in recipe line '{spec}'"),
                })?;
            (id.trim(), quantity)
        }
        None => (spec.trim(), 1.0),
    };

    if id.is_empty() {
        return Err(Error::Validation {
            message: format!("Missing component id in recipe line '{spec}'"),
        });
    }

    Ok(ProductComponent::new(id, quantity))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::sample_component;

    #[test]
    fn test_add_component_increments_existing_line() {
        let mut recipe = RecipeBuilder::new();
        recipe.add_component("a").add_component("b").add_component("a");

        assert_eq!(
            recipe.lines(),
            &[ProductComponent::new("a", 2.0), ProductComponent::new("b", 1.0)]
        );
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut recipe = RecipeBuilder::new();
        recipe.add_component("a").set_quantity("a", 0.25).set_quantity("c", 3.0);
        assert_eq!(
            recipe.lines(),
            &[ProductComponent::new("a", 0.25), ProductComponent::new("c", 3.0)]
        );

        recipe.remove_component("a");
        assert_eq!(recipe.into_lines(), vec![ProductComponent::new("c", 3.0)]);
    }

    #[test]
    fn test_estimate_tracks_recipe() {
        let components = vec![sample_component("a", 12.5), sample_component("b", 0.5)];
        let mut recipe = RecipeBuilder::new();
        assert_eq!(recipe.estimate(&components, 25.0).total_cost, 25.0);

        recipe.set_quantity("a", 0.5).set_quantity("b", 10.0);
        let estimate = recipe.estimate(&components, 25.0);
        assert_eq!(estimate.material_cost, 11.25);
        assert_eq!(estimate.total_cost, 36.25);
    }

    #[test]
    fn test_new_product_validation() {
        let result = new_product("", "SKU", 1.0, vec![]);
        assert!(matches!(result, Err(Error::Validation { message }) if message == "Product name required"));

        let result = new_product("Ring", "SKU", -1.0, vec![]);
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -1.0 })));

        let result = new_product("Ring", "SKU", f64::INFINITY, vec![]);
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
    }

    #[test]
    fn test_new_product_keeps_recipe_order() {
        let recipe = vec![ProductComponent::new("z", 1.0), ProductComponent::new("a", 2.0)];
        let product = new_product(" Bangle ", " BG-1 ", 0.0, recipe.clone()).unwrap();

        assert_eq!(product.name, "Bangle");
        assert_eq!(product.sku, "BG-1");
        assert_eq!(product.making_charges, 0.0);
        assert_eq!(product.components, recipe);
        assert!(!product.id.is_empty());
    }

    #[test]
    fn test_parse_recipe_line() {
        assert_eq!(
            parse_recipe_line("abc:2.5").unwrap(),
            ProductComponent::new("abc", 2.5)
        );
        assert_eq!(
            parse_recipe_line("abc").unwrap(),
            ProductComponent::new("abc", 1.0)
        );
        assert_eq!(
            parse_recipe_line("x:-1").unwrap(),
            ProductComponent::new("x", -1.0)
        );
        assert!(matches!(
            parse_recipe_line("abc:many"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_recipe_line(":2"),
            Err(Error::Validation { .. })
        ));
    }
}
