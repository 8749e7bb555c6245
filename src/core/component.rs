//! Component business logic - creation, price edits and search.

use crate::{
    errors::{Error, Result},
    models::{Component, generate_id},
};

/// Unit used when none is given.
pub const DEFAULT_UNIT: &str = "pcs";

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "General";

/// Builds a new component with a fresh id, performing input validation.
///
/// The name is trimmed; blank unit and category fall back to [`DEFAULT_UNIT`] and
/// [`DEFAULT_CATEGORY`].
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The price is zero, negative or not finite (NaN, infinity)
pub fn new_component(name: &str, price: f64, unit: &str, category: &str) -> Result<Component> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Component name required".to_string(),
        });
    }

    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }

    Ok(Component {
        id: generate_id(),
        name: name.to_string(),
        price,
        unit: non_blank_or(unit, DEFAULT_UNIT),
        category: non_blank_or(category, DEFAULT_CATEGORY),
    })
}

/// Returns a copy of `component` with a new price.
///
/// # Errors
/// Returns an error if the price is negative or not finite.
pub fn with_price(component: &Component, price: f64) -> Result<Component> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(Component {
        price,
        ..component.clone()
    })
}

/// Finds a component by id.
#[must_use]
pub fn find_component<'a>(components: &'a [Component], id: &str) -> Option<&'a Component> {
    components.iter().find(|c| c.id == id)
}

/// Case-insensitive search over component names and categories.
///
/// An empty term matches everything.
#[must_use]
pub fn search_components<'a>(components: &'a [Component], term: &str) -> Vec<&'a Component> {
    let needle = term.trim().to_lowercase();
    components
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.category.to_lowercase().contains(&needle)
        })
        .collect()
}

pub(crate) fn non_blank_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
