//! Domain entities shared by every layer.
//!
//! These are the shapes the local store persists (camelCase JSON) and the shapes the
//! rest of the crate works with. The remote backend speaks a different, snake_case wire
//! shape; see [`crate::core::wire`] for the translation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw material or part with a unit price (chain by the meter, beads by the piece).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique identifier within the components collection
    pub id: String,
    /// Display name (e.g., "Lobster Clasp")
    pub name: String,
    /// Price per unit
    pub price: f64,
    /// Unit the price applies to: `pcs`, `gram`, `meter`, `pack`, ...
    pub unit: String,
    /// Free-form grouping (e.g., "Findings")
    pub category: String,
}

/// One line of a product recipe.
///
/// `component_id` is a soft reference: it may point at a component that no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductComponent {
    /// Id of the referenced [`Component`]
    pub component_id: String,
    /// How many units of the component the product uses
    pub quantity: f64,
}

impl ProductComponent {
    /// Creates a recipe line.
    #[must_use]
    pub fn new(component_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            component_id: component_id.into(),
            quantity,
        }
    }
}

/// A sellable item: an ordered recipe of components plus a fixed making charge.
///
/// Total cost is always derived with [`crate::core::cost`], never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier within the products collection
    pub id: String,
    /// Display name
    pub name: String,
    /// Stock keeping unit, may be empty
    #[serde(default)]
    pub sku: String,
    /// Labor/overhead added on top of material cost
    pub making_charges: f64,
    /// Recipe lines in insertion order
    #[serde(default)]
    pub components: Vec<ProductComponent>,
}

/// The two entity collections the data service manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Raw components
    Components,
    /// Product recipes
    Products,
}

impl EntityKind {
    /// Key of the collection in the local durable store.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Components => "jewel_components",
            Self::Products => "jewel_products",
        }
    }

    /// Collection path segment on the remote backend.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Products => "products",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Generates a fresh entity id.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
