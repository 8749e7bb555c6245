//! Seed catalog loading from a TOML file.
//!
//! The seed catalog is what a brand-new installation starts with when both entity
//! collections are empty. A built-in catalog is used when no file is present.

use crate::errors::{Error, Result};
use crate::models::{Component, Product, ProductComponent};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Seed catalog as written in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedCatalog {
    /// Components to seed
    #[serde(default)]
    pub components: Vec<SeedComponent>,
    /// Products to seed
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// A component entry in the seed catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedComponent {
    /// Component id
    pub id: String,
    /// Component name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Unit of measure
    pub unit: String,
    /// Category
    pub category: String,
}

/// A product entry in the seed catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedProduct {
    /// Product id
    pub id: String,
    /// Product name
    pub name: String,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: String,
    /// Labor charge
    #[serde(default)]
    pub making_charges: f64,
    /// Recipe
    #[serde(default)]
    pub components: Vec<SeedRecipeLine>,
}

/// A recipe line in the seed catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedRecipeLine {
    /// Referenced component id
    pub component_id: String,
    /// Quantity used
    pub quantity: f64,
}

impl SeedCatalog {
    /// Seed components as domain entities.
    #[must_use]
    pub fn components(&self) -> Vec<Component> {
        self.components
            .iter()
            .map(|c| Component {
                id: c.id.clone(),
                name: c.name.clone(),
                price: c.price,
                unit: c.unit.clone(),
                category: c.category.clone(),
            })
            .collect()
    }

    /// Seed products as domain entities.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products
            .iter()
            .map(|p| Product {
                id: p.id.clone(),
                name: p.name.clone(),
                sku: p.sku.clone(),
                making_charges: p.making_charges,
                components: p
                    .components
                    .iter()
                    .map(|line| ProductComponent::new(line.component_id.clone(), line.quantity))
                    .collect(),
            })
            .collect()
    }
}

impl Default for SeedCatalog {
    /// The built-in starter catalog: four findings and one necklace using three of them.
    fn default() -> Self {
        let component = |id: &str, name: &str, price: f64, unit: &str, category: &str| {
            SeedComponent {
                id: id.to_string(),
                name: name.to_string(),
                price,
                unit: unit.to_string(),
                category: category.to_string(),
            }
        };
        let line = |component_id: &str, quantity: f64| SeedRecipeLine {
            component_id: component_id.to_string(),
            quantity,
        };

        Self {
            components: vec![
                component("1", "Gold Plated Chain (Fine)", 12.50, "meter", "Chain"),
                component("2", "Crystal Bead 4mm", 0.50, "pcs", "Beads"),
                component("3", "Lobster Clasp", 2.00, "pcs", "Findings"),
                component("4", "Pendant Base (Brass)", 15.00, "pcs", "Pendants"),
            ],
            products: vec![SeedProduct {
                id: "p1".to_string(),
                name: "Crystal Simple Necklace".to_string(),
                sku: "NCK-001".to_string(),
                making_charges: 25.00,
                components: vec![line("1", 0.5), line("2", 10.0), line("3", 1.0)],
            }],
        }
    }
}

/// Loads a seed catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<SeedCatalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog file: {e}"),
    })
}

/// Loads the seed catalog from `path`, or the built-in catalog when the file does not exist.
pub fn load_catalog_or_default<P: AsRef<Path>>(path: P) -> Result<SeedCatalog> {
    let path = path.as_ref();
    if path.exists() {
        info!("Loading seed catalog from {:?}", path);
        load_catalog(path)
    } else {
        debug!("No seed catalog at {:?}, using built-in defaults", path);
        Ok(SeedCatalog::default())
    }
}
