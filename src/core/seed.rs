//! Initial load and first-run seeding.
//!
//! On startup the working catalog is fetched through the data service. When the
//! component collection is empty the seed catalog's components are used, and when both
//! collections were empty its products are used too. Seeded entities are persisted only
//! while offline; with a live backend they stay in memory and are never written to it.

use crate::config::catalog::SeedCatalog;
use crate::core::remote::RemoteBackend;
use crate::core::service::DataService;
use crate::errors::Result;
use crate::models::{Component, Product};
use std::collections::HashSet;
use tracing::{error, info, instrument, warn};

/// The catalog the application works with after startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedCatalog {
    /// Working components
    pub components: Vec<Component>,
    /// Working products
    pub products: Vec<Product>,
    /// Whether `components` came from the seed catalog
    pub seeded_components: bool,
    /// Whether `products` came from the seed catalog
    pub seeded_products: bool,
    /// Whether seeded entities were written through the data service
    pub seed_persisted: bool,
}

impl LoadedCatalog {
    /// Ids of seeded components that exist only in memory.
    #[must_use]
    pub fn unsaved_component_ids(&self) -> HashSet<String> {
        if !self.seeded_components || self.seed_persisted {
            return HashSet::new();
        }
        self.components.iter().map(|c| c.id.clone()).collect()
    }

    /// Ids of seeded products that exist only in memory.
    #[must_use]
    pub fn unsaved_product_ids(&self) -> HashSet<String> {
        if !self.seeded_products || self.seed_persisted {
            return HashSet::new();
        }
        self.products.iter().map(|p| p.id.clone()).collect()
    }
}

/// Loads components and products, seeding defaults on first run.
///
/// Never fails: a hard failure while fetching is logged and yields an empty catalog.
#[instrument(skip_all)]
pub async fn initial_load<B: RemoteBackend>(
    service: &DataService<B>,
    defaults: &SeedCatalog,
) -> LoadedCatalog {
    let fetched = fetch_all(service).await;
    match fetched {
        Ok((components, products)) => {
            apply_seed_policy(service, components, products, defaults).await
        }
        Err(e) => {
            error!("Failed to load data: {}", e);
            LoadedCatalog::default()
        }
    }
}

async fn fetch_all<B: RemoteBackend>(
    service: &DataService<B>,
) -> Result<(Vec<Component>, Vec<Product>)> {
    let components = service.fetch_components().await?;
    let products = service.fetch_products().await?;
    Ok((components, products))
}

/// Applies the first-run seed policy to freshly fetched collections.
pub async fn apply_seed_policy<B: RemoteBackend>(
    service: &DataService<B>,
    components: Vec<Component>,
    products: Vec<Product>,
    defaults: &SeedCatalog,
) -> LoadedCatalog {
    let persist = !service.is_online();
    let seed_components = components.is_empty();
    let seed_products = products.is_empty() && components.is_empty();

    let components = if seed_components {
        let seeded = defaults.components();
        info!(
            "No components found, seeding {} defaults (persist: {})",
            seeded.len(),
            persist
        );
        if persist {
            for component in &seeded {
                if let Err(e) = service.add_component(component.clone()).await {
                    warn!("Failed to persist seeded component '{}': {}", component.id, e);
                }
            }
        }
        seeded
    } else {
        components
    };

    let products = if seed_products {
        let seeded = defaults.products();
        info!(
            "No products found, seeding {} defaults (persist: {})",
            seeded.len(),
            persist
        );
        if persist {
            for product in &seeded {
                if let Err(e) = service.add_product(product.clone()).await {
                    warn!("Failed to persist seeded product '{}': {}", product.id, e);
                }
            }
        }
        seeded
    } else {
        products
    };

    LoadedCatalog {
        components,
        products,
        seeded_components: seed_components,
        seeded_products: seed_products,
        seed_persisted: persist && (seed_components || seed_products),
    }
}
