//! Local durable store.
//!
//! Two named collections (`jewel_components`, `jewel_products`), each a JSON array of
//! the corresponding entity, kept as one row of the `collections` table. Every read
//! loads the whole document and every write replaces it; a missing row is an empty
//! collection.

use crate::config::database;
use crate::entities::{Collection, collection};
use crate::errors::Result;
use crate::models::{Component, EntityKind, Product};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Whole-document key-value store for entity collections.
#[derive(Debug)]
pub struct LocalStore {
    db: DatabaseConnection,
}

impl LocalStore {
    /// Wraps an already prepared connection (tables must exist).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and creates the collection table if needed.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = database::create_connection(database_url).await?;
        Ok(Self::new(db))
    }

    /// Underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Loads every entity stored under `kind`.
    #[instrument(skip(self))]
    pub async fn load<T: DeserializeOwned>(&self, kind: EntityKind) -> Result<Vec<T>> {
        let row = Collection::find_by_id(kind.storage_key().to_string())
            .one(&self.db)
            .await?;

        match row {
            Some(row) => {
                let items: Vec<T> = serde_json::from_str(&row.document)?;
                debug!("Loaded {} {} from local store", items.len(), kind);
                Ok(items)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the collection stored under `kind` with `items`.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn save<T: Serialize>(&self, kind: EntityKind, items: &[T]) -> Result<()> {
        let document = serde_json::to_string(items)?;
        let now = chrono::Utc::now().naive_utc();
        let key = kind.storage_key().to_string();

        let existing = Collection::find_by_id(key.clone()).one(&self.db).await?;

        if let Some(row) = existing {
            let mut active_model: collection::ActiveModel = row.into();
            active_model.document = Set(document);
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_row = collection::ActiveModel {
                name: Set(key),
                document: Set(document),
                updated_at: Set(now),
            };
            new_row.insert(&self.db).await?;
        }

        debug!("Saved {} {} to local store", items.len(), kind);
        Ok(())
    }

    /// All locally stored components.
    pub async fn components(&self) -> Result<Vec<Component>> {
        self.load(EntityKind::Components).await
    }

    /// Replaces the locally stored components.
    pub async fn save_components(&self, components: &[Component]) -> Result<()> {
        self.save(EntityKind::Components, components).await
    }

    /// All locally stored products.
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.load(EntityKind::Products).await
    }

    /// Replaces the locally stored products.
    pub async fn save_products(&self, products: &[Product]) -> Result<()> {
        self.save(EntityKind::Products, products).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::models::ProductComponent;
    use crate::test_utils::{sample_component, setup_test_store};

    #[tokio::test]
    async fn test_missing_collection_is_empty() -> Result<()> {
        let store = setup_test_store().await?;
        assert!(store.components().await?.is_empty());
        assert!(store.products().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load_components() -> Result<()> {
        let store = setup_test_store().await?;
        let components = vec![sample_component("1", 10.0), sample_component("2", 0.5)];

        store.save_components(&components).await?;
        assert_eq!(store.components().await?, components);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_whole_document() -> Result<()> {
        let store = setup_test_store().await?;
        store
            .save_components(&[sample_component("1", 1.0), sample_component("2", 2.0)])
            .await?;
        store.save_components(&[sample_component("3", 3.0)]).await?;

        let loaded = store.components().await?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "3");
        Ok(())
    }

    #[tokio::test]
    async fn test_collections_are_independent() -> Result<()> {
        let store = setup_test_store().await?;
        let product = Product {
            id: "p1".to_string(),
            name: "Anklet".to_string(),
            sku: "ANK-1".to_string(),
            making_charges: 4.0,
            components: vec![ProductComponent::new("1", 2.0)],
        };

        store.save_products(std::slice::from_ref(&product)).await?;
        assert!(store.components().await?.is_empty());
        assert_eq!(store.products().await?, vec![product]);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_document_is_serialization_error() -> Result<()> {
        let store = setup_test_store().await?;
        let row = collection::ActiveModel {
            name: Set(EntityKind::Components.storage_key().to_string()),
            document: Set("not json".to_string()),
            updated_at: Set(chrono::Utc::now().naive_utc()),
        };
        row.insert(store.connection()).await?;

        let result = store.components().await;
        assert!(matches!(result, Err(Error::Serialization(_))));
        Ok(())
    }
}
