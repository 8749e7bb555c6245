//! Unified data service.
//!
//! The only persistence entry point the rest of the crate uses. Every operation tries
//! the remote backend when one is configured and silently falls back to the local store
//! when the remote call fails:
//!
//! * reads always try the backend if it is configured, whatever the online flag says
//! * writes try the backend only while online; a failed remote write is dropped and the
//!   entity is written locally instead (no retry, no replay)
//! * every remote attempt updates the online flag: success sets it, failure clears it
//!
//! Local writes read the whole collection, change it and write it back. Two interleaved
//! writes to the same collection can lose one of them; the last write wins.

use crate::core::local_store::LocalStore;
use crate::core::remote::{HttpBackend, RemoteBackend, RemoteResult};
use crate::errors::Result;
use crate::models::{Component, Product};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument, warn};

/// Where a successful operation was served from.
#[derive(Debug, Clone, PartialEq)]
pub enum Served<T> {
    /// The remote backend answered
    Remote(T),
    /// The local store was used, either by configuration or as a fallback
    Local(T),
}

impl<T> Served<T> {
    /// Drops the origin and returns the value.
    pub fn into_inner(self) -> T {
        match self {
            Self::Remote(value) | Self::Local(value) => value,
        }
    }

    /// Whether the remote backend served this result.
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// CRUD over the remote backend with automatic local fallback.
#[derive(Debug)]
pub struct DataService<B = HttpBackend> {
    remote: Option<B>,
    local: LocalStore,
    online: AtomicBool,
}

impl DataService<HttpBackend> {
    /// A service with no backend configured: local store only, permanently offline.
    #[must_use]
    pub const fn local_only(local: LocalStore) -> Self {
        Self {
            remote: None,
            local,
            online: AtomicBool::new(false),
        }
    }
}

impl<B: RemoteBackend> DataService<B> {
    /// Creates a service; it starts online exactly when a backend is configured.
    pub fn new(remote: Option<B>, local: LocalStore) -> Self {
        let online = remote.is_some();
        Self {
            remote,
            local,
            online: AtomicBool::new(online),
        }
    }

    /// Overrides the starting online flag.
    #[must_use]
    pub fn with_online(self, online: bool) -> Self {
        self.online.store(online, Ordering::Relaxed);
        self
    }

    /// Whether the last remote call succeeded (false when no backend is configured).
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// Whether a remote backend is configured at all.
    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// The local store behind the fallback path.
    pub const fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Records the outcome of a remote attempt and keeps the value on success.
    fn settle<T>(&self, outcome: RemoteResult<T>, operation: &str) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.online.store(true, Ordering::Relaxed);
                debug!("Remote {} succeeded", operation);
                Some(value)
            }
            Err(e) => {
                self.online.store(false, Ordering::Relaxed);
                warn!("Remote {} failed, falling back to local store: {}", operation, e);
                None
            }
        }
    }

    /// The backend to write to, if configured and currently online.
    fn writable_remote(&self) -> Option<&B> {
        self.remote.as_ref().filter(|_| self.is_online())
    }

    /// Fetches all components, reporting where they came from.
    #[instrument(skip(self))]
    pub async fn fetch_components_served(&self) -> Result<Served<Vec<Component>>> {
        if let Some(remote) = &self.remote {
            let outcome = remote.fetch_components().await;
            if let Some(components) = self.settle(outcome, "fetch components") {
                return Ok(Served::Remote(components));
            }
        }
        self.local.components().await.map(Served::Local)
    }

    /// Fetches all components from the backend, or from the local store when it is unavailable.
    pub async fn fetch_components(&self) -> Result<Vec<Component>> {
        self.fetch_components_served().await.map(Served::into_inner)
    }

    /// Adds a component, reporting where it was persisted.
    #[instrument(skip(self, component), fields(id = %component.id))]
    pub async fn add_component_served(&self, component: Component) -> Result<Served<Component>> {
        if let Some(remote) = self.writable_remote() {
            let outcome = remote.create_component(&component).await;
            if let Some(created) = self.settle(outcome, "create component") {
                return Ok(Served::Remote(created));
            }
        }

        let mut current = self.local.components().await?;
        current.push(component.clone());
        self.local.save_components(&current).await?;
        Ok(Served::Local(component))
    }

    /// Adds a component.
    pub async fn add_component(&self, component: Component) -> Result<Component> {
        self.add_component_served(component)
            .await
            .map(Served::into_inner)
    }

    /// Replaces the component with the same id, reporting where it was persisted.
    #[instrument(skip(self, component), fields(id = %component.id))]
    pub async fn update_component_served(
        &self,
        component: Component,
    ) -> Result<Served<Component>> {
        if let Some(remote) = self.writable_remote() {
            let outcome = remote.update_component(&component).await;
            if let Some(updated) = self.settle(outcome, "update component") {
                return Ok(Served::Remote(updated));
            }
        }

        let updated: Vec<Component> = self
            .local
            .components()
            .await?
            .into_iter()
            .map(|c| {
                if c.id == component.id {
                    component.clone()
                } else {
                    c
                }
            })
            .collect();
        self.local.save_components(&updated).await?;
        Ok(Served::Local(component))
    }

    /// Replaces the component with the same id.
    pub async fn update_component(&self, component: Component) -> Result<Component> {
        self.update_component_served(component)
            .await
            .map(Served::into_inner)
    }

    /// Deletes a component, reporting where the delete happened.
    ///
    /// Products referencing the component are left untouched.
    #[instrument(skip(self))]
    pub async fn delete_component_served(&self, id: &str) -> Result<Served<()>> {
        if let Some(remote) = self.writable_remote() {
            let outcome = remote.delete_component(id).await;
            if self.settle(outcome, "delete component").is_some() {
                return Ok(Served::Remote(()));
            }
        }

        let mut current = self.local.components().await?;
        current.retain(|c| c.id != id);
        self.local.save_components(&current).await?;
        Ok(Served::Local(()))
    }

    /// Deletes a component without touching the products that reference it.
    pub async fn delete_component(&self, id: &str) -> Result<()> {
        self.delete_component_served(id)
            .await
            .map(Served::into_inner)
    }

    /// Fetches all products, reporting where they came from.
    #[instrument(skip(self))]
    pub async fn fetch_products_served(&self) -> Result<Served<Vec<Product>>> {
        if let Some(remote) = &self.remote {
            let outcome = remote.fetch_products().await;
            if let Some(products) = self.settle(outcome, "fetch products") {
                return Ok(Served::Remote(products));
            }
        }
        self.local.products().await.map(Served::Local)
    }

    /// Fetches all products from the backend, or from the local store when it is unavailable.
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.fetch_products_served().await.map(Served::into_inner)
    }

    /// Adds a product, reporting where it was persisted.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn add_product_served(&self, product: Product) -> Result<Served<Product>> {
        if let Some(remote) = self.writable_remote() {
            let outcome = remote.create_product(&product).await;
            if let Some(created) = self.settle(outcome, "create product") {
                return Ok(Served::Remote(created));
            }
        }

        let mut current = self.local.products().await?;
        current.push(product.clone());
        self.local.save_products(&current).await?;
        Ok(Served::Local(product))
    }

    /// Adds a product.
    pub async fn add_product(&self, product: Product) -> Result<Product> {
        self.add_product_served(product)
            .await
            .map(Served::into_inner)
    }

    /// Deletes a product, reporting where the delete happened.
    #[instrument(skip(self))]
    pub async fn delete_product_served(&self, id: &str) -> Result<Served<()>> {
        if let Some(remote) = self.writable_remote() {
            let outcome = remote.delete_product(id).await;
            if self.settle(outcome, "delete product").is_some() {
                return Ok(Served::Remote(()));
            }
        }

        let mut current = self.local.products().await?;
        current.retain(|p| p.id != id);
        self.local.save_products(&current).await?;
        Ok(Served::Local(()))
    }

    /// Deletes a product.
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.delete_product_served(id)
            .await
            .map(Served::into_inner)
    }
}
