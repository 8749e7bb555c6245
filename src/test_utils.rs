//! Shared test utilities for jewel-cost.
//!
//! Provides an in-memory local store, a scripted remote backend, a stub advisor and
//! entity builders with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    config::database,
    core::{
        advisor::{AdvisorSample, AnalysisResult, CostAdvisor},
        local_store::LocalStore,
        remote::{RemoteBackend, RemoteError, RemoteResult},
    },
    errors::{Error, Result},
    models::{Component, Product, ProductComponent},
};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Routes tracing output to the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` local store with its table initialized.
/// This is the standard setup for all store and service tests.
pub async fn setup_test_store() -> Result<LocalStore> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(LocalStore::new(db))
}

/// Creates a component with sensible defaults.
///
/// # Defaults
/// * `name`: `"Component <id>"`
/// * `unit`: `"pcs"`
/// * `category`: `"General"`
pub fn sample_component(id: &str, price: f64) -> Component {
    Component {
        id: id.to_string(),
        name: format!("Component {id}"),
        price,
        unit: "pcs".to_string(),
        category: "General".to_string(),
    }
}

/// Creates a product with sensible defaults.
///
/// # Defaults
/// * `name`: `"Product <id>"`
/// * `sku`: `"SKU-<id>"`
pub fn sample_product(id: &str, making_charges: f64, components: Vec<ProductComponent>) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        sku: format!("SKU-{id}"),
        making_charges,
        components,
    }
}

#[derive(Debug, Default)]
struct FakeState {
    components: Vec<Component>,
    products: Vec<Product>,
    fail_reads: bool,
    fail_writes: bool,
    calls: Vec<String>,
}

/// Scripted in-process remote backend.
///
/// Holds its own collections, records every call and can be told to fail reads,
/// writes, or both.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    /// A backend that already holds the given entities.
    pub fn with_catalog(components: Vec<Component>, products: Vec<Product>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                components,
                products,
                ..FakeState::default()
            }),
        }
    }

    /// A backend whose every call fails.
    pub fn failing() -> Self {
        let backend = Self::default();
        backend.set_fail_reads(true);
        backend.set_fail_writes(true);
        backend
    }

    /// Makes reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Makes writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    /// Components currently held by the backend.
    pub fn components(&self) -> Vec<Component> {
        self.state.lock().unwrap().components.clone()
    }

    /// Products currently held by the backend.
    pub fn products(&self) -> Vec<Product> {
        self.state.lock().unwrap().products.clone()
    }

    /// Names of the calls received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn read<T>(&self, call: &str, f: impl FnOnce(&FakeState) -> T) -> RemoteResult<T> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        if state.fail_reads {
            return Err(RemoteError::Timeout);
        }
        Ok(f(&state))
    }

    fn write<T>(&self, call: &str, f: impl FnOnce(&mut FakeState) -> T) -> RemoteResult<T> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        if state.fail_writes {
            return Err(RemoteError::Http {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(f(&mut state))
    }
}

impl RemoteBackend for FakeBackend {
    async fn fetch_components(&self) -> RemoteResult<Vec<Component>> {
        self.read("fetch_components", |s| s.components.clone())
    }

    async fn create_component(&self, component: &Component) -> RemoteResult<Component> {
        self.write("create_component", |s| {
            s.components.push(component.clone());
            component.clone()
        })
    }

    async fn update_component(&self, component: &Component) -> RemoteResult<Component> {
        self.write("update_component", |s| {
            for existing in &mut s.components {
                if existing.id == component.id {
                    *existing = component.clone();
                }
            }
            component.clone()
        })
    }

    async fn delete_component(&self, id: &str) -> RemoteResult<()> {
        self.write("delete_component", |s| s.components.retain(|c| c.id != id))
    }

    async fn fetch_products(&self) -> RemoteResult<Vec<Product>> {
        self.read("fetch_products", |s| s.products.clone())
    }

    async fn create_product(&self, product: &Product) -> RemoteResult<Product> {
        self.write("create_product", |s| {
            s.products.push(product.clone());
            product.clone()
        })
    }

    async fn delete_product(&self, id: &str) -> RemoteResult<()> {
        self.write("delete_product", |s| s.products.retain(|p| p.id != id))
    }
}

/// Advisor that answers with a fixed result, or fails when it has none.
#[derive(Debug, Default)]
pub struct StubAdvisor {
    answer: Option<AnalysisResult>,
}

impl StubAdvisor {
    /// An advisor that always returns `answer`.
    pub const fn answering(answer: AnalysisResult) -> Self {
        Self {
            answer: Some(answer),
        }
    }
}

impl CostAdvisor for StubAdvisor {
    async fn analyze(&self, _sample: &AdvisorSample) -> Result<AnalysisResult> {
        self.answer
            .clone()
            .ok_or(Error::Remote(RemoteError::Timeout))
    }
}
