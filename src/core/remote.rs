//! Remote backend adapter.
//!
//! The backend is a REST-style service under a configured base URL:
//! `GET/POST /components/`, `PUT/DELETE /components/{id}/`, `GET/POST /products/`,
//! `DELETE /products/{id}/`. Reads carry a short timeout; writes wait for the transport.
//!
//! [`RemoteBackend`] is the seam the data service depends on; [`HttpBackend`] is the
//! reqwest implementation.

use crate::core::wire::{self, WireComponent, WireProduct};
use crate::errors::{Error, Result};
use crate::models::{Component, EntityKind, Product};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// How long a remote read may take before it counts as a failure.
pub const REMOTE_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request did not complete in time
    #[error("request timed out")]
    Timeout,
    /// Connection or transport failure
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },
    /// The response body did not match the wire schema
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Result of a single remote call.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// CRUD surface of the remote backend.
pub trait RemoteBackend {
    /// `GET /components/`
    fn fetch_components(&self) -> impl Future<Output = RemoteResult<Vec<Component>>> + Send;

    /// `POST /components/`
    fn create_component(
        &self,
        component: &Component,
    ) -> impl Future<Output = RemoteResult<Component>> + Send;

    /// `PUT /components/{id}/`
    fn update_component(
        &self,
        component: &Component,
    ) -> impl Future<Output = RemoteResult<Component>> + Send;

    /// `DELETE /components/{id}/`
    fn delete_component(&self, id: &str) -> impl Future<Output = RemoteResult<()>> + Send;

    /// `GET /products/`
    fn fetch_products(&self) -> impl Future<Output = RemoteResult<Vec<Product>>> + Send;

    /// `POST /products/`
    fn create_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = RemoteResult<Product>> + Send;

    /// `DELETE /products/{id}/`
    fn delete_product(&self, id: &str) -> impl Future<Output = RemoteResult<()>> + Send;
}

/// HTTP implementation of [`RemoteBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
    read_timeout: Duration,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("jewel-cost/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            read_timeout: REMOTE_READ_TIMEOUT,
        })
    }

    /// Overrides the read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}/", self.base_url, kind.endpoint())
    }

    fn item_url(&self, kind: EntityKind, id: &str) -> String {
        format!("{}/{}/{}/", self.base_url, kind.endpoint(), id)
    }

    async fn get(&self, url: &str) -> RemoteResult<Vec<u8>> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .timeout(self.read_timeout)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send_json<T: Serialize + Sync>(
        &self,
        method: Method,
        url: &str,
        body: &T,
    ) -> RemoteResult<Vec<u8>> {
        debug!("{} {}", method, url);
        let response = self.http.request(method, url).json(body).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn delete(&self, url: &str) -> RemoteResult<()> {
        debug!("DELETE {}", url);
        let response = self.http.delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Http {
        status: status.as_u16(),
        body,
    })
}

impl RemoteBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn fetch_components(&self) -> RemoteResult<Vec<Component>> {
        let body = self.get(&self.collection_url(EntityKind::Components)).await?;
        wire::decode_components(&body)
    }

    #[instrument(skip(self, component), fields(id = %component.id))]
    async fn create_component(&self, component: &Component) -> RemoteResult<Component> {
        let url = self.collection_url(EntityKind::Components);
        let body = self
            .send_json(Method::POST, &url, &WireComponent::from(component))
            .await?;
        wire::decode_component(&body)
    }

    #[instrument(skip(self, component), fields(id = %component.id))]
    async fn update_component(&self, component: &Component) -> RemoteResult<Component> {
        let url = self.item_url(EntityKind::Components, &component.id);
        let body = self
            .send_json(Method::PUT, &url, &WireComponent::from(component))
            .await?;
        wire::decode_component(&body)
    }

    #[instrument(skip(self))]
    async fn delete_component(&self, id: &str) -> RemoteResult<()> {
        self.delete(&self.item_url(EntityKind::Components, id)).await
    }

    #[instrument(skip(self))]
    async fn fetch_products(&self) -> RemoteResult<Vec<Product>> {
        let body = self.get(&self.collection_url(EntityKind::Products)).await?;
        wire::decode_products(&body)
    }

    #[instrument(skip(self, product), fields(id = %product.id))]
    async fn create_product(&self, product: &Product) -> RemoteResult<Product> {
        let url = self.collection_url(EntityKind::Products);
        let body = self
            .send_json(Method::POST, &url, &WireProduct::from(product))
            .await?;
        wire::decode_product(&body)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: &str) -> RemoteResult<()> {
        self.delete(&self.item_url(EntityKind::Products, id)).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use crate::core::service::{DataService, Served};
    use crate::models::ProductComponent;
    use crate::test_utils::{sample_product, setup_test_store};
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;
    use std::net::TcpListener;

    /// A loopback address nothing is listening on.
    fn unreachable_base_url() -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(format!("http://127.0.0.1:{port}"))
    }

    #[test]
    fn test_urls_follow_backend_layout() -> Result<()> {
        let backend = HttpBackend::new("http://localhost:8000/api/")?;
        assert_eq!(backend.base_url(), "http://localhost:8000/api");
        assert_eq!(
            backend.collection_url(EntityKind::Components),
            "http://localhost:8000/api/components/"
        );
        assert_eq!(
            backend.item_url(EntityKind::Products, "p1"),
            "http://localhost:8000/api/products/p1/"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() -> Result<()> {
        let backend = HttpBackend::new(unreachable_base_url()?)?
            .with_read_timeout(Duration::from_millis(500));

        let result = backend.fetch_components().await;
        assert!(matches!(
            result,
            Err(RemoteError::Network(_) | RemoteError::Timeout)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_backend_write_fails() -> Result<()> {
        let backend = HttpBackend::new(unreachable_base_url()?)?;
        let result = backend.delete_product("p1").await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_slow_read_times_out() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/components/");
                then.status(200).body("[]").delay(Duration::from_secs(2));
            })
            .await;

        let backend =
            HttpBackend::new(server.base_url())?.with_read_timeout(Duration::from_millis(200));
        let result = backend.fetch_components().await;
        assert!(matches!(result, Err(RemoteError::Timeout)));
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/");
                then.status(500).body("oops");
            })
            .await;

        let backend = HttpBackend::new(server.base_url())?;
        match backend.fetch_products().await {
            Err(RemoteError::Http { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "oops");
            }
            other => panic!("expected HTTP 500, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_loose_numbers_and_ids_decode() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/components/");
                then.status(200).json_body(json!([
                    {"id": 7, "name": "Bead", "price": "0.50", "unit": "pcs", "category": "Beads"}
                ]));
            })
            .await;

        let backend = HttpBackend::new(server.base_url())?;
        let components = backend.fetch_components().await?;
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].id, "7");
        assert!((components[0].price - 0.5).abs() < f64::EPSILON);
        Ok(())
    }

    #[tokio::test]
    async fn test_undecodable_success_falls_back_offline() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/components/");
                then.status(200).body("not json");
            })
            .await;

        let backend = HttpBackend::new(server.base_url())?;
        let service = DataService::new(Some(backend), setup_test_store().await?);
        assert!(service.is_online());

        let served = service.fetch_components_served().await?;
        assert!(matches!(served, Served::Local(ref components) if components.is_empty()));
        assert!(!service.is_online());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_sends_snake_case() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/products/")
                    .body_includes("\"making_charges\"")
                    .body_includes("\"component_id\"");
                then.status(201).json_body(json!({
                    "id": "p9",
                    "name": "Product p9",
                    "sku": "SKU-p9",
                    "making_charges": "12.5",
                    "components": [{"component_id": 3, "quantity": 2}]
                }));
            })
            .await;

        let backend = HttpBackend::new(server.base_url())?;
        let product = sample_product("p9", 12.5, vec![ProductComponent::new("3", 2.0)]);
        let created = backend.create_product(&product).await?;

        mock.assert_async().await;
        assert_eq!(created, product);
        Ok(())
    }
}
