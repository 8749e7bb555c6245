//! Cost advisor backed by a hosted language model.
//!
//! The advisor receives a capped sample of the catalog and answers with a short
//! analysis plus a list of suggestions. It never fails from the caller's point of view:
//! any problem yields [`AnalysisResult::fallback`].

use crate::{
    config::settings::AdvisorSettings,
    core::{cost::PriceBook, remote::RemoteError},
    errors::{Error, Result},
    models::{Component, Product},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write as _;
use std::future::Future;
use tracing::{error, info, instrument};

/// At most this many components are sent to the advisor.
pub const MAX_COMPONENT_SAMPLES: usize = 20;

/// At most this many products are sent to the advisor.
pub const MAX_PRODUCT_SAMPLES: usize = 10;

/// Default API root of the hosted model.
pub const DEFAULT_ADVISOR_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Analysis returned by the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Short analysis of the cost drivers
    pub analysis: String,
    /// Concrete suggestions
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Fixed answer used whenever the advisor cannot be reached or misbehaves.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            analysis: "Could not generate analysis at this time.".to_string(),
            suggestions: vec![
                "Check your internet connection".to_string(),
                "Ensure API key is valid".to_string(),
            ],
        }
    }
}

/// Simplified component record sent to the advisor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSample {
    /// Component name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Unit of measure
    pub unit: String,
}

/// Simplified product record sent to the advisor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSample {
    /// Product name
    pub name: String,
    /// Total unit cost
    pub total_cost: f64,
    /// Labor charge
    pub making_charges: f64,
}

/// The capped catalog sample handed to the advisor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorSample {
    /// First components of the catalog
    pub components: Vec<ComponentSample>,
    /// First products of the catalog with their costs
    pub products: Vec<ProductSample>,
}

impl AdvisorSample {
    /// Takes the first [`MAX_COMPONENT_SAMPLES`] components and [`MAX_PRODUCT_SAMPLES`] products.
    #[must_use]
    pub fn from_catalog(products: &[Product], components: &[Component]) -> Self {
        let book = PriceBook::new(components);
        Self {
            components: components
                .iter()
                .take(MAX_COMPONENT_SAMPLES)
                .map(|c| ComponentSample {
                    name: c.name.clone(),
                    price: c.price,
                    unit: c.unit.clone(),
                })
                .collect(),
            products: products
                .iter()
                .take(MAX_PRODUCT_SAMPLES)
                .map(|p| ProductSample {
                    name: p.name.clone(),
                    total_cost: book.breakdown(&p.components, p.making_charges).total_cost,
                    making_charges: p.making_charges,
                })
                .collect(),
        }
    }

    /// Renders the request text for the model.
    pub fn prompt(&self) -> Result<String> {
        Ok(format!(
            "You are a cost analyst for an imitation-jewelry business.\n\
             Components (sample): {}\n\
             Products (sample): {}\n\
             Provide a brief analysis of the cost drivers (max 2 sentences) and \
             3 specific suggestions to reduce costs or optimize pricing.",
            serde_json::to_string(&self.components)?,
            serde_json::to_string(&self.products)?
        ))
    }
}

/// Something that can analyze a catalog sample.
pub trait CostAdvisor {
    /// Produces an analysis of `sample`.
    fn analyze(&self, sample: &AdvisorSample) -> impl Future<Output = Result<AnalysisResult>> + Send;
}

/// Advisor backed by the hosted model's `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiAdvisor {
    /// Creates an advisor from settings.
    pub fn new(settings: &AdvisorSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("jewel-cost/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            endpoint: DEFAULT_ADVISOR_ENDPOINT.to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    /// Points the advisor at a different API root.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "analysis": { "type": "STRING" },
                        "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                }
            }
        })
    }
}

/// Extracts the analysis from a `generateContent` response body.
pub fn parse_generate_response(body: &[u8]) -> Result<AnalysisResult> {
    let response: GenerateResponse =
        serde_json::from_slice(body).map_err(|e| RemoteError::Decode(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.text.filter(|t| !t.trim().is_empty()))
        .ok_or_else(|| RemoteError::Decode("No response from advisor".to_string()))?;

    serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()).into())
}

impl CostAdvisor for GeminiAdvisor {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn analyze(&self, sample: &AdvisorSample) -> Result<AnalysisResult> {
        let api_key = self.api_key.as_deref().ok_or_else(|| Error::Config {
            message: "Advisor API key not configured".to_string(),
        })?;

        let prompt = sample.prompt()?;
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(&prompt))
            .send()
            .await
            .map_err(RemoteError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Http {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response.bytes().await.map_err(RemoteError::from)?;
        parse_generate_response(&body)
    }
}

/// Asks the advisor about the catalog.
///
/// Returns `None` when there are no products to analyze. Any advisor failure is logged
/// and answered with [`AnalysisResult::fallback`].
pub async fn analyze_costing<A: CostAdvisor>(
    advisor: &A,
    products: &[Product],
    components: &[Component],
) -> Option<AnalysisResult> {
    if products.is_empty() {
        return None;
    }

    let sample = AdvisorSample::from_catalog(products, components);
    info!(
        "Requesting cost analysis for {} products and {} components",
        sample.products.len(),
        sample.components.len()
    );
    Some(match advisor.analyze(&sample).await {
        Ok(result) => result,
        Err(e) => {
            error!("Advisor error: {}", e);
            AnalysisResult::fallback()
        }
    })
}

/// Formats an analysis for display.
#[must_use]
pub fn format_analysis(result: &AnalysisResult) -> String {
    let mut out = format!("Market analysis\n{}\n\nOptimization suggestions", result.analysis);
    for (i, suggestion) in result.suggestions.iter().enumerate() {
        let _ = write!(out, "\n{}. {}", i + 1, suggestion);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::models::ProductComponent;
    use crate::test_utils::{sample_component, sample_product};
    use std::sync::Mutex;

    struct ScriptedAdvisor {
        answer: Option<AnalysisResult>,
        seen: Mutex<Vec<AdvisorSample>>,
    }

    impl CostAdvisor for ScriptedAdvisor {
        async fn analyze(&self, sample: &AdvisorSample) -> Result<AnalysisResult> {
            self.seen.lock().unwrap().push(sample.clone());
            self.answer.clone().ok_or(Error::Remote(RemoteError::Timeout))
        }
    }

    fn catalog(products: usize, components: usize) -> (Vec<Product>, Vec<Component>) {
        let components = (0..components)
            .map(|i| sample_component(&i.to_string(), 1.0))
            .collect();
        let products = (0..products)
            .map(|i| sample_product(&format!("p{i}"), 2.0, vec![ProductComponent::new("0", 3.0)]))
            .collect();
        (products, components)
    }

    #[test]
    fn test_sample_is_capped() {
        let (products, components) = catalog(15, 30);
        let sample = AdvisorSample::from_catalog(&products, &components);
        assert_eq!(sample.components.len(), MAX_COMPONENT_SAMPLES);
        assert_eq!(sample.products.len(), MAX_PRODUCT_SAMPLES);
        assert_eq!(sample.products[0].total_cost, 5.0);
        assert_eq!(sample.products[0].making_charges, 2.0);
    }

    #[test]
    fn test_product_sample_serializes_camel_case() {
        let (products, components) = catalog(1, 1);
        let sample = AdvisorSample::from_catalog(&products, &components);
        let json = serde_json::to_value(&sample.products[0]).unwrap();
        assert_eq!(json["totalCost"], 5.0);
        assert_eq!(json["makingCharges"], 2.0);
        assert!(sample.prompt().unwrap().contains("\"totalCost\":5.0"));
    }

    #[tokio::test]
    async fn test_no_products_skips_analysis() {
        let advisor = ScriptedAdvisor {
            answer: None,
            seen: Mutex::new(Vec::new()),
        };
        assert!(analyze_costing(&advisor, &[], &[]).await.is_none());
        assert!(advisor.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_advisor_answer_is_passed_through() {
        let answer = AnalysisResult {
            analysis: "Chain dominates cost.".to_string(),
            suggestions: vec!["Buy chain in bulk".to_string()],
        };
        let advisor = ScriptedAdvisor {
            answer: Some(answer.clone()),
            seen: Mutex::new(Vec::new()),
        };
        let (products, components) = catalog(2, 2);

        assert_eq!(
            analyze_costing(&advisor, &products, &components).await,
            Some(answer)
        );
        assert_eq!(advisor.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_advisor_failure_yields_fallback() {
        let advisor = ScriptedAdvisor {
            answer: None,
            seen: Mutex::new(Vec::new()),
        };
        let (products, components) = catalog(1, 1);
        assert_eq!(
            analyze_costing(&advisor, &products, &components).await,
            Some(AnalysisResult::fallback())
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_yields_fallback() -> Result<()> {
        let advisor = GeminiAdvisor::new(&AdvisorSettings {
            api_key: None,
            model: "test-model".to_string(),
        })?;
        let (products, components) = catalog(1, 1);

        let sample = AdvisorSample::from_catalog(&products, &components);
        assert!(matches!(
            advisor.analyze(&sample).await,
            Err(Error::Config { .. })
        ));
        assert_eq!(
            analyze_costing(&advisor, &products, &components).await,
            Some(AnalysisResult::fallback())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_fallback() -> Result<()> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);

        let advisor = GeminiAdvisor::new(&AdvisorSettings {
            api_key: Some("key".to_string()),
            model: "test-model".to_string(),
        })?
        .with_endpoint(format!("http://127.0.0.1:{port}/v1beta"));
        let (products, components) = catalog(1, 1);

        assert_eq!(
            analyze_costing(&advisor, &products, &components).await,
            Some(AnalysisResult::fallback())
        );
        Ok(())
    }

    #[test]
    fn test_parse_generate_response() {
        let body = br#"{"candidates":[{"content":{"parts":[{"text":"{\"analysis\":\"Beads are cheap.\",\"suggestions\":[\"a\",\"b\",\"c\"]}"}]}}]}"#;
        let result = parse_generate_response(body).unwrap();
        assert_eq!(result.analysis, "Beads are cheap.");
        assert_eq!(result.suggestions.len(), 3);
    }

    #[test]
    fn test_parse_empty_response_is_error() {
        assert!(parse_generate_response(br#"{"candidates":[]}"#).is_err());
        assert!(parse_generate_response(br#"{"candidates":[{"content":{"parts":[{"text":"not json"}]}}]}"#).is_err());
    }

    #[test]
    fn test_format_analysis_numbers_suggestions() {
        let text = format_analysis(&AnalysisResult::fallback());
        assert!(text.contains("Could not generate analysis at this time."));
        assert!(text.contains("1. Check your internet connection"));
        assert!(text.contains("2. Ensure API key is valid"));
    }
}
