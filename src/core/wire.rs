//! Remote backend wire schema.
//!
//! The backend speaks snake_case (`making_charges`, `component_id`) and may send money
//! and quantity fields as numeric strings (`"12.50"`) and ids as integers. Every payload
//! is decoded through these types, so a body that does not fit the schema becomes a
//! [`RemoteError::Decode`] instead of a half-filled entity.

use crate::core::remote::RemoteError;
use crate::models::{Component, Product, ProductComponent};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// Component as sent to and received from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireComponent {
    /// Component id
    #[serde(deserialize_with = "identifier")]
    pub id: String,
    /// Component name
    pub name: String,
    /// Unit price
    #[serde(deserialize_with = "number")]
    pub price: f64,
    /// Unit of measure
    pub unit: String,
    /// Category
    pub category: String,
}

/// Product as sent to and received from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireProduct {
    /// Product id
    #[serde(deserialize_with = "identifier")]
    pub id: String,
    /// Product name
    pub name: String,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: String,
    /// Labor charge
    #[serde(deserialize_with = "number")]
    pub making_charges: f64,
    /// Recipe lines
    #[serde(default)]
    pub components: Vec<WireRecipeLine>,
}

/// Recipe line as sent to and received from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecipeLine {
    /// Referenced component id
    #[serde(deserialize_with = "identifier")]
    pub component_id: String,
    /// Quantity used
    #[serde(deserialize_with = "number")]
    pub quantity: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrInteger {
    Text(String),
    Integer(i64),
}

fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| de::Error::custom(format!("expected a number, found {s:?}"))),
    }
}

fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdOrInteger::deserialize(deserializer)? {
        IdOrInteger::Text(s) => s,
        IdOrInteger::Integer(n) => n.to_string(),
    })
}

impl From<&Component> for WireComponent {
    fn from(c: &Component) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            price: c.price,
            unit: c.unit.clone(),
            category: c.category.clone(),
        }
    }
}

impl From<WireComponent> for Component {
    fn from(w: WireComponent) -> Self {
        Self {
            id: w.id,
            name: w.name,
            price: w.price,
            unit: w.unit,
            category: w.category,
        }
    }
}

impl From<&Product> for WireProduct {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            sku: p.sku.clone(),
            making_charges: p.making_charges,
            components: p
                .components
                .iter()
                .map(|line| WireRecipeLine {
                    component_id: line.component_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

impl From<WireProduct> for Product {
    fn from(w: WireProduct) -> Self {
        Self {
            id: w.id,
            name: w.name,
            sku: w.sku,
            making_charges: w.making_charges,
            components: w
                .components
                .into_iter()
                .map(|line| ProductComponent::new(line.component_id, line.quantity))
                .collect(),
        }
    }
}

/// Decodes a response body into a wire type.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteError> {
    serde_json::from_slice(body).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Decodes a component list body.
pub fn decode_components(body: &[u8]) -> Result<Vec<Component>, RemoteError> {
    decode::<Vec<WireComponent>>(body).map(|items| items.into_iter().map(Into::into).collect())
}

/// Decodes a single component body.
pub fn decode_component(body: &[u8]) -> Result<Component, RemoteError> {
    decode::<WireComponent>(body).map(Into::into)
}

/// Decodes a product list body.
pub fn decode_products(body: &[u8]) -> Result<Vec<Product>, RemoteError> {
    decode::<Vec<WireProduct>>(body).map(|items| items.into_iter().map(Into::into).collect())
}

/// Decodes a single product body.
pub fn decode_product(body: &[u8]) -> Result<Product, RemoteError> {
    decode::<WireProduct>(body).map(Into::into)
}
