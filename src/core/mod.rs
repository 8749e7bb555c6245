//! Core layer - framework-agnostic costing, persistence and catalog logic
//!
//! Nothing in here knows about the command line. The [`service::DataService`] is the
//! single persistence entry point; everything else is pure business logic over
//! [`crate::models`] values.

/// Cost advisor backed by a hosted language model
pub mod advisor;
/// Component creation, price edits and search
pub mod component;
/// Material and total cost calculation
pub mod cost;
/// Dashboard figures and formatting
pub mod dashboard;
/// CSV import and import templates
pub mod import;
/// `SQLite`-backed local collection store
pub mod local_store;
/// Product creation and recipe building
pub mod product;
/// Remote backend trait and its HTTP implementation
pub mod remote;
/// Initial load and first-run seeding
pub mod seed;
/// Unified data service with remote-to-local fallback
pub mod service;
/// Wire format of the remote backend
pub mod wire;
