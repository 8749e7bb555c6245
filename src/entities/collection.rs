//! Collection entity - One row per named entity collection in the local store.
//!
//! Each row holds the complete JSON array of one entity kind, keyed by the collection
//! name. Reads and writes always move the whole document.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored collection document
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    /// Collection key (e.g., `"jewel_components"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// JSON-serialized array of entities
    #[sea_orm(column_type = "Text")]
    pub document: String,
    /// When the document was last rewritten
    pub updated_at: DateTime,
}

/// Collections have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
