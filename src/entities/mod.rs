//! Entity module - SeaORM entity definitions for the local durable store.

pub mod collection;

pub use collection::{Entity as Collection, Model as CollectionModel};
