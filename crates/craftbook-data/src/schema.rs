//! Serde data file structs for catalog items.
//!
//! These structs define the on-disk format of an item catalog. They are
//! deserialized from RON, JSON, or TOML data files and then converted into
//! core types by the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

/// An item record in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub id: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    /// Stat name to `[min, max]`.
    #[serde(default)]
    pub stats: Option<BTreeMap<String, (f64, f64)>>,
    /// Base64-encoded PNG.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeData>,
}

/// A recipe attached to an item record.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientData>,
}

/// One ingredient of a recipe, referencing another item by id.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientData {
    pub id: String,
    pub amount: f64,
}

/// Wrapper for TOML files, which cannot hold a top-level array.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlItems {
    pub items: Vec<ItemData>,
}
