//! Catalog loading pipeline: finds the data file, deserializes it, converts
//! records into core items and builds the catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers.

use crate::schema::{ItemData, RecipeData};
use craftbook_core::{Catalog, CatalogBuilder, CatalogError, Item, Recipe, StatRange};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base name of the catalog file inside a data directory.
pub const CATALOG_BASE_NAME: &str = "items";

/// Key holding the item array in TOML catalogs.
pub const TOML_ITEMS_KEY: &str = "items";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An ingredient amount is negative or not a finite number.
    #[error("invalid amount {amount} for ingredient '{ingredient}' of '{item}' in {file}")]
    InvalidAmount {
        file: PathBuf,
        item: String,
        ingredient: String,
        amount: f64,
    },

    /// The records did not form a valid catalog.
    #[error("invalid catalog in {file}: {source}")]
    Catalog { file: PathBuf, source: CatalogError },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, LoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(LoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(LoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, LoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| LoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize a list from a string. For TOML, extracts the array at
/// `toml_key` from the top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`. `origin` only labels errors.
pub fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    origin: &Path,
    toml_key: &str,
) -> Result<Vec<T>, LoadError> {
    let parse_error = |detail: String| LoadError::Parse {
        file: origin.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => {
            let mut table: toml::Table =
                toml::from_str(content).map_err(|e: toml::de::Error| parse_error(e.to_string()))?;
            let array = table
                .remove(toml_key)
                .ok_or_else(|| parse_error(format!("missing key '{toml_key}' in TOML file")))?;
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(e.to_string()))
        }
    }
}

/// Read a file and deserialize a list from it, with the format detected
/// from the extension.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, LoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list(&content, format, path, toml_key)
}

// ===========================================================================
// Catalog loading
// ===========================================================================

/// Load a catalog from a data file, or from `items.{ron,toml,json}` when
/// `path` is a directory.
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let file = if path.is_dir() {
        require_data_file(path, CATALOG_BASE_NAME)?
    } else {
        path.to_path_buf()
    };
    debug!(file = %file.display(), "loading catalog");

    let records: Vec<ItemData> = deserialize_list(&file, TOML_ITEMS_KEY)?;
    let catalog = build_catalog(records, &file)?;
    info!(items = catalog.len(), file = %file.display(), "catalog loaded");
    Ok(catalog)
}

/// Load a catalog from an in-memory document.
pub fn load_catalog_str(content: &str, format: Format) -> Result<Catalog, LoadError> {
    let origin = Path::new("<memory>");
    let records: Vec<ItemData> = parse_list(content, format, origin, TOML_ITEMS_KEY)?;
    build_catalog(records, origin)
}

/// Convert item records into core items and build the catalog.
pub fn build_catalog(records: Vec<ItemData>, origin: &Path) -> Result<Catalog, LoadError> {
    let mut builder = CatalogBuilder::new();
    for record in records {
        builder.register(convert_item(record, origin)?);
    }
    builder.build().map_err(|source| LoadError::Catalog {
        file: origin.to_path_buf(),
        source,
    })
}

fn convert_item(data: ItemData, origin: &Path) -> Result<Item, LoadError> {
    let recipe = data
        .recipe
        .map(|recipe| convert_recipe(recipe, &data.id, origin))
        .transpose()?;

    let mut item = Item::new(data.id);
    item.rarity = data.rarity;
    item.level = data.level;
    item.category = data.category;
    item.image = data.image;
    item.recipe = recipe;
    item.stats = data
        .stats
        .unwrap_or_default()
        .into_iter()
        .map(|(name, (min, max))| (name, StatRange::new(min, max)))
        .collect();
    Ok(item)
}

fn convert_recipe(data: RecipeData, item: &str, origin: &Path) -> Result<Recipe, LoadError> {
    let mut recipe = Recipe {
        job: data.job,
        ingredients: Vec::with_capacity(data.ingredients.len()),
    };
    for ingredient in data.ingredients {
        if !ingredient.amount.is_finite() || ingredient.amount < 0.0 {
            return Err(LoadError::InvalidAmount {
                file: origin.to_path_buf(),
                item: item.to_string(),
                ingredient: ingredient.id,
                amount: ingredient.amount,
            });
        }
        recipe = recipe.with_ingredient(ingredient.id, ingredient.amount);
    }
    Ok(recipe)
}

// ===========================================================================
// Tests
// ===========================================================================
