//! Shared test helpers for unit tests, integration tests and property tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::catalog::Catalog;
use crate::item::{Item, Recipe};

// ===========================================================================
// Item constructors
// ===========================================================================

/// An item with a recipe tagged `job` and the given ingredients.
pub fn crafted(id: &str, job: &str, ingredients: &[(&str, f64)]) -> Item {
    let recipe = ingredients
        .iter()
        .fold(Recipe::new(job), |recipe, &(ingredient, amount)| {
            recipe.with_ingredient(ingredient, amount)
        });
    Item::new(id).with_recipe(recipe)
}

/// An item without a recipe.
pub fn raw(id: &str) -> Item {
    Item::new(id)
}

pub fn catalog_of(items: impl IntoIterator<Item = Item>) -> Catalog {
    Catalog::from_items(items).expect("test catalog has unique ids")
}

// ===========================================================================
// Fixture catalogs
// ===========================================================================

/// sword <- 2 ingot (SMITH) <- 3 ore. `ore` is deliberately absent.
pub fn sword_catalog() -> Catalog {
    catalog_of([
        crafted("sword", "SMITH", &[("ingot", 2.0)]),
        crafted("ingot", "SMITH", &[("ore", 3.0)]),
    ])
}

/// A small mixed catalog: crafting chains, a shared ingredient, a gathering
/// item with its own recipe, and raw items with metadata.
pub fn workshop_catalog() -> Catalog {
    catalog_of([
        crafted("sword", "SMITH", &[("ingot", 1.0), ("hilt", 1.0)])
            .with_rarity("RARE")
            .with_level(12)
            .with_category("WEAPON")
            .with_stat("damage", 8.0, 14.0)
            .with_stat("speed", 1.2, 1.2),
        crafted("hilt", "CARPENTER", &[("ingot", 1.0), ("plank", 2.0)]),
        crafted("ingot", "SMITH", &[("ore", 3.0), ("coal", 1.0)]),
        crafted("plank", "FARMER", &[("log", 0.25)]),
        crafted("log", "LUMBERJACK", &[]),
        raw("coal").with_rarity("COMMON"),
    ])
}
