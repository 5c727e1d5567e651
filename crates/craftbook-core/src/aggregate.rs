//! Shopping-list aggregation over the recipe graph.
//!
//! Walks a root item's recipe depth-first and sorts every ingredient into
//! one of two buckets:
//!
//! - **craft**: the ingredient is in the catalog and its recipe carries a
//!   job tag other than the gathering role. Its own recipe is expanded with
//!   the ingredient's scaled quantity as the new factor.
//! - **raw**: the ingredient is unknown to the catalog, has no recipe, has an
//!   empty job tag, or is tagged with the gathering role. It is never
//!   expanded.
//!
//! Quantities accumulate per id across every position in the tree, so a
//! shared ingredient reached through several branches is summed, never
//! overwritten. A root that is itself craftable is never counted: reaching
//! it again is a cycle. A raw root (gathering or untagged) reached again is
//! an ordinary raw ingredient.

use crate::catalog::Catalog;
use crate::id::ItemId;
use crate::item::{Item, JobRole};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Which bucket an ingredient lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Craft,
    Raw,
}

/// Classify an ingredient id against the catalog.
pub fn classify(catalog: &Catalog, id: &str) -> Classification {
    match craftable(catalog, id) {
        Some(_) => Classification::Craft,
        None => Classification::Raw,
    }
}

/// Returns the catalog item when `id` must itself be crafted.
fn craftable<'a>(catalog: &'a Catalog, id: &str) -> Option<&'a Item> {
    catalog
        .find_by_id(id)
        .filter(|item| matches!(item.role(), Some(JobRole::Crafting(_))))
}

/// Aggregated quantities needed to produce some number of a root item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Requirements {
    pub craft: HashMap<ItemId, f64>,
    pub raw: HashMap<ItemId, f64>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.craft.is_empty() && self.raw.is_empty()
    }

    /// Craft bucket sorted by id.
    pub fn sorted_craft(&self) -> Vec<(&ItemId, f64)> {
        sorted(&self.craft)
    }

    /// Raw bucket sorted by id.
    pub fn sorted_raw(&self) -> Vec<(&ItemId, f64)> {
        sorted(&self.raw)
    }

    fn add(bucket: &mut HashMap<ItemId, f64>, id: &ItemId, quantity: f64) {
        *bucket.entry(id.clone()).or_insert(0.0) += quantity;
    }
}

fn sorted(bucket: &HashMap<ItemId, f64>) -> Vec<(&ItemId, f64)> {
    let mut entries: Vec<_> = bucket.iter().map(|(id, &qty)| (id, qty)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// A craftable ingredient refers back to an item already being expanded.
    /// `path` runs from the root to the repeated id.
    #[error("cyclic recipe: {}", format_path(.path))]
    CyclicRecipe { path: Vec<ItemId> },
    #[error("multiplier must be a finite non-negative number, got {0}")]
    InvalidMultiplier(f64),
}

fn format_path(path: &[ItemId]) -> String {
    path.iter()
        .map(ItemId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Compute the craft and raw quantities needed for `multiplier` units of `root`.
pub fn aggregate(
    root: &Item,
    multiplier: f64,
    catalog: &Catalog,
) -> Result<Requirements, AggregateError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(AggregateError::InvalidMultiplier(multiplier));
    }

    let mut requirements = Requirements::default();
    let mut path = vec![root.id.as_str()];
    collect(root, multiplier, catalog, &mut path, &mut requirements)?;

    debug!(
        root = %root.id,
        multiplier,
        craft = requirements.craft.len(),
        raw = requirements.raw.len(),
        "aggregated recipe requirements"
    );
    Ok(requirements)
}

/// `path` holds the ids currently being expanded, root first.
fn collect<'a>(
    item: &'a Item,
    factor: f64,
    catalog: &'a Catalog,
    path: &mut Vec<&'a str>,
    out: &mut Requirements,
) -> Result<(), AggregateError> {
    for ingredient in item.ingredients() {
        let quantity = ingredient.amount * factor;
        match craftable(catalog, ingredient.id.as_str()) {
            Some(sub) => {
                // Only ids that get expanded can loop; raw repeats just accumulate.
                if path.contains(&sub.id.as_str()) {
                    let mut cycle: Vec<ItemId> =
                        path.iter().map(|&id| ItemId::from(id)).collect();
                    cycle.push(sub.id.clone());
                    return Err(AggregateError::CyclicRecipe { path: cycle });
                }
                trace!(id = %ingredient.id, quantity, depth = path.len(), "craft");
                Requirements::add(&mut out.craft, &ingredient.id, quantity);
                path.push(sub.id.as_str());
                collect(sub, quantity, catalog, path, out)?;
                path.pop();
            }
            None => {
                trace!(id = %ingredient.id, quantity, depth = path.len(), "raw");
                Requirements::add(&mut out.raw, &ingredient.id, quantity);
            }
        }
    }
    Ok(())
}
