//! Craftbook Core -- item catalog and recipe aggregation.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable, id-indexed collection of items,
//!   frozen after [`catalog::CatalogBuilder::build`].
//! - [`item::Item`] / [`item::Recipe`] -- Catalog records. A recipe's job tag
//!   decides whether an ingredient is crafted or gathered.
//! - [`aggregate::aggregate`] -- Shopping list for N units of an item: every
//!   intermediate to craft and every raw resource to gather, summed across
//!   the whole recipe tree.
//! - [`tree::RecipeTree`] -- Display tree of a recipe with selectable
//!   expansion.
//!
//! ```rust,ignore
//! let sword = catalog.find_by_id("sword").unwrap();
//! let req = aggregate(sword, 5.0, &catalog)?;
//! for (id, qty) in req.sorted_raw() {
//!     println!("{qty} x {id}");
//! }
//! ```

pub mod aggregate;
pub mod catalog;
pub mod id;
pub mod item;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{AggregateError, Classification, Requirements, aggregate, classify};
pub use catalog::{Catalog, CatalogBuilder, CatalogError};
pub use id::ItemId;
pub use item::{GATHERING_JOB, Ingredient, Item, JobRole, Recipe, StatRange};
pub use tree::{ExpandPolicy, RecipeTree, TreeNode};
