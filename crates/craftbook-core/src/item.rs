use crate::id::ItemId;
use std::collections::BTreeMap;

/// Job tag of the gathering role. Items carrying it are always raw
/// resources and their recipes are never expanded by the aggregator.
pub const GATHERING_JOB: &str = "FARMER";

/// Lower and upper bound of an item stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// A recipe ingredient: another item referenced by id, with a per-unit amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: ItemId,
    pub amount: f64,
}

impl Ingredient {
    pub fn new(id: impl Into<ItemId>, amount: f64) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }
}

/// Production role required by a recipe, derived from its job tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRole<'a> {
    /// No job tag, or an empty one.
    Unassigned,
    /// The gathering role ([`GATHERING_JOB`], compared ignoring ASCII case).
    Gathering,
    /// Any other production role.
    Crafting(&'a str),
}

impl JobRole<'_> {
    pub fn is_crafting(&self) -> bool {
        matches!(self, JobRole::Crafting(_))
    }
}

/// The ingredient list and job tag attached to an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    pub job: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: Some(job.into()),
            ingredients: Vec::new(),
        }
    }

    pub fn with_ingredient(mut self, id: impl Into<ItemId>, amount: f64) -> Self {
        self.ingredients.push(Ingredient::new(id, amount));
        self
    }

    pub fn role(&self) -> JobRole<'_> {
        match self.job.as_deref() {
            None | Some("") => JobRole::Unassigned,
            Some(job) if job.eq_ignore_ascii_case(GATHERING_JOB) => JobRole::Gathering,
            Some(job) => JobRole::Crafting(job),
        }
    }

    /// The job tag, or `None` when it is absent or empty.
    pub fn job_label(&self) -> Option<&str> {
        self.job.as_deref().filter(|job| !job.is_empty())
    }
}

/// A catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub rarity: Option<String>,
    pub level: Option<u32>,
    pub category: Option<String>,
    pub stats: BTreeMap<String, StatRange>,
    /// Base64-encoded PNG payload.
    pub image: Option<String>,
    pub recipe: Option<Recipe>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            rarity: None,
            level: None,
            category: None,
            stats: BTreeMap::new(),
            image: None,
            recipe: None,
        }
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = Some(recipe);
        self
    }

    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_stat(mut self, name: impl Into<String>, min: f64, max: f64) -> Self {
        self.stats.insert(name.into(), StatRange::new(min, max));
        self
    }

    /// Ingredients of the item's recipe; empty when it has none.
    pub fn ingredients(&self) -> &[Ingredient] {
        self.recipe
            .as_ref()
            .map(|recipe| recipe.ingredients.as_slice())
            .unwrap_or(&[])
    }

    /// Role of the item's recipe, or `None` when the item has no recipe.
    pub fn role(&self) -> Option<JobRole<'_>> {
        self.recipe.as_ref().map(Recipe::role)
    }
}
