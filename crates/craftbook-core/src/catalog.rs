use crate::id::ItemId;
use crate::item::Item;
use std::collections::HashMap;

/// Asset directory used for items without an embedded image.
pub const DEFAULT_IMAGE_DIR: &str = "./img/item-vanilla";

/// Builder for constructing an immutable Catalog.
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<Item>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register an item. Duplicates are reported by [`build`](Self::build).
    pub fn register(&mut self, item: Item) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Phase 2: Finalize and build the immutable catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut index = HashMap::with_capacity(self.items.len());
        for (position, item) in self.items.iter().enumerate() {
            if index.insert(item.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Catalog {
            items: self.items,
            index,
        })
    }
}

/// Immutable item catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, CatalogError> {
        let mut builder = CatalogBuilder::new();
        for item in items {
            builder.register(item);
        }
        builder.build()
    }

    /// Look up an item by id. Unknown ids are common (raw ingredients) and
    /// are not an error.
    pub fn find_by_id(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All items, in registration order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items whose id contains `filter`, ignoring case, in registration order.
    pub fn search<'a>(&'a self, filter: &str) -> impl Iterator<Item = &'a Item> + 'a {
        let needle = filter.to_lowercase();
        self.items
            .iter()
            .filter(move |item| item.id.as_str().to_lowercase().contains(&needle))
    }

    /// Image location for an item: its embedded payload as a data URI, or
    /// the default asset path for ids without one (including unknown ids).
    pub fn image_uri(&self, id: &str) -> String {
        match self.find_by_id(id).and_then(|item| item.image.as_deref()) {
            Some(payload) => format!("data:image/png;base64,{payload}"),
            None => format!("{DEFAULT_IMAGE_DIR}/{id}.png"),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),
}
