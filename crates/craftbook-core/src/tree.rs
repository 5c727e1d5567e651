//! Recipe tree expansion for display.
//!
//! Unlike [`aggregate`](crate::aggregate::aggregate), the tree keeps every
//! occurrence of an ingredient as its own node and only expands the nodes an
//! [`ExpandPolicy`] selects. Nodes are stored in an arena and expanded with
//! an explicit worklist.

use crate::catalog::Catalog;
use crate::id::ItemId;
use crate::item::{Ingredient, Item, JobRole};
use std::collections::HashSet;

/// Which sub-recipes to open.
#[derive(Debug, Clone, Default)]
pub struct ExpandPolicy {
    /// Expand every recipe whose job is not the gathering role.
    pub crafting: bool,
    /// Expand gathering-role recipes.
    pub gathering: bool,
    /// Expand these ids regardless of role.
    pub items: HashSet<ItemId>,
}

impl ExpandPolicy {
    /// Only the root's direct ingredients are listed.
    pub fn collapsed() -> Self {
        Self::default()
    }

    /// Every recipe except gathering ones.
    pub fn crafting() -> Self {
        Self {
            crafting: true,
            ..Self::default()
        }
    }

    pub fn with_gathering(mut self, gathering: bool) -> Self {
        self.gathering = gathering;
        self
    }

    pub fn with_item(mut self, id: impl Into<ItemId>) -> Self {
        self.items.insert(id.into());
        self
    }

    fn expands(&self, item: &Item) -> bool {
        if self.items.contains(item.id.as_str()) {
            return true;
        }
        match item.role() {
            Some(JobRole::Gathering) => self.gathering,
            Some(_) => self.crafting,
            None => false,
        }
    }
}

/// One ingredient occurrence in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: ItemId,
    /// Ingredient amount times the quantity of the parent.
    pub quantity: f64,
    /// Job tag of the ingredient's recipe, if it has a non-empty one.
    pub job: Option<String>,
    pub has_recipe: bool,
    pub expanded: bool,
    /// Set instead of expanding when the id already appears among the
    /// node's ancestors.
    pub cyclic: bool,
    pub children: Vec<usize>,
    parent: Option<usize>,
}

/// Expanded recipe tree of a root item.
#[derive(Debug, Clone)]
pub struct RecipeTree {
    pub root: ItemId,
    pub multiplier: f64,
    nodes: Vec<TreeNode>,
    top: Vec<usize>,
}

impl RecipeTree {
    pub fn expand(root: &Item, multiplier: f64, catalog: &Catalog, policy: &ExpandPolicy) -> Self {
        let mut tree = Self {
            root: root.id.clone(),
            multiplier,
            nodes: Vec::new(),
            top: Vec::new(),
        };

        let mut worklist = Vec::new();
        for ingredient in root.ingredients() {
            let index = tree.push_node(ingredient, multiplier, None, catalog);
            tree.top.push(index);
            worklist.push(index);
        }

        while let Some(index) = worklist.pop() {
            let Some(item) = catalog.find_by_id(tree.nodes[index].id.as_str()) else {
                continue;
            };
            if item.ingredients().is_empty() || !policy.expands(item) {
                continue;
            }
            if tree.repeats_ancestor(index) {
                tree.nodes[index].cyclic = true;
                continue;
            }

            let quantity = tree.nodes[index].quantity;
            tree.nodes[index].expanded = true;
            for ingredient in item.ingredients() {
                let child = tree.push_node(ingredient, quantity, Some(index), catalog);
                tree.nodes[index].children.push(child);
                worklist.push(child);
            }
        }

        tree
    }

    fn push_node(
        &mut self,
        ingredient: &Ingredient,
        factor: f64,
        parent: Option<usize>,
        catalog: &Catalog,
    ) -> usize {
        let recipe = catalog
            .find_by_id(ingredient.id.as_str())
            .and_then(|item| item.recipe.as_ref());
        self.nodes.push(TreeNode {
            id: ingredient.id.clone(),
            quantity: ingredient.amount * factor,
            job: recipe.and_then(|r| r.job_label()).map(str::to_string),
            has_recipe: recipe.is_some(),
            expanded: false,
            cyclic: false,
            children: Vec::new(),
            parent,
        });
        self.nodes.len() - 1
    }

    fn repeats_ancestor(&self, index: usize) -> bool {
        let id = &self.nodes[index].id;
        if *id == self.root {
            return true;
        }
        let mut cursor = self.nodes[index].parent;
        while let Some(ancestor) = cursor {
            if self.nodes[ancestor].id == *id {
                return true;
            }
            cursor = self.nodes[ancestor].parent;
        }
        false
    }

    /// Indices of the root's direct ingredients, in recipe order.
    pub fn top_level(&self) -> &[usize] {
        &self.top
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, pre-order traversal in recipe order. Top-level nodes
    /// have depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: self.top.iter().rev().map(|&index| (0, index)).collect(),
        }
    }
}

/// Iterator returned by [`RecipeTree::walk`].
pub struct Walk<'a> {
    tree: &'a RecipeTree,
    stack: Vec<(usize, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, index) = self.stack.pop()?;
        let node = &self.tree.nodes[index];
        self.stack
            .extend(node.children.iter().rev().map(|&child| (depth + 1, child)));
        Some((depth, node))
    }
}
