//! Item types and the recipe graph.
//!
//! # Recipe graph
//!
//! Each `ItemType` lists its ingredients as `ItemId`s; a repeated id means
//! that many units.  The graph must be acyclic.  [`ItemCatalog::validate`]
//! enforces this with a depth-first search and reports the loop by name, so
//! demand expansion (which walks the graph recursively) always terminates.

use ws_core::ItemId;

use crate::{CraftError, CraftResult};

/// An immutable description of a good.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemType {
    pub name:        String,
    pub craftable:   bool,
    /// Required inputs, repeats meaning quantity.
    pub ingredients: Vec<ItemId>,
}

/// All item types of a workshop, indexed by `ItemId`.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: Vec<ItemType>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item.  Ingredients must already be registered, which
    /// makes cycles impossible through this method alone.
    pub fn add(&mut self, name: impl Into<String>, craftable: bool, ingredients: Vec<ItemId>) -> CraftResult<ItemId> {
        let name = name.into();
        if self.find(&name).is_some() {
            return Err(CraftError::DuplicateItem(name));
        }
        for &ing in &ingredients {
            self.check(ing)?;
        }
        let id = ItemId::try_from(self.items.len())
            .map_err(|_| CraftError::Parse(format!("too many item types (adding {name:?})")))?;
        self.items.push(ItemType { name, craftable, ingredients });
        Ok(id)
    }

    /// Replace an item's ingredient list.  Forward references are allowed
    /// here; call [`validate`](Self::validate) once all items are wired.
    pub fn set_ingredients(&mut self, id: ItemId, ingredients: Vec<ItemId>) -> CraftResult<()> {
        self.check(id)?;
        for &ing in &ingredients {
            self.check(ing)?;
        }
        self.items[id.index()].ingredients = ingredients;
        Ok(())
    }

    fn check(&self, id: ItemId) -> CraftResult<()> {
        if id.index() < self.items.len() {
            Ok(())
        } else {
            Err(CraftError::UnknownItemId(id))
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemType> {
        self.items.get(id.index())
    }

    /// Display name, or `"?"` for an id outside the catalog.
    pub fn name(&self, id: ItemId) -> &str {
        self.get(id).map_or("?", |i| i.name.as_str())
    }

    pub fn find(&self, name: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|i| i.name == name)
            .map(|idx| ItemId(idx as u16))
    }

    /// Ingredients of `id`; empty for raw materials and unknown ids.
    pub fn ingredients(&self, id: ItemId) -> &[ItemId] {
        self.get(id).map(|i| i.ingredients.as_slice()).unwrap_or_default()
    }

    pub fn is_craftable(&self, id: ItemId) -> bool {
        self.get(id).is_some_and(|i| i.craftable)
    }

    /// `true` if `part` appears directly in the recipe of `whole`.
    pub fn is_ingredient_of(&self, part: ItemId, whole: ItemId) -> bool {
        self.ingredients(whole).contains(&part)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemType)> {
        self.items.iter().enumerate().map(|(i, t)| (ItemId(i as u16), t))
    }

    /// Fail with [`CraftError::RecipeCycle`] if any item transitively
    /// requires itself.
    pub fn validate(&self) -> CraftResult<()> {
        #[derive(Copy, Clone, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        fn visit(
            catalog: &ItemCatalog,
            id:      ItemId,
            marks:   &mut [Mark],
            path:    &mut Vec<ItemId>,
        ) -> CraftResult<()> {
            match marks[id.index()] {
                Mark::Done => return Ok(()),
                Mark::OnPath => {
                    let start = path.iter().position(|&p| p == id).unwrap_or(0);
                    let mut names: Vec<String> =
                        path[start..].iter().map(|&p| catalog.name(p).to_owned()).collect();
                    names.push(catalog.name(id).to_owned());
                    return Err(CraftError::RecipeCycle(names));
                }
                Mark::Unvisited => {}
            }
            marks[id.index()] = Mark::OnPath;
            path.push(id);
            for &ing in catalog.ingredients(id) {
                visit(catalog, ing, marks, path)?;
            }
            path.pop();
            marks[id.index()] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.items.len()];
        let mut path = Vec::new();
        for (id, _) in self.iter() {
            visit(self, id, &mut marks, &mut path)?;
        }
        Ok(())
    }

    /// Depth-first expansion of `roots` into every reachable item, roots
    /// included, counting shared sub-ingredients once per use.
    ///
    /// Assumes a validated (acyclic) catalog.
    pub fn expand(&self, roots: &[ItemId]) -> Vec<ItemId> {
        fn walk(catalog: &ItemCatalog, id: ItemId, out: &mut Vec<ItemId>) {
            out.push(id);
            for &ing in catalog.ingredients(id) {
                walk(catalog, ing, out);
            }
        }

        let mut out = Vec::new();
        for &root in roots {
            walk(self, root, &mut out);
        }
        out
    }
}
