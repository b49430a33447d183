// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the module forest.
//!
//! The [`ModuleForest`] owns every module in a slot map with stable,
//! generational keys. Each node keeps its parent as a plain key (a non-owning
//! back-reference) and its children as an ordered key list. Top-level modules
//! are listed in `roots`, in insertion order.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::ModuleKey;
use crate::module::Module;

/// A module plus its links.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    pub module: Module,
    pub(crate) parent: Option<ModuleKey>,
    pub(crate) children: Vec<ModuleKey>,
}

/// Ordered forest of module trees.
///
/// # Example
///
/// ```
/// use cabinet_lite_core::ModuleKind;
/// use cabinet_lite_tree::{Module, ModuleForest};
///
/// let mut forest = ModuleForest::new();
/// let cabinet = forest.add_root(Module::new("1", ModuleKind::Unknown));
/// let board = forest.add_child(cabinet, Module::new("2", ModuleKind::Board)).unwrap();
///
/// assert_eq!(forest.children(cabinet), &[board]);
/// assert_eq!(forest.parent(board), Some(cabinet));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleForest {
    pub(crate) nodes: SlotMap<ModuleKey, ModuleNode>,
    pub(crate) roots: Vec<ModuleKey>,
    pub(crate) by_id: FxHashMap<String, ModuleKey>,
}

impl ModuleForest {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Insertion ---

    /// Stores a module without linking it anywhere. The first module with a
    /// given id owns that id for [`ModuleForest::find_by_id`].
    pub fn insert(&mut self, module: Module) -> ModuleKey {
        let id = module.id.clone();
        let key = self.nodes.insert(ModuleNode {
            module,
            parent: None,
            children: Vec::new(),
        });
        self.by_id.entry(id).or_insert(key);
        key
    }

    pub fn add_root(&mut self, module: Module) -> ModuleKey {
        let key = self.insert(module);
        self.roots.push(key);
        key
    }

    pub fn add_child(&mut self, parent: ModuleKey, module: Module) -> Result<ModuleKey> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NotFound(parent));
        }
        let key = self.insert(module);
        self.attach(parent, key)?;
        Ok(key)
    }

    // --- Linking ---

    /// Appends an unlinked module to the roots.
    pub fn make_root(&mut self, key: ModuleKey) -> Result<()> {
        self.detach(key)?;
        self.roots.push(key);
        Ok(())
    }

    /// Links `child` as the last child of `parent`, unlinking it first.
    pub fn attach(&mut self, parent: ModuleKey, child: ModuleKey) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NotFound(parent));
        }
        // A leaf cannot be anyone's ancestor.
        let has_children = !self.children(child).is_empty();
        if parent == child || (has_children && self.is_ancestor(child, parent)) {
            return Err(Error::Cycle { parent, child });
        }
        self.detach(child)?;
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Removes `key` from its parent's children (or from the roots).
    pub fn detach(&mut self, key: ModuleKey) -> Result<()> {
        let parent = self.nodes.get(key).ok_or(Error::NotFound(key))?.parent;
        match parent {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(p) {
                    node.children.retain(|c| *c != key);
                }
            }
            None => self.roots.retain(|r| *r != key),
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = None;
        }
        Ok(())
    }

    /// Whether `ancestor` lies on the parent chain of `key`.
    pub fn is_ancestor(&self, ancestor: ModuleKey, key: ModuleKey) -> bool {
        let mut current = self.parent(key);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    // --- Removal ---

    /// Removes a module and everything below it.
    pub fn remove_subtree(&mut self, key: ModuleKey) -> Result<()> {
        self.detach(key)?;
        for k in self.pre_order_from(key) {
            if let Some(node) = self.nodes.remove(k) {
                if self.by_id.get(&node.module.id) == Some(&k) {
                    self.by_id.remove(&node.module.id);
                }
            }
        }
        Ok(())
    }

    /// Keeps only the roots for which `keep` returns `true`.
    pub fn retain_roots(&mut self, mut keep: impl FnMut(&ModuleForest, ModuleKey) -> bool) {
        let dropped: Vec<ModuleKey> =
            self.roots.iter().copied().filter(|r| !keep(self, *r)).collect();
        for root in dropped {
            // Keys come from `roots`, so removal cannot miss.
            let _ = self.remove_subtree(root);
        }
    }

    // --- Queries ---

    pub fn get(&self, key: ModuleKey) -> Option<&Module> {
        self.nodes.get(key).map(|n| &n.module)
    }

    pub fn get_mut(&mut self, key: ModuleKey) -> Option<&mut Module> {
        self.nodes.get_mut(key).map(|n| &mut n.module)
    }

    pub fn contains(&self, key: ModuleKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn parent(&self, key: ModuleKey) -> Option<ModuleKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    pub fn children(&self, key: ModuleKey) -> &[ModuleKey] {
        self.nodes.get(key).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[ModuleKey] {
        &self.roots
    }

    pub fn find_by_id(&self, id: &str) -> Option<ModuleKey> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All modules in arena order (not tree order).
    pub fn iter(&self) -> impl Iterator<Item = (ModuleKey, &Module)> {
        self.nodes.iter().map(|(k, n)| (k, &n.module))
    }
}
