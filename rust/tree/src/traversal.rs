// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Depth-first traversal of the module forest.
//!
//! Every walk is pre-order (a node before its children, children in list
//! order) and runs on an explicit stack, so deep exports cannot overflow the
//! call stack.

use crate::arena::ModuleForest;
use crate::keys::ModuleKey;
use crate::module::Module;

impl ModuleForest {
    /// Pre-order keys of the whole forest, roots in order.
    pub fn pre_order(&self) -> Vec<ModuleKey> {
        let mut out = Vec::with_capacity(self.len());
        for &root in &self.roots {
            self.push_pre_order(root, &mut out);
        }
        out
    }

    /// Pre-order keys of the subtree rooted at `key`, `key` first.
    pub fn pre_order_from(&self, key: ModuleKey) -> Vec<ModuleKey> {
        let mut out = Vec::new();
        self.push_pre_order(key, &mut out);
        out
    }

    fn push_pre_order(&self, start: ModuleKey, out: &mut Vec<ModuleKey>) {
        if !self.contains(start) {
            return;
        }
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.children(key).iter().rev().copied());
        }
    }

    /// Strict descendants of `key`, in pre-order.
    pub fn descendants(&self, key: ModuleKey) -> Vec<ModuleKey> {
        let mut keys = self.pre_order_from(key);
        if !keys.is_empty() {
            keys.remove(0);
        }
        keys
    }

    /// Whether any strict descendant of `key` satisfies `pred`.
    pub fn any_descendant(&self, key: ModuleKey, mut pred: impl FnMut(&Module) -> bool) -> bool {
        let mut stack: Vec<ModuleKey> = self.children(key).to_vec();
        while let Some(k) = stack.pop() {
            if self.get(k).is_some_and(&mut pred) {
                return true;
            }
            stack.extend_from_slice(self.children(k));
        }
        false
    }

    /// Visits every module in pre-order.
    pub fn walk(&self, mut visit: impl FnMut(ModuleKey, &Module)) {
        for key in self.pre_order() {
            if let Some(module) = self.get(key) {
                visit(key, module);
            }
        }
    }

    /// Visits every module in pre-order together with its parent, if any.
    pub fn walk_with_parent(&self, mut visit: impl FnMut(Option<&Module>, ModuleKey, &Module)) {
        for key in self.pre_order() {
            let parent = self.parent(key).and_then(|p| self.get(p));
            if let Some(module) = self.get(key) {
                visit(parent, key, module);
            }
        }
    }

    /// Parent chain of `key`, nearest first.
    pub fn ancestors(&self, key: ModuleKey) -> Vec<ModuleKey> {
        let mut out = Vec::new();
        let mut current = self.parent(key);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Number of edges between `key` and its root.
    pub fn depth(&self, key: ModuleKey) -> usize {
        self.ancestors(key).len()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Module, ModuleForest};
    use cabinet_lite_core::ModuleKind;

    fn sample() -> (ModuleForest, Vec<&'static str>) {
        let mut forest = ModuleForest::new();
        let a = forest.add_root(Module::new("a", ModuleKind::Unknown));
        let b = forest.add_child(a, Module::new("b", ModuleKind::Unknown)).unwrap();
        forest.add_child(b, Module::new("c", ModuleKind::Board)).unwrap();
        forest.add_child(a, Module::new("d", ModuleKind::Unknown)).unwrap();
        forest.add_root(Module::new("e", ModuleKind::Unknown));
        (forest, vec!["a", "b", "c", "d", "e"])
    }

    #[test]
    fn pre_order_visits_parent_before_children() {
        let (forest, expected) = sample();
        let mut seen = Vec::new();
        forest.walk(|_, m| seen.push(m.id.clone()));
        assert_eq!(seen, expected);
    }

    #[test]
    fn descendants_exclude_self() {
        let (forest, _) = sample();
        let a = forest.find_by_id("a").unwrap();
        let ids: Vec<_> = forest
            .descendants(a)
            .into_iter()
            .map(|k| forest.get(k).unwrap().id.clone())
            .collect();
        assert_eq!(ids, ["b", "c", "d"]);
    }

    #[test]
    fn any_descendant_is_strict() {
        let (forest, _) = sample();
        let a = forest.find_by_id("a").unwrap();
        let c = forest.find_by_id("c").unwrap();
        assert!(forest.any_descendant(a, |m| m.kind.is_board_family()));
        assert!(!forest.any_descendant(c, |m| m.kind.is_board_family()));
    }

    #[test]
    fn parent_context_and_depth() {
        let (forest, _) = sample();
        let mut pairs = Vec::new();
        forest.walk_with_parent(|parent, _, m| {
            pairs.push((parent.map(|p| p.id.clone()), m.id.clone()))
        });
        assert_eq!(pairs[0], (None, "a".to_owned()));
        assert_eq!(pairs[2], (Some("b".to_owned()), "c".to_owned()));
        let c = forest.find_by_id("c").unwrap();
        assert_eq!(forest.depth(c), 2);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut forest = ModuleForest::new();
        let mut parent = forest.add_root(Module::new("0", ModuleKind::Unknown));
        for i in 1..100_000 {
            let module = Module::new(i.to_string(), ModuleKind::Unknown);
            parent = forest.add_child(parent, module).unwrap();
        }
        assert_eq!(forest.pre_order().len(), 100_000);
    }
}
