use indexmap::map::Entry;
use indexmap::IndexMap;
use pcbx_design::{Caps, Design, ModuleId};

/// Hierarchical view of the modules still requiring resolution.
///
/// Mirrors the design hierarchy restricted to unresolved modules: a
/// module appears iff it still needs a part and no ancestor already has
/// one attached (an ancestor's part resolves its whole subtree as a
/// unit). Entry order follows declaration order in the design.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickTree {
    entries: IndexMap<ModuleId, PickTree>,
}

impl PickTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat tree over the given modules, each with an empty subtree.
    pub fn from_modules(modules: impl IntoIterator<Item = ModuleId>) -> Self {
        Self {
            entries: modules.into_iter().map(|m| (m, PickTree::new())).collect(),
        }
    }

    /// Build the tree for the hierarchy rooted at `root`.
    ///
    /// A module that already has a part contributes nothing. A resolvable
    /// module becomes an entry holding the merged trees of its children.
    /// Other modules are transparent: their children merge into the
    /// surrounding level.
    pub fn build(design: &Design, root: ModuleId) -> PickTree {
        let root = design.most_special(root);
        let mut tree = PickTree::new();
        if design.has_cap(root, Caps::HAS_PART) {
            return tree;
        }
        if design.has_any_cap(root, Caps::ANY_PICKABLE) {
            let mut sub = PickTree::new();
            for &child in design.module(root).children() {
                sub.merge(PickTree::build(design, child));
            }
            tree.entries.insert(root, sub);
        } else {
            for &child in design.module(root).children() {
                tree.merge(PickTree::build(design, child));
            }
        }
        tree
    }

    /// Drop resolved modules, collapsing entries whose whole subtree has
    /// been resolved.
    ///
    /// Returns the pruned tree and whether this tree went from non-empty
    /// to fully resolved. Pruning an already-empty tree reports `false`.
    pub fn prune(&self, design: &Design) -> (PickTree, bool) {
        if self.entries.is_empty() {
            return (PickTree::new(), false);
        }
        let mut out = PickTree::new();
        for (&module, sub) in &self.entries {
            if design.has_part(module) {
                continue;
            }
            let (pruned, resolved) = sub.prune(design);
            if resolved {
                continue;
            }
            out.entries.insert(module, pruned);
        }
        let resolved = out.entries.is_empty();
        (out, resolved)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Top-level modules, in order.
    pub fn modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.entries.keys().copied()
    }

    /// Every contained module, depth-first.
    pub fn all_modules(&self) -> Vec<ModuleId> {
        let mut out = Vec::new();
        for (&m, sub) in &self.entries {
            out.push(m);
            out.extend(sub.all_modules());
        }
        out
    }

    /// Subtree for `module`, searched depth-first.
    pub fn subtree(&self, module: ModuleId) -> Option<&PickTree> {
        if let Some(sub) = self.entries.get(&module) {
            return Some(sub);
        }
        self.entries.values().find_map(|sub| sub.subtree(module))
    }

    /// Modules with no unresolved descendants of their own.
    pub fn leaves(&self) -> Vec<ModuleId> {
        let mut out = Vec::new();
        for (&m, sub) in &self.entries {
            if sub.is_empty() {
                out.push(m);
            } else {
                out.extend(sub.leaves());
            }
        }
        out
    }

    /// Leaves covered by `module`'s subtree, never less than one.
    pub fn leaf_count(&self, module: ModuleId) -> usize {
        match self.subtree(module) {
            Some(sub) => sub.leaves().len().max(1),
            None => 1,
        }
    }

    fn merge(&mut self, other: PickTree) {
        for (m, sub) in other.entries {
            match self.entries.entry(m) {
                Entry::Occupied(mut e) => e.get_mut().merge(sub),
                Entry::Vacant(e) => {
                    e.insert(sub);
                }
            }
        }
    }
}
