use std::fmt;

use crate::constraint::Relation;
use crate::module::{Caps, Module};
use crate::parameter::Parameter;
use crate::part::Part;

/// Stable handle to a module in a [`Design`].
///
/// Ids are only valid for the design that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

/// Stable handle to a parameter in a [`Design`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(u32);

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "param#{}", self.0)
    }
}

#[derive(Debug)]
struct ParamEntry {
    owner: ModuleId,
    param: Parameter,
}

/// Arena owning the whole design hierarchy.
///
/// Modules, parameters and relations are stored contiguously and addressed
/// by id. The elaboration front end builds a design; the resolution engine
/// mutates it only by attaching parts.
#[derive(Debug, Default)]
pub struct Design {
    modules: Vec<Module>,
    params: Vec<ParamEntry>,
    relations: Vec<Relation>,
}

impl Design {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module under `parent`, or as a root when `None`.
    pub fn add_module(&mut self, mut module: Module, parent: Option<ModuleId>) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        module.parent = parent;
        self.modules.push(module);
        if let Some(p) = parent {
            self.modules[p.0 as usize].children.push(id);
        }
        id
    }

    /// Add a parameter owned by `owner`.
    pub fn add_param(&mut self, owner: ModuleId, param: Parameter) -> ParamId {
        let id = ParamId(self.params.len() as u32);
        self.params.push(ParamEntry { owner, param });
        self.modules[owner.0 as usize].params.push(id);
        id
    }

    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0 as usize]
    }

    pub fn param(&self, id: ParamId) -> &Parameter {
        &self.params[id.0 as usize].param
    }

    /// The module that owns a parameter.
    pub fn param_owner(&self, id: ParamId) -> ModuleId {
        self.params[id.0 as usize].owner
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// All module ids, in creation order.
    pub fn modules(&self) -> impl Iterator<Item = ModuleId> {
        (0..self.modules.len() as u32).map(ModuleId)
    }

    /// Record that `module` has been superseded by a more specific variant.
    pub fn specialize(&mut self, module: ModuleId, special: ModuleId) {
        self.modules[module.0 as usize].specialized = Some(special);
    }

    /// Follow the specialization chain to the most specific variant.
    pub fn most_special(&self, mut id: ModuleId) -> ModuleId {
        while let Some(s) = self.module(id).specialized {
            id = s;
        }
        id
    }

    pub fn has_cap(&self, id: ModuleId, caps: Caps) -> bool {
        self.module(id).caps.contains(caps)
    }

    pub fn has_any_cap(&self, id: ModuleId, caps: Caps) -> bool {
        self.module(id).caps.intersects(caps)
    }

    pub fn add_cap(&mut self, id: ModuleId, caps: Caps) {
        self.modules[id.0 as usize].caps.insert(caps);
    }

    pub fn has_part(&self, id: ModuleId) -> bool {
        self.module(id).has_part()
    }

    pub fn part(&self, id: ModuleId) -> Option<&Part> {
        self.module(id).part()
    }

    /// Bind a part to a module. One-way: the `HAS_PART` flag is set and the
    /// module is excluded from any further resolution in this run.
    pub fn attach_part(&mut self, id: ModuleId, part: Part) {
        let module = &mut self.modules[id.0 as usize];
        debug_assert!(module.part.is_none(), "part attachment is one-way");
        module.part = Some(part);
        module.caps.insert(Caps::HAS_PART);
    }

    /// Depth-first preorder walk of the subtree rooted at `root`,
    /// including `root` itself.
    pub fn descendants(&self, root: ModuleId) -> Vec<ModuleId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(m) = stack.pop() {
            out.push(m);
            // push children reversed so the walk stays in declaration order
            for &c in self.module(m).children().iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    /// Nearest module, starting from `id` itself and walking up, carrying
    /// any of `caps`.
    pub fn self_or_ancestor_with(&self, id: ModuleId, caps: Caps) -> Option<ModuleId> {
        let mut cur = Some(id);
        while let Some(m) = cur {
            if self.module(m).caps.intersects(caps) {
                return Some(m);
            }
            cur = self.module(m).parent;
        }
        None
    }

    /// Qualified name from the root, dot-separated.
    pub fn full_name(&self, id: ModuleId) -> String {
        let mut parts = vec![self.module(id).name.clone()];
        let mut cur = self.module(id).parent;
        while let Some(m) = cur {
            parts.push(self.module(m).name.clone());
            cur = self.module(m).parent;
        }
        parts.reverse();
        parts.join(".")
    }
}
