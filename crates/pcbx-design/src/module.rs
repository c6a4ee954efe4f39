use std::ops::BitOr;

use crate::design::{ModuleId, ParamId};
use crate::part::Part;

/// Capability flags queried by the resolution engine.
///
/// Capabilities are a flag set checked by predicate rather than a type
/// hierarchy: a module gains and combines capabilities independently of
/// its place in the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caps(u8);

impl Caps {
    /// No capabilities.
    pub const NONE: Caps = Caps(0);
    /// The module can be resolved directly against the catalog.
    pub const PICKABLE: Caps = Caps(1 << 0);
    /// The module names an explicit part number to resolve to.
    pub const PICK_BY_PART_NUMBER: Caps = Caps(1 << 1);
    /// The module names an explicit supplier id to resolve to.
    pub const PICK_BY_SUPPLIER_ID: Caps = Caps(1 << 2);
    /// A part is already attached; the module is permanently resolved.
    pub const HAS_PART: Caps = Caps(1 << 3);
    /// The module is a footprint placeholder, not a resolvable component.
    pub const FOOTPRINT: Caps = Caps(1 << 4);
    /// A footprint is defined for the module.
    pub const HAS_FOOTPRINT: Caps = Caps(1 << 5);

    /// Every capability that makes a module resolvable at all.
    pub const ANY_PICKABLE: Caps = Caps(
        Caps::PICKABLE.0 | Caps::PICK_BY_PART_NUMBER.0 | Caps::PICK_BY_SUPPLIER_ID.0,
    );

    /// All of `other` are present.
    pub fn contains(self, other: Caps) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one of `other` is present.
    pub fn intersects(self, other: Caps) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Caps) {
        self.0 |= other.0;
    }
}

impl BitOr for Caps {
    type Output = Caps;

    fn bitor(self, rhs: Caps) -> Caps {
        Caps(self.0 | rhs.0)
    }
}

/// A node in the hierarchical design.
///
/// Strong ownership flows parent to child through the [`Design`] arena;
/// a child keeps only its parent's id as a back-reference for upward
/// searches.
///
/// [`Design`]: crate::Design
#[derive(Debug, Clone)]
pub struct Module {
    /// Short name within the parent scope
    pub name: String,
    /// Capability flags
    pub caps: Caps,
    pub(crate) parent: Option<ModuleId>,
    pub(crate) children: Vec<ModuleId>,
    pub(crate) params: Vec<ParamId>,
    pub(crate) part: Option<Part>,
    pub(crate) specialized: Option<ModuleId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caps: Caps::NONE,
            parent: None,
            children: Vec::new(),
            params: Vec::new(),
            part: None,
            specialized: None,
        }
    }

    pub fn with_caps(mut self, caps: Caps) -> Self {
        self.caps = caps;
        self
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    /// Direct children, in declaration order.
    pub fn children(&self) -> &[ModuleId] {
        &self.children
    }

    /// Parameters owned by this module.
    pub fn params(&self) -> &[ParamId] {
        &self.params
    }

    pub fn part(&self) -> Option<&Part> {
        self.part.as_ref()
    }

    pub fn has_part(&self) -> bool {
        self.caps.contains(Caps::HAS_PART)
    }

    /// More specific variant this module was specialized into, if any.
    pub fn specialized(&self) -> Option<ModuleId> {
        self.specialized
    }
}
