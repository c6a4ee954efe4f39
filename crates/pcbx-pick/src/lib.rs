//! Component-resolution engine for pcbx designs.
//!
//! Given a hierarchical design of abstract modules, the engine assigns to
//! every leaf module a concrete purchasable part satisfying all parametric
//! constraints, including constraints that couple parameters across
//! modules.
//!
//! Two collaborators are oracles behind traits:
//!
//! - [`Solver`]: constraint propagation over parameter feasible sets
//! - [`Catalog`]: candidate part enumeration for a set of modules
//!
//! The entry point is [`picker::pick_parts`].

pub mod catalog;
pub mod picker;
pub mod solver;
pub mod util;

pub use catalog::{AttachError, Catalog, Incompatible};
pub use picker::{
    independent_groups, missing_pick_report, pick_parts, pick_topologically, CoverageReport,
    PickError, PickObserver, PickProgress, PickTree,
};
pub use solver::{Contradiction, NotDeducible, ReusableState, Solver};
