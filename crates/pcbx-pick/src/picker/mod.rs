//! Part picking for pcbx designs.
//!
//! The picker walks the design hierarchy, asks the [`Catalog`] for
//! candidate parts, and attaches a part to every module that needs one,
//! using the [`Solver`] to keep cross-module constraints satisfied.
//!
//! # Architecture
//!
//! - [`PickTree`]: hierarchical view of the modules still requiring a part
//! - [`independent_groups`]: partition of modules into sets that can be
//!   resolved without affecting each other
//! - [`pick_topologically`]: the driver. Explicit picks first, then
//!   unambiguous (single-candidate) modules in one batch, then grouped
//!   incremental resolution, then a final whole-design verification
//! - [`PickError`]: structured failures naming the implicated modules
//!
//! [`Catalog`]: crate::catalog::Catalog
//! [`Solver`]: crate::solver::Solver

mod diagnostics;
mod driver;
mod error;
mod groups;
mod progress;
mod tree;


pub use diagnostics::{missing_pick_report, CoverageReport};
pub use driver::{pick_parts, pick_topologically};
pub use error::PickError;
pub use groups::independent_groups;
pub use progress::{PickObserver, PickProgress};
pub use tree::PickTree;
