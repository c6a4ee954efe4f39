use indexmap::IndexMap;
use pcbx_design::{Design, ModuleId};
use thiserror::Error;

use crate::catalog::Incompatible;
use crate::solver::Contradiction;

/// Structured failure of a resolution run.
///
/// Every variant names the implicated modules so callers can display the
/// failure against the design hierarchy.
#[derive(Debug, Error)]
pub enum PickError {
    /// Resolution failed for the given modules.
    #[error("{message}")]
    Unresolvable {
        message: String,
        modules: Vec<ModuleId>,
    },

    /// The module has no resolution strategy at all.
    #[error("could not pick part for {module}: not implemented")]
    NotImplemented { module: ModuleId },

    /// The design resolved provisionally but failed the final
    /// whole-design consistency check.
    #[error("post-pick verification failed: {source}")]
    Verification {
        #[source]
        source: Contradiction,
        modules: Vec<ModuleId>,
    },

    /// Resolution failed for children of `module`; one error per child.
    #[error("could not pick parts for children of {module}")]
    Children {
        module: ModuleId,
        children: IndexMap<ModuleId, PickError>,
    },

    /// A specific candidate was rejected by a parameter's feasible set.
    #[error(transparent)]
    Incompatible(#[from] Incompatible),
}

impl PickError {
    /// Modules implicated in this error.
    pub fn modules(&self) -> Vec<ModuleId> {
        match self {
            PickError::Unresolvable { modules, .. } | PickError::Verification { modules, .. } => {
                modules.clone()
            }
            PickError::NotImplemented { module } => vec![*module],
            PickError::Children { children, .. } => children.keys().copied().collect(),
            PickError::Incompatible(e) => vec![e.module],
        }
    }

    /// Terminal causes keyed by module, with nested aggregates inlined.
    ///
    /// Aggregation nodes never appear in the result; a caller sees only
    /// leaf errors, each implicated module exactly once.
    pub fn flatten(&self) -> IndexMap<ModuleId, &PickError> {
        let mut out = IndexMap::new();
        match self {
            PickError::Children { children, .. } => {
                for (m, err) in children {
                    if matches!(err, PickError::Children { .. }) {
                        out.extend(err.flatten());
                    } else {
                        out.insert(*m, err);
                    }
                }
            }
            other => {
                for m in other.modules() {
                    out.insert(m, other);
                }
            }
        }
        out
    }

    /// Human-readable rendering with module names resolved.
    pub fn describe(&self, design: &Design) -> String {
        match self {
            PickError::Unresolvable { message, modules } => {
                format!("{message} ({})", names(design, modules))
            }
            PickError::NotImplemented { module } => {
                format!(
                    "could not pick part for {}: not implemented",
                    design.full_name(*module)
                )
            }
            PickError::Verification { source, modules } => {
                format!(
                    "post-pick verification failed for {}: {source}",
                    names(design, modules)
                )
            }
            PickError::Children { module, .. } => {
                let mut lines = vec![format!(
                    "could not pick parts for children of {}:",
                    design.full_name(*module)
                )];
                for (m, err) in self.flatten() {
                    lines.push(format!("  {}: {}", design.full_name(m), err));
                }
                lines.join("\n")
            }
            PickError::Incompatible(e) => e.describe(design),
        }
    }
}

fn names(design: &Design, modules: &[ModuleId]) -> String {
    modules
        .iter()
        .map(|&m| design.full_name(m))
        .collect::<Vec<_>>()
        .join(", ")
}
