use indexmap::IndexMap;
use pcbx_design::{Design, ModuleId, ParamId, Part, ValueSet};
use thiserror::Error;

use crate::picker::PickTree;
use crate::solver::{Contradiction, NotDeducible, Solver};

/// A candidate part's attribute falls outside a parameter's feasible set.
#[derive(Debug, Clone, Error)]
#[error("part {} is not compatible with {}", .part.display_name(), .module)]
pub struct Incompatible {
    pub module: ModuleId,
    pub part: Part,
    /// The parameter that rejected the part, when pinpointed
    pub param: Option<ParamId>,
    /// The feasible set the attribute fell outside of
    pub range: Option<ValueSet>,
}

impl Incompatible {
    pub fn new(module: ModuleId, part: Part) -> Self {
        Self {
            module,
            part,
            param: None,
            range: None,
        }
    }

    pub fn with_cause(module: ModuleId, part: Part, param: ParamId, range: ValueSet) -> Self {
        Self {
            module,
            part,
            param: Some(param),
            range: Some(range),
        }
    }

    /// Human-readable rendering with the parameter named.
    pub fn describe(&self, design: &Design) -> String {
        match (self.param, &self.range) {
            (Some(param), Some(range)) => format!(
                "`{}` ({range}) is not compatible with {} on {}",
                design.param(param).name,
                self.part.display_name(),
                design.full_name(self.module),
            ),
            _ => format!(
                "{} is not compatible with {}",
                self.part.display_name(),
                design.full_name(self.module),
            ),
        }
    }
}

/// Failure during a checked or batched attach.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error(transparent)]
    Contradiction(#[from] Contradiction),
    #[error(transparent)]
    Incompatible(#[from] Incompatible),
    #[error(transparent)]
    NotDeducible(#[from] NotDeducible),
}

/// Candidate-enumeration oracle over the supplier catalog.
///
/// The returned lists are in catalog preference order; the engine always
/// takes index 0 when a single choice is required. A module missing from
/// the returned map has no resolution strategy at all.
pub trait Catalog {
    fn candidates(
        &self,
        design: &Design,
        tree: &PickTree,
        solver: &dyn Solver,
    ) -> IndexMap<ModuleId, Vec<Part>>;
}

/// Bind `part` to `module` without compatibility checking.
pub fn attach_unchecked(design: &mut Design, module: ModuleId, part: Part) {
    log::debug!(
        "attaching {} to {}",
        part.display_name(),
        design.full_name(module)
    );
    design.attach_part(module, part);
}

/// Check a candidate against the current feasible sets.
///
/// Every part attribute matching one of the module's parameters by name
/// must lie within that parameter's feasible set. In strict mode each
/// checked parameter without a matching attribute must already be pinned
/// to a single value, otherwise the pick cannot be proven; relaxed mode
/// accepts the pick as long as nothing contradicts.
pub fn check_compatible(
    design: &Design,
    solver: &dyn Solver,
    module: ModuleId,
    part: &Part,
    relaxed: bool,
) -> Result<(), AttachError> {
    for &pid in design.module(module).params() {
        let param = design.param(pid);
        if param.skip_pick_check {
            continue;
        }
        let feasible = solver.feasible(design, pid);
        match part.attribute(&param.name) {
            Some(value) => {
                if !feasible.contains(value) {
                    return Err(
                        Incompatible::with_cause(module, part.clone(), pid, feasible).into(),
                    );
                }
            }
            None => {
                if !relaxed && feasible.singleton().is_none() {
                    return Err(NotDeducible { module, param: pid }.into());
                }
            }
        }
    }
    Ok(())
}

/// Check and attach a batch of picks.
///
/// Not atomic: picks are attached as they pass. A failure partway leaves
/// the earlier attachments in place; the run must then be treated as
/// failed and the design as unresolved.
pub fn verify_and_attach(
    design: &mut Design,
    solver: &mut dyn Solver,
    picks: Vec<(ModuleId, Part)>,
    relaxed: bool,
) -> Result<(), AttachError> {
    let modules: Vec<ModuleId> = picks.iter().map(|(m, _)| *m).collect();
    solver.refresh(design, &modules)?;
    for (module, part) in picks {
        check_compatible(design, solver, module, &part, relaxed)?;
        attach_unchecked(design, module, part);
    }
    Ok(())
}
