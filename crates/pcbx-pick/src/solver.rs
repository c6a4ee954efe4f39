use std::collections::HashMap;

use pcbx_design::{Design, ModuleId, ParamId, Value, ValueSet};
use thiserror::Error;

/// An unsatisfiable constraint state detected by the solver.
///
/// Raised by [`Solver::refresh`] and [`Solver::verify`]; the engine
/// catches it at every call site and wraps it into the pick error
/// taxonomy.
#[derive(Debug, Clone, Error)]
#[error("contradiction: {message}")]
pub struct Contradiction {
    /// Human-readable cause
    pub message: String,
    /// Parameters implicated in the conflict
    pub params: Vec<ParamId>,
    /// Literal values that were forced equal but differ, when known
    pub literals: Vec<Value>,
}

impl Contradiction {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            params: Vec::new(),
            literals: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<ParamId>) -> Self {
        self.params = params;
        self
    }

    pub fn with_literals(mut self, literals: Vec<Value>) -> Self {
        self.literals = literals;
        self
    }
}

/// The solver cannot prove that a candidate determines a module's
/// parameters.
#[derive(Debug, Clone, Error)]
#[error("cannot deduce {param} for {module}")]
pub struct NotDeducible {
    pub module: ModuleId,
    pub param: ParamId,
}

/// Opaque reusable state from a prior solver pass.
///
/// Maps parameters to the constraint graph they ended up in, which lets
/// the engine derive module groups without re-walking relations. Its
/// absence never changes results, only grouping cost.
#[derive(Debug, Clone, Default)]
pub struct ReusableState {
    param_graphs: HashMap<ParamId, usize>,
}

impl ReusableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `param` belongs to constraint graph `graph`.
    pub fn map_param(&mut self, param: ParamId, graph: usize) {
        self.param_graphs.insert(param, graph);
    }

    pub fn graph_of(&self, param: ParamId) -> Option<usize> {
        self.param_graphs.get(&param).copied()
    }
}

/// Constraint-solving oracle.
///
/// The engine triggers cache refreshes and reads feasible sets; it never
/// mutates them. Both calls are synchronous and may be slow.
pub trait Solver {
    /// Re-propagate constraints and update the cached feasible sets for
    /// the given modules' parameters.
    fn refresh(&mut self, design: &Design, modules: &[ModuleId]) -> Result<(), Contradiction>;

    /// Full consistency re-check over the given modules.
    fn verify(&mut self, design: &Design, modules: &[ModuleId]) -> Result<(), Contradiction>;

    /// Current feasible-set estimate for a parameter.
    fn feasible(&self, design: &Design, param: ParamId) -> ValueSet;

    /// Reusable state from a prior pass, when the implementation keeps
    /// one.
    fn reusable_state(&self) -> Option<&ReusableState> {
        None
    }
}
