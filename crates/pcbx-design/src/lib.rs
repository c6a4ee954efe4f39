// Design model for pcbx hardware designs
//
// This crate provides the data model the resolution engine operates on:
// a module arena with typed ids, capability flags, constrainable
// parameters, equality relations and purchasable parts.

mod constraint;
mod design;
mod module;
mod parameter;
mod part;
mod value;

pub use constraint::{Expr, Relation};
pub use design::{Design, ModuleId, ParamId};
pub use module::{Caps, Module};
pub use parameter::Parameter;
pub use part::Part;
pub use value::{Value, ValueSet};
