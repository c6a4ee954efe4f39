use crate::design::ParamId;
use crate::value::Value;

/// A parameter-bearing expression: one side of an equality relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A known literal value.
    Literal(Value),
    /// A parameter reference.
    Param(ParamId),
    /// A parameter scaled by a constant factor, for tracking relations
    /// such as divider ratios.
    Scaled { factor: Value, param: ParamId },
}

impl Expr {
    pub fn literal(value: f64) -> Self {
        Expr::Literal(Value::new(value))
    }

    pub fn param(param: ParamId) -> Self {
        Expr::Param(param)
    }

    pub fn scaled(factor: f64, param: ParamId) -> Self {
        Expr::Scaled {
            factor: Value::new(factor),
            param,
        }
    }

    /// Parameters referenced by this expression.
    pub fn params(&self) -> Vec<ParamId> {
        match self {
            Expr::Literal(_) => Vec::new(),
            Expr::Param(p) => vec![*p],
            Expr::Scaled { param, .. } => vec![*param],
        }
    }

    /// The literal value this expression reduces to, if any.
    pub fn try_literal(&self) -> Option<Value> {
        match self {
            Expr::Literal(v) => Some(*v),
            _ => None,
        }
    }
}

/// An equality relation between two expressions.
///
/// Only enforced relations participate in resolution; unenforced ones are
/// suggestions recorded by the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub lhs: Expr,
    pub rhs: Expr,
    pub enforced: bool,
}

impl Relation {
    /// An equality suggestion, not yet enforced.
    pub fn is(lhs: Expr, rhs: Expr) -> Self {
        Self {
            lhs,
            rhs,
            enforced: false,
        }
    }

    /// Turn the relation into a hard constraint.
    pub fn enforce(mut self) -> Self {
        self.enforced = true;
        self
    }

    /// Parameters touched by either side, deduplicated.
    pub fn params(&self) -> Vec<ParamId> {
        let mut out = self.lhs.params();
        for p in self.rhs.params() {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Design;
    use crate::module::Module;
    use crate::parameter::Parameter;
    use crate::value::ValueSet;

    #[test]
    fn test_expr_params_and_literal() {
        let mut design = Design::new();
        let m = design.add_module(Module::new("m"), None);
        let p = design.add_param(m, Parameter::new("x", ValueSet::Full));

        assert!(Expr::literal(5.0).params().is_empty());
        assert_eq!(Expr::param(p).params(), vec![p]);
        assert_eq!(Expr::scaled(2.0, p).params(), vec![p]);

        assert_eq!(Expr::literal(5.0).try_literal(), Some(Value::new(5.0)));
        assert_eq!(Expr::param(p).try_literal(), None);
    }

    #[test]
    fn test_relation_params_dedup() {
        let mut design = Design::new();
        let m = design.add_module(Module::new("m"), None);
        let p = design.add_param(m, Parameter::new("x", ValueSet::Full));

        let relation = Relation::is(Expr::param(p), Expr::scaled(2.0, p)).enforce();
        assert_eq!(relation.params(), vec![p]);
        assert!(relation.enforced);
        assert!(!Relation::is(Expr::param(p), Expr::literal(1.0)).enforced);
    }
}
