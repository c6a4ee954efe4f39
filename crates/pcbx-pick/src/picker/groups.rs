use std::collections::{HashMap, HashSet};

use pcbx_design::{Design, Expr, ModuleId, ParamId, Value};

use crate::solver::{Contradiction, ReusableState, Solver};
use crate::util::EquivalenceClasses;

/// Partition `modules` into sets with no resolution interdependency.
///
/// Two modules end up in the same group iff a chain of enforced relations
/// connects their parameters. Parameters already pinned to a literal do
/// not link modules: a shared known value is not a dependency. Modules
/// touching no enforced relation come back as singleton groups.
///
/// When the solver exposes reusable state from a prior pass, groups are
/// derived from its parameter-to-graph mapping instead of re-walking the
/// relations; the result is the same.
pub fn independent_groups(
    design: &Design,
    modules: &[ModuleId],
    solver: &dyn Solver,
) -> Result<Vec<Vec<ModuleId>>, Contradiction> {
    if let Some(state) = solver.reusable_state() {
        return Ok(groups_from_state(design, modules, state));
    }

    let in_set: HashSet<ModuleId> = modules.iter().copied().collect();

    // First pass: unify literals across directly aliased parameters and
    // fail fast when two different literals are forced equal.
    let mut aliased = EquivalenceClasses::new();
    let mut lits: HashMap<ParamId, Value> = HashMap::new();
    for relation in design.relations() {
        if !relation.enforced {
            continue;
        }
        match (&relation.lhs, &relation.rhs) {
            (Expr::Param(p), Expr::Literal(v)) | (Expr::Literal(v), Expr::Param(p)) => {
                aliased.insert(*p);
                if let Some(prev) = lits.insert(*p, *v) {
                    if prev != *v {
                        return Err(Contradiction::new(format!(
                            "`{}` is forced to both {prev} and {v}",
                            design.param(*p).name
                        ))
                        .with_params(vec![*p])
                        .with_literals(vec![prev, *v]));
                    }
                }
            }
            (Expr::Param(a), Expr::Param(b)) => aliased.union(*a, *b),
            _ => {}
        }
    }
    for class in aliased.classes() {
        let mut assigned: Vec<Value> = class.iter().filter_map(|p| lits.get(p).copied()).collect();
        assigned.sort();
        assigned.dedup();
        match assigned.len() {
            0 => {}
            1 => {
                let v = assigned[0];
                for p in class {
                    lits.insert(p, v);
                }
            }
            _ => {
                return Err(
                    Contradiction::new("different literals forced equal through aliases")
                        .with_params(class)
                        .with_literals(assigned),
                );
            }
        }
    }

    // Second pass: relate parameters appearing in the same enforced
    // relation, skipping pinned ones.
    let mut param_eqs = EquivalenceClasses::new();
    for relation in design.relations() {
        if !relation.enforced {
            continue;
        }
        let params: Vec<ParamId> = relation
            .params()
            .into_iter()
            .filter(|p| !lits.contains_key(p))
            .collect();
        param_eqs.union_all(params);
    }

    // Third pass: map parameter classes onto their owning modules.
    let mut module_eqs = EquivalenceClasses::with_members(modules.iter().copied());
    for class in param_eqs.classes() {
        let owners: Vec<ModuleId> = class
            .iter()
            .map(|&p| design.param_owner(p))
            .filter(|m| in_set.contains(m))
            .collect();
        module_eqs.union_all(owners);
    }

    let groups = module_eqs.classes();
    log::debug!("independent groups: {groups:?}");
    Ok(groups)
}

/// Fast path: derive module groups from a cached parameter-to-graph
/// mapping.
fn groups_from_state(
    design: &Design,
    modules: &[ModuleId],
    state: &ReusableState,
) -> Vec<Vec<ModuleId>> {
    let mut graphs = EquivalenceClasses::new();
    let mut graph_modules: HashMap<usize, Vec<ModuleId>> = HashMap::new();
    let mut module_eqs = EquivalenceClasses::with_members(modules.iter().copied());

    for &m in modules {
        let m_graphs: Vec<usize> = design
            .module(m)
            .params()
            .iter()
            .filter_map(|&p| state.graph_of(p))
            .collect();
        graphs.union_all(m_graphs.iter().copied());
        for g in m_graphs {
            graph_modules.entry(g).or_default().push(m);
        }
    }

    for class in graphs.classes() {
        let members: Vec<ModuleId> = class
            .iter()
            .flat_map(|g| graph_modules.get(g).cloned().unwrap_or_default())
            .collect();
        module_eqs.union_all(members);
    }

    module_eqs.classes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcbx_design::{Caps, Module, Parameter, Relation, ValueSet};

    /// Solver stub with no cache and optionally a reusable state.
    struct StubSolver {
        state: Option<ReusableState>,
    }

    impl StubSolver {
        fn bare() -> Self {
            Self { state: None }
        }
    }

    impl Solver for StubSolver {
        fn refresh(&mut self, _: &Design, _: &[ModuleId]) -> Result<(), Contradiction> {
            Ok(())
        }

        fn verify(&mut self, _: &Design, _: &[ModuleId]) -> Result<(), Contradiction> {
            Ok(())
        }

        fn feasible(&self, design: &Design, param: ParamId) -> ValueSet {
            design.param(param).domain.clone()
        }

        fn reusable_state(&self) -> Option<&ReusableState> {
            self.state.as_ref()
        }
    }

    fn module_with_param(design: &mut Design, name: &str) -> (ModuleId, ParamId) {
        let m = design.add_module(Module::new(name).with_caps(Caps::PICKABLE), None);
        let p = design.add_param(m, Parameter::new("resistance", ValueSet::Full));
        (m, p)
    }

    #[test]
    fn test_unconstrained_modules_are_singletons() {
        let mut design = Design::new();
        let (a, _) = module_with_param(&mut design, "a");
        let (b, _) = module_with_param(&mut design, "b");

        let groups = independent_groups(&design, &[a, b], &StubSolver::bare()).expect("groups");
        assert_eq!(groups, vec![vec![a], vec![b]]);
    }

    #[test]
    fn test_chained_relations_join_modules() {
        let mut design = Design::new();
        let (a, pa) = module_with_param(&mut design, "a");
        let (b, pb) = module_with_param(&mut design, "b");
        let (c, pc) = module_with_param(&mut design, "c");
        let (d, _) = module_with_param(&mut design, "d");
        design.add_relation(Relation::is(Expr::param(pa), Expr::param(pb)).enforce());
        design.add_relation(Relation::is(Expr::param(pb), Expr::param(pc)).enforce());

        let groups =
            independent_groups(&design, &[a, b, c, d], &StubSolver::bare()).expect("groups");
        assert_eq!(groups, vec![vec![a, b, c], vec![d]]);
    }

    #[test]
    fn test_unenforced_relations_do_not_join() {
        let mut design = Design::new();
        let (a, pa) = module_with_param(&mut design, "a");
        let (b, pb) = module_with_param(&mut design, "b");
        design.add_relation(Relation::is(Expr::param(pa), Expr::param(pb)));

        let groups = independent_groups(&design, &[a, b], &StubSolver::bare()).expect("groups");
        assert_eq!(groups, vec![vec![a], vec![b]]);
    }

    #[test]
    fn test_literal_pinned_params_do_not_link() {
        let mut design = Design::new();
        let (a, pa) = module_with_param(&mut design, "a");
        let (b, pb) = module_with_param(&mut design, "b");
        // both pinned to the same known value: no dependency remains
        design.add_relation(Relation::is(Expr::param(pa), Expr::literal(220.0)).enforce());
        design.add_relation(Relation::is(Expr::param(pb), Expr::literal(220.0)).enforce());
        design.add_relation(Relation::is(Expr::param(pa), Expr::param(pb)).enforce());

        let groups = independent_groups(&design, &[a, b], &StubSolver::bare()).expect("groups");
        assert_eq!(groups, vec![vec![a], vec![b]]);
    }

    #[test]
    fn test_scaled_relation_joins_modules() {
        let mut design = Design::new();
        let (a, pa) = module_with_param(&mut design, "a");
        let (b, pb) = module_with_param(&mut design, "b");
        design.add_relation(Relation::is(Expr::param(pa), Expr::scaled(2.0, pb)).enforce());

        let groups = independent_groups(&design, &[a, b], &StubSolver::bare()).expect("groups");
        assert_eq!(groups, vec![vec![a, b]]);
    }

    #[test]
    fn test_conflicting_literals_fail_fast() {
        let mut design = Design::new();
        let (_a, pa) = module_with_param(&mut design, "a");
        let (_b, pb) = module_with_param(&mut design, "b");
        design.add_relation(Relation::is(Expr::param(pa), Expr::literal(100.0)).enforce());
        design.add_relation(Relation::is(Expr::param(pb), Expr::literal(220.0)).enforce());
        design.add_relation(Relation::is(Expr::param(pa), Expr::param(pb)).enforce());

        let err = independent_groups(
            &design,
            &design.modules().collect::<Vec<_>>(),
            &StubSolver::bare(),
        )
        .expect_err("contradiction");
        assert_eq!(err.literals.len(), 2);
    }

    #[test]
    fn test_every_module_appears_exactly_once() {
        let mut design = Design::new();
        let (a, pa) = module_with_param(&mut design, "a");
        let (b, pb) = module_with_param(&mut design, "b");
        let (c, _) = module_with_param(&mut design, "c");
        design.add_relation(Relation::is(Expr::param(pa), Expr::param(pb)).enforce());

        let modules = [a, b, c];
        let groups =
            independent_groups(&design, &modules, &StubSolver::bare()).expect("groups");
        let mut seen: Vec<ModuleId> = groups.into_iter().flatten().collect();
        seen.sort();
        let mut expected = modules.to_vec();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_fast_path_matches_slow_path() {
        let mut design = Design::new();
        let (a, pa) = module_with_param(&mut design, "a");
        let (b, pb) = module_with_param(&mut design, "b");
        let (c, pc) = module_with_param(&mut design, "c");
        design.add_relation(Relation::is(Expr::param(pa), Expr::param(pb)).enforce());

        let slow = independent_groups(&design, &[a, b, c], &StubSolver::bare()).expect("slow");

        let mut state = ReusableState::new();
        state.map_param(pa, 0);
        state.map_param(pb, 0);
        state.map_param(pc, 1);
        let fast_solver = StubSolver { state: Some(state) };
        let fast = independent_groups(&design, &[a, b, c], &fast_solver).expect("fast");

        assert_eq!(slow, fast);
    }
}
