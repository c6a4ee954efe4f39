//! Resolve a small voltage divider against an in-memory catalog.
//!
//! Run with: cargo run -p pcbx-pick --example pick_demo

use std::collections::HashMap;

use indexmap::IndexMap;
use pcbx_design::{
    Caps, Design, Expr, Module, ModuleId, ParamId, Parameter, Part, Relation, ValueSet,
};
use pcbx_pick::{
    pick_parts, Catalog, Contradiction, PickProgress, PickTree, Solver,
};

/// One-shot propagating solver, just enough for the demo constraints.
#[derive(Default)]
struct DemoSolver {
    cache: HashMap<ParamId, ValueSet>,
}

impl DemoSolver {
    fn narrow(
        &mut self,
        design: &Design,
        param: ParamId,
        set: &ValueSet,
    ) -> Result<(), Contradiction> {
        let current = self
            .cache
            .get(&param)
            .cloned()
            .unwrap_or_else(|| design.param(param).domain.clone());
        let next = current.intersect(set);
        if next.is_empty() {
            return Err(Contradiction::new(format!(
                "no feasible value remains for `{}`",
                design.param(param).name
            )));
        }
        self.cache.insert(param, next);
        Ok(())
    }
}

impl Solver for DemoSolver {
    fn refresh(&mut self, design: &Design, _modules: &[ModuleId]) -> Result<(), Contradiction> {
        // pin parameters from attached parts, then run equalities to a
        // fixpoint
        for m in design.modules() {
            if let Some(part) = design.part(m) {
                for &p in design.module(m).params() {
                    if let Some(v) = part.attribute(&design.param(p).name) {
                        self.narrow(design, p, &ValueSet::single(v.get()))?;
                    }
                }
            }
        }
        loop {
            let before = self.cache.clone();
            for relation in design.relations() {
                if !relation.enforced {
                    continue;
                }
                match (&relation.lhs, &relation.rhs) {
                    (Expr::Param(p), Expr::Literal(v)) | (Expr::Literal(v), Expr::Param(p)) => {
                        self.narrow(design, *p, &ValueSet::single(v.get()))?;
                    }
                    (Expr::Param(a), Expr::Param(b)) => {
                        let fa = self.feasible(design, *a);
                        let fb = self.feasible(design, *b);
                        let joint = fa.intersect(&fb);
                        self.narrow(design, *a, &joint)?;
                        self.narrow(design, *b, &joint)?;
                    }
                    _ => {}
                }
            }
            if self.cache == before {
                return Ok(());
            }
        }
    }

    fn verify(&mut self, design: &Design, modules: &[ModuleId]) -> Result<(), Contradiction> {
        self.refresh(design, modules)
    }

    fn feasible(&self, design: &Design, param: ParamId) -> ValueSet {
        self.cache
            .get(&param)
            .cloned()
            .unwrap_or_else(|| design.param(param).domain.clone())
    }
}

/// Catalog serving a fixed resistor series, filtered by feasibility.
struct DemoCatalog {
    series: Vec<Part>,
}

impl DemoCatalog {
    fn e12() -> Self {
        let ohms = [100.0, 120.0, 150.0, 180.0, 220.0, 270.0, 330.0, 390.0, 470.0];
        let series = ohms
            .iter()
            .map(|&r| {
                Part::new("lcsc", format!("R-{r}"))
                    .with_manufacturer("Uniroyal")
                    .with_attribute("resistance", r)
            })
            .collect();
        Self { series }
    }
}

impl Catalog for DemoCatalog {
    fn candidates(
        &self,
        design: &Design,
        tree: &PickTree,
        solver: &dyn Solver,
    ) -> IndexMap<ModuleId, Vec<Part>> {
        let mut out = IndexMap::new();
        for m in tree.modules() {
            let parts: Vec<Part> = self
                .series
                .iter()
                .filter(|part| {
                    design.module(m).params().iter().all(|&p| {
                        match part.attribute(&design.param(p).name) {
                            Some(v) => solver.feasible(design, p).contains(v),
                            None => true,
                        }
                    })
                })
                .cloned()
                .collect();
            out.insert(m, parts);
        }
        out
    }
}

fn main() {
    env_logger::init();

    let mut design = Design::new();
    let board = design.add_module(Module::new("divider"), None);
    let r_top = design.add_module(Module::new("r_top").with_caps(Caps::PICKABLE), Some(board));
    let r_bot = design.add_module(Module::new("r_bot").with_caps(Caps::PICKABLE), Some(board));
    let p_top = design.add_param(r_top, Parameter::new("resistance", ValueSet::range(100.0, 500.0)));
    let p_bot = design.add_param(r_bot, Parameter::new("resistance", ValueSet::range(100.0, 500.0)));

    // equal halves: both legs of the divider track the same value
    design.add_relation(Relation::is(Expr::param(p_top), Expr::param(p_bot)).enforce());
    design.add_relation(Relation::is(Expr::param(p_top), Expr::literal(220.0)).enforce());

    let catalog = DemoCatalog::e12();
    let mut solver = DemoSolver::default();
    let tree = PickTree::build(&design, board);
    let mut progress = PickProgress::new(&tree);

    match pick_parts(&mut design, board, &catalog, &mut solver, Some(&mut progress)) {
        Ok(()) => {
            progress.finish();
            for m in [r_top, r_bot] {
                if let Some(part) = design.part(m) {
                    println!("{} -> {part}", design.full_name(m));
                }
            }
        }
        Err(err) => {
            progress.finish();
            eprintln!("{}", err.describe(&design));
            std::process::exit(1);
        }
    }
}
