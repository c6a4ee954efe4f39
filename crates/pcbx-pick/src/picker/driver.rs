use indexmap::IndexMap;
use pcbx_design::{Caps, Design, ModuleId, Part};

use crate::catalog::{attach_unchecked, verify_and_attach, AttachError, Catalog};
use crate::solver::Solver;

use super::diagnostics::missing_pick_report;
use super::error::PickError;
use super::groups::independent_groups;
use super::progress::PickObserver;
use super::tree::PickTree;

/// Resolve every module under `root` to a concrete part.
///
/// Runs the advisory coverage scan, builds the pick tree and drives
/// topological resolution. On success every in-scope module carries a
/// part; on failure the design may already be partially mutated and must
/// be considered unresolved as a whole.
pub fn pick_parts(
    design: &mut Design,
    root: ModuleId,
    catalog: &dyn Catalog,
    solver: &mut dyn Solver,
    observer: Option<&mut dyn PickObserver>,
) -> Result<(), PickError> {
    let tree = PickTree::build(design, root);
    missing_pick_report(design, root).log(design);
    pick_topologically(design, root, tree, catalog, solver, observer)
}

/// Drive resolution over a pick tree.
///
/// Explicitly specified modules resolve first, then all unambiguous
/// (single-candidate) modules in one batch, then the remaining modules
/// one independent-group representative at a time. A final solver pass
/// re-checks the whole module set for consistency violations introduced
/// indirectly by earlier attachments.
pub fn pick_topologically(
    design: &mut Design,
    root: ModuleId,
    tree: PickTree,
    catalog: &dyn Catalog,
    solver: &mut dyn Solver,
    mut observer: Option<&mut dyn PickObserver>,
) -> Result<(), PickError> {
    let mut tree = tree;

    log::info!("picking parts for {} leaf modules", tree.leaves().len());

    // Explicit pass: modules that name their part outright.
    let explicit: Vec<ModuleId> = tree
        .modules()
        .filter(|&m| {
            design.has_any_cap(m, Caps::PICK_BY_PART_NUMBER | Caps::PICK_BY_SUPPLIER_ID)
        })
        .collect();
    if !explicit.is_empty() {
        pick_explicit(design, root, &explicit, catalog, solver, observer.as_deref_mut())?;
        tree = tree.prune(design).0;
    }

    // Snapshot for the final whole-design verification.
    let snapshot: Vec<ModuleId> = tree.modules().collect();

    let mut candidates = fetch_candidates(design, &tree, catalog, solver)?;
    let pick_count = candidates.len();

    // Heuristic: attach all single-candidate modules in one batch. They
    // are unambiguous, so a failure here is fatal for the whole run.
    let single: Vec<(ModuleId, Part)> = candidates
        .iter()
        .filter(|(_, parts)| parts.len() == 1)
        .map(|(&m, parts)| (m, parts[0].clone()))
        .collect();
    if !single.is_empty() {
        log::info!("picking {} single-candidate modules", single.len());
        let modules: Vec<ModuleId> = single.iter().map(|(m, _)| *m).collect();
        let leaf_counts: Vec<usize> = modules.iter().map(|&m| tree.leaf_count(m)).collect();

        verify_and_attach(design, solver, single, true).map_err(|e| {
            let message = match &e {
                AttachError::Contradiction(c) => format!(
                    "could not pick all unambiguous parts; likely contradicting constraints: {c}"
                ),
                AttachError::Incompatible(_) | AttachError::NotDeducible(_) => {
                    format!("could not pick all unambiguous parts: {e}")
                }
            };
            PickError::Unresolvable {
                message,
                modules: modules.clone(),
            }
        })?;

        if let Some(obs) = observer.as_deref_mut() {
            for (m, leaves) in modules.iter().zip(&leaf_counts) {
                obs.advance(design, *m, *leaves);
            }
        }
        tree = tree.prune(design).0;
        candidates = fetch_candidates(design, &tree, catalog, solver)?;
    }

    // Grouped slow pass: resolve one representative per independent group
    // per round; constraint propagation narrows the rest. Attached
    // representatives leave the candidate set, so every round shrinks it.
    if !candidates.is_empty() {
        log::info!("slow-picking {} modules in groups", candidates.len());
    }
    while !candidates.is_empty() {
        let remaining: Vec<ModuleId> = candidates.keys().copied().collect();
        let mut groups =
            independent_groups(design, &remaining, solver).map_err(|c| PickError::Unresolvable {
                message: format!("contradiction while grouping modules: {c}"),
                modules: remaining.clone(),
            })?;

        // Singleton groups are the cheapest and least entangled.
        let singles: Vec<Vec<ModuleId>> = groups.iter().filter(|g| g.len() == 1).cloned().collect();
        if !singles.is_empty() {
            groups = singles;
        }

        let heads: Vec<ModuleId> = groups.iter().filter_map(|g| g.first().copied()).collect();
        log::debug!("picking group representatives: {heads:?}");

        let parts = first_candidates(design, &heads, catalog, solver)?;
        for (m, part) in parts {
            let leaves = tree.leaf_count(m);
            attach_unchecked(design, m, part);
            if let Some(obs) = observer.as_deref_mut() {
                obs.advance(design, m, leaves);
            }
        }
        tree = tree.prune(design).0;
        candidates.retain(|m, _| !heads.contains(m));
    }

    log::info!("picked {pick_count} parts; verifying design");
    solver
        .verify(design, &snapshot)
        .map_err(|c| PickError::Verification {
            source: c,
            modules: snapshot.clone(),
        })?;

    Ok(())
}

/// Resolve modules that carry an explicit part number or supplier id.
///
/// Exactly one catalog entry is expected per module; parts attach without
/// verification. Failures are collected per module and reported together.
fn pick_explicit(
    design: &mut Design,
    root: ModuleId,
    modules: &[ModuleId],
    catalog: &dyn Catalog,
    solver: &mut dyn Solver,
    mut observer: Option<&mut (dyn PickObserver + '_)>,
) -> Result<(), PickError> {
    log::info!("picking {} explicitly specified modules", modules.len());
    let flat = PickTree::from_modules(modules.iter().copied());
    let candidates = fetch_candidates(design, &flat, catalog, solver)?;

    let mut failed: IndexMap<ModuleId, PickError> = IndexMap::new();
    for (m, mut parts) in candidates {
        if !modules.contains(&m) {
            continue;
        }
        if parts.len() != 1 {
            failed.insert(
                m,
                PickError::Unresolvable {
                    message: format!(
                        "expected exactly one catalog entry for explicitly specified {}, found {}",
                        design.full_name(m),
                        parts.len()
                    ),
                    modules: vec![m],
                },
            );
            continue;
        }
        let part = parts.remove(0);
        attach_unchecked(design, m, part);
        if let Some(obs) = observer.as_deref_mut() {
            obs.advance(design, m, 1);
        }
    }

    if !failed.is_empty() {
        return Err(PickError::Children {
            module: root,
            children: failed,
        });
    }
    Ok(())
}

/// Refresh the solver over the tree, then enumerate candidates.
///
/// Guarantees every tree module comes back with at least one candidate:
/// a missing entry means the module has no resolution strategy, an empty
/// list means its candidates are exhausted.
fn fetch_candidates(
    design: &Design,
    tree: &PickTree,
    catalog: &dyn Catalog,
    solver: &mut dyn Solver,
) -> Result<IndexMap<ModuleId, Vec<Part>>, PickError> {
    let modules: Vec<ModuleId> = tree.modules().collect();
    solver
        .refresh(design, &modules)
        .map_err(|c| PickError::Unresolvable {
            message: format!("contradiction while updating estimates: {c}"),
            modules: modules.clone(),
        })?;

    let candidates = catalog.candidates(design, tree, solver);
    for &m in &modules {
        match candidates.get(&m) {
            None => return Err(PickError::NotImplemented { module: m }),
            Some(parts) if parts.is_empty() => {
                return Err(PickError::Unresolvable {
                    message: format!(
                        "no candidate parts remain for {}; backtracking is not supported",
                        design.full_name(m)
                    ),
                    modules: vec![m],
                });
            }
            Some(_) => {}
        }
    }

    if log::log_enabled!(log::Level::Debug) {
        let counts: Vec<String> = candidates
            .iter()
            .map(|(m, parts)| format!("{m}: {}", parts.len()))
            .collect();
        log::debug!("candidates: {}", counts.join(", "));
    }
    Ok(candidates)
}

/// First (preferred) candidate for each module, refreshed against the
/// current constraint state.
fn first_candidates(
    design: &Design,
    modules: &[ModuleId],
    catalog: &dyn Catalog,
    solver: &mut dyn Solver,
) -> Result<IndexMap<ModuleId, Part>, PickError> {
    let flat = PickTree::from_modules(modules.iter().copied());
    let candidates = fetch_candidates(design, &flat, catalog, solver)?;

    let mut out = IndexMap::new();
    for (m, parts) in candidates {
        if let Some(part) = parts.into_iter().next() {
            out.insert(m, part);
        }
    }
    Ok(out)
}
