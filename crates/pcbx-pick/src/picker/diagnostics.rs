use pcbx_design::{Caps, Design, ModuleId};

/// Modules that will silently never receive a part.
///
/// Advisory: the scan never fails a run, it only feeds warnings.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Unresolvable modules that at least define a footprint; they show up
    /// unassigned in layout outputs.
    pub with_footprint: Vec<ModuleId>,
    /// Unresolvable modules without a footprint; they are entirely absent
    /// from downstream outputs.
    pub without_footprint: Vec<ModuleId>,
}

impl CoverageReport {
    pub fn is_empty(&self) -> bool {
        self.with_footprint.is_empty() && self.without_footprint.is_empty()
    }

    /// Emit one warning per non-empty bucket.
    pub fn log(&self, design: &Design) {
        if !self.with_footprint.is_empty() {
            log::warn!("no pickers for {}", names(design, &self.with_footprint));
        }
        if !self.without_footprint.is_empty() {
            log::warn!(
                "no pickers and no footprint for {}; these modules will not appear in netlist or pcb",
                names(design, &self.without_footprint)
            );
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

/// Find modules with no reachable resolution responsibility.
///
/// A module is reported when it is the most specific variant, is a leaf
/// with respect to resolution, and neither it nor any ancestor has a part
/// attached or carries a pick capability. Such modules will silently
/// never be resolved.
pub fn missing_pick_report(design: &Design, root: ModuleId) -> CoverageReport {
    let mut report = CoverageReport::default();
    for m in design.descendants(design.most_special(root)) {
        if design.module(m).specialized().is_some() {
            continue;
        }
        if !is_resolution_leaf(design, m) {
            continue;
        }
        if design.self_or_ancestor_with(m, Caps::HAS_PART).is_some() {
            continue;
        }
        if design.self_or_ancestor_with(m, Caps::ANY_PICKABLE).is_some() {
            continue;
        }
        if design.has_cap(m, Caps::HAS_FOOTPRINT) {
            report.with_footprint.push(m);
        } else {
            report.without_footprint.push(m);
        }
    }
    report
}

/// Leaf with respect to resolution: not a footprint placeholder itself,
/// and no descendant modules other than footprint placeholders.
fn is_resolution_leaf(design: &Design, module: ModuleId) -> bool {
    if design.has_cap(module, Caps::FOOTPRINT) {
        return false;
    }
    design
        .descendants(module)
        .into_iter()
        .filter(|&m| m != module)
        .all(|m| design.has_cap(m, Caps::FOOTPRINT))
}
