use indicatif::{ProgressBar, ProgressStyle};
use pcbx_design::{Design, ModuleId};

use super::tree::PickTree;

/// Observer notified once per attached module.
///
/// Purely a side effect: the driver's control flow never depends on it.
pub trait PickObserver {
    /// `leaves` is the number of leaf modules covered by the attachment,
    /// at least one.
    fn advance(&mut self, design: &Design, module: ModuleId, leaves: usize);
}

/// Terminal progress bar over the leaves of a pick tree.
pub struct PickProgress {
    bar: ProgressBar,
}

impl PickProgress {
    pub fn new(tree: &PickTree) -> Self {
        let total = tree.leaves().len() as u64;
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("picking");
        Self { bar }
    }

    /// A disabled bar for non-interactive runs.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PickObserver for PickProgress {
    fn advance(&mut self, _design: &Design, _module: ModuleId, leaves: usize) {
        self.bar.inc(leaves as u64);
    }
}
