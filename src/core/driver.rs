//! Build mode configuration for one-shot and watch passes.

/// Build mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Whether to restore the persisted timestamp snapshot before the
    /// first pass. One-shot builds restore so an unchanged rerun can be
    /// skipped; watch mode keeps its snapshot in memory across passes.
    pub restore_snapshot: bool,

    /// Whether pass results go through the single-line watch status
    /// display instead of regular log lines.
    pub status_line: bool,
}

impl BuildMode {
    /// One-shot build: restore the persisted snapshot, log normally.
    pub const ONESHOT: Self = Self {
        restore_snapshot: true,
        status_line: false,
    };

    /// Watch pass: in-memory snapshot, single-line status output.
    pub const WATCH: Self = Self {
        restore_snapshot: false,
        status_line: true,
    };

    /// Check if this is a watch-mode pass.
    #[inline]
    pub const fn is_watch(&self) -> bool {
        self.status_line
    }
}
