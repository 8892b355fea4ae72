//! Progress reporting hook.
//!
//! The core never owns a terminal. Callers inject an observer and render
//! events however they like (the CLI draws an indicatif bar); tests pass a
//! collecting closure or nothing at all.

/// One unit-of-work notification from the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Inspect stage starting over this many candidate files
    InspectStarted { total: usize },

    /// One file finished inspection (successfully or skipped);
    /// `done` is the running count
    Inspected { done: usize },

    /// Pairwise comparison finished, producing this many clusters
    Grouped { clusters: usize },

    /// One duplicate disposition was applied (or flagged in a dry run)
    Resolved { done: usize },
}

/// Injected observer; called after each unit of work
pub type ProgressFn = dyn Fn(ProgressEvent) + Send + Sync;

pub(crate) fn notify(observer: Option<&ProgressFn>, event: ProgressEvent) {
    if let Some(f) = observer {
        f(event);
    }
}
