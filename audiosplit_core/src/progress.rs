use crate::ChunkWindow;

/// Fraction of windows completed so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitProgress {
    pub completed: usize,
    pub total: usize,
}

impl SplitProgress {
    /// Completion percentage in `[0, 100]`. Exactly `100.0` once every window
    /// is done.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Progress notifications emitted while splitting.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    /// Emitted once the duration is known and the windows are planned.
    Started { total_duration: f64, windows: usize },
    /// Emitted after each window has been written.
    WindowFinished {
        window: ChunkWindow,
        progress: SplitProgress,
    },
    /// Emitted after the last window, unless the split was cancelled.
    Finished,
}

/// Receiver of [`ProgressEvent`]s.
///
/// Events are delivered on whichever thread runs the split. Closures taking a
/// [`ProgressEvent`] implement this trait.
pub trait ProgressReporter {
    fn report(&mut self, _event: ProgressEvent) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}
