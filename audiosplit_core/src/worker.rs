//! Background execution of a split.
//!
//! ```text
//! Caller thread                   Worker thread
//!      │  SplitWorker::spawn            │
//!      │───────────────────────────────>│ ChunkSplitter::split
//!      │  WorkerMessage::Progress       │
//!      │<───────────────────────────────│ (once per event)
//!      │  cancel()                      │
//!      │───────────────────────────────>│ observed before the next window
//!      │  WorkerMessage::Done           │
//!      │<───────────────────────────────│
//! ```

use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};

use crate::probe::DurationProbe;
use crate::progress::ProgressEvent;
use crate::transcode::Transcoder;
use crate::{AudioSplitError, CancellationToken, ChunkSplitter, SplitOutcome, SplitRequest};

/// Message sent from the worker thread to its owner.
#[derive(Debug)]
pub enum WorkerMessage {
    Progress(ProgressEvent),
    Done(Result<SplitOutcome, AudioSplitError>),
}

/// Handle to a split running on a dedicated thread.
pub struct SplitWorker {
    cancel: CancellationToken,
    messages: Receiver<WorkerMessage>,
    handle: JoinHandle<()>,
}

impl SplitWorker {
    /// Start splitting `request` on a new thread.
    pub fn spawn<P, T>(
        splitter: ChunkSplitter<P, T>,
        request: SplitRequest,
    ) -> Result<Self, AudioSplitError>
    where
        P: DurationProbe + Send + 'static,
        T: Transcoder + Send + 'static,
    {
        Self::spawn_with_cancel(splitter, request, CancellationToken::new())
    }

    /// Start splitting `request` on a new thread, controlled by `cancel`.
    ///
    /// Lets a caller hand the token to a signal handler before any work
    /// starts.
    pub fn spawn_with_cancel<P, T>(
        splitter: ChunkSplitter<P, T>,
        request: SplitRequest,
        cancel: CancellationToken,
    ) -> Result<Self, AudioSplitError>
    where
        P: DurationProbe + Send + 'static,
        T: Transcoder + Send + 'static,
    {
        let (tx, messages) = unbounded();

        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name("audiosplit-worker".to_string())
            .spawn(move || {
                let progress_tx = tx.clone();
                let mut reporter = move |event: ProgressEvent| {
                    let _ = progress_tx.send(WorkerMessage::Progress(event));
                };
                let result = splitter.split(&request, &mut reporter, &token);
                let _ = tx.send(WorkerMessage::Done(result));
            })?;

        Ok(Self {
            cancel,
            messages,
            handle,
        })
    }

    /// Request cancellation. Takes effect before the next window starts.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the split ends, discarding progress.
    pub fn wait(self) -> Result<SplitOutcome, AudioSplitError> {
        self.wait_with(|_| {})
    }

    /// Block until the split ends, handing each progress event to
    /// `on_progress` on the calling thread.
    pub fn wait_with<F>(self, mut on_progress: F) -> Result<SplitOutcome, AudioSplitError>
    where
        F: FnMut(ProgressEvent),
    {
        let mut result = None;
        for message in self.messages.iter() {
            match message {
                WorkerMessage::Progress(event) => on_progress(event),
                WorkerMessage::Done(done) => {
                    result = Some(done);
                    break;
                }
            }
        }

        if self.handle.join().is_err() {
            return Err(AudioSplitError::WorkerLost);
        }
        result.unwrap_or(Err(AudioSplitError::WorkerLost))
    }
}
