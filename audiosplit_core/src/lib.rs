//! Split audio files into fixed-length chunks.
//!
//! The duration of the input is queried with a [`DurationProbe`], the chunk
//! windows are laid out by [`plan_windows`], and every window is handed to a
//! [`Transcoder`] in order. The default implementations shell out to
//! `ffprobe` and `ffmpeg`; tests and embedders can substitute their own.

mod cancel;
mod error;
mod plan;
mod probe;
mod process;
mod progress;
mod request;
mod splitter;
mod transcode;
mod worker;

pub use cancel::CancellationToken;
pub use error::AudioSplitError;
pub use plan::{
    index_width, output_file_name, plan_windows, ChunkWindow, PlannedChunk, SplitPlan,
    MAX_WINDOWS, MIN_INDEX_WIDTH,
};
pub use probe::{parse_duration_output, DurationProbe, FfprobeProbe};
pub use progress::{ProgressEvent, ProgressReporter, SplitProgress};
pub use request::{SplitRequest, SplitRequestBuilder, DEFAULT_FORMAT};
pub use splitter::{split_audio, ChunkSplitter, SplitOutcome};
pub use transcode::{codec_for_format, FfmpegTranscoder, TranscodeJob, Transcoder, NORMALIZE_FILTER};
pub use worker::{SplitWorker, WorkerMessage};
