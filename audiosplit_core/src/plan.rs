use std::path::{Path, PathBuf};

use crate::{AudioSplitError, SplitRequest};

/// Minimum number of digits in the chunk index prefix of output file names.
pub const MIN_INDEX_WIDTH: usize = 3;

/// Upper bound on the number of chunks a single split may produce.
pub const MAX_WINDOWS: usize = 100_000;

/// One contiguous time range of the input mapped to one output file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkWindow {
    /// Zero-based position of the window.
    pub index: usize,
    /// Start offset in seconds.
    pub start: f64,
    /// End offset in seconds, exclusive.
    pub end: f64,
}

impl ChunkWindow {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Compute the windows covering `[0, total_secs)` in steps of `chunk_secs`.
///
/// The window count is `floor(total / chunk) + 1`, with the last window clamped
/// to `total_secs`. When `total_secs` is an exact multiple of `chunk_secs` the
/// clamped tail would be empty and is dropped, so every window has
/// `end > start`.
pub fn plan_windows(total_secs: f64, chunk_secs: f64) -> Result<Vec<ChunkWindow>, AudioSplitError> {
    if !chunk_secs.is_finite() || chunk_secs <= 0.0 {
        return Err(AudioSplitError::invalid(
            "chunk length must be greater than zero",
        ));
    }
    if !total_secs.is_finite() || total_secs <= 0.0 {
        return Err(AudioSplitError::invalid(format!(
            "cannot split a duration of {total_secs} seconds"
        )));
    }

    let full_windows = (total_secs / chunk_secs).floor();
    if full_windows >= MAX_WINDOWS as f64 {
        return Err(AudioSplitError::invalid(format!(
            "a duration of {total_secs} seconds would produce more than {MAX_WINDOWS} chunks"
        )));
    }
    let count = full_windows as usize + 1;
    let mut windows = Vec::with_capacity(count);

    for index in 0..count {
        let start = index as f64 * chunk_secs;
        let end = ((index + 1) as f64 * chunk_secs).min(total_secs);
        if end <= start {
            continue;
        }
        windows.push(ChunkWindow { index, start, end });
    }

    Ok(windows)
}

/// Width of the zero-padded index prefix for a split producing `count` files.
pub fn index_width(count: usize) -> usize {
    num_width(count).max(MIN_INDEX_WIDTH)
}

fn num_width(mut value: usize) -> usize {
    if value == 0 {
        return 1;
    }

    let mut width = 0;
    while value > 0 {
        value /= 10;
        width += 1;
    }
    width
}

/// Output file name for the window at `index`, e.g. `001_song.mp3`.
pub fn output_file_name(index: usize, stem: &str, format: &str, width: usize) -> String {
    format!("{:0width$}_{stem}.{format}", index + 1)
}

/// A window together with the file it will be written to.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedChunk {
    pub window: ChunkWindow,
    pub output_path: PathBuf,
}

/// Every chunk a request will produce, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPlan {
    total_duration: f64,
    chunks: Vec<PlannedChunk>,
}

impl SplitPlan {
    /// Lay out the chunks of `request` for an input lasting `total_duration`
    /// seconds, writing into `output_dir`.
    pub fn build(
        request: &SplitRequest,
        total_duration: f64,
        output_dir: &Path,
    ) -> Result<Self, AudioSplitError> {
        let windows = plan_windows(total_duration, request.chunk_length_secs())?;
        let stem = request.input_stem()?;
        let width = index_width(windows.len());

        let chunks = windows
            .into_iter()
            .map(|window| PlannedChunk {
                output_path: output_dir.join(output_file_name(
                    window.index,
                    stem,
                    request.format(),
                    width,
                )),
                window,
            })
            .collect();

        Ok(Self {
            total_duration,
            chunks,
        })
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn chunks(&self) -> &[PlannedChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn output_paths(&self) -> impl Iterator<Item = &Path> {
        self.chunks.iter().map(|chunk| chunk.output_path.as_path())
    }
}
