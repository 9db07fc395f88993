use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::probe::{DurationProbe, FfprobeProbe};
use crate::progress::{ProgressEvent, ProgressReporter, SplitProgress};
use crate::transcode::{codec_for_format, FfmpegTranscoder, TranscodeJob, Transcoder};
use crate::{AudioSplitError, CancellationToken, SplitPlan, SplitRequest, MAX_WINDOWS};

/// How a split that did not fail ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Every window was written.
    Completed { outputs: Vec<PathBuf> },
    /// Cancellation was observed before a window started. The files written
    /// up to that point are left in place.
    Cancelled { outputs: Vec<PathBuf> },
}

impl SplitOutcome {
    /// Files written by the split, in window order.
    pub fn outputs(&self) -> &[PathBuf] {
        match self {
            SplitOutcome::Completed { outputs } | SplitOutcome::Cancelled { outputs } => outputs,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SplitOutcome::Cancelled { .. })
    }
}

/// Splits audio files into fixed-length chunks using a [`DurationProbe`] and
/// a [`Transcoder`].
///
/// Windows are transcoded one after another on the calling thread.
#[derive(Clone, Debug)]
pub struct ChunkSplitter<P, T> {
    probe: P,
    transcoder: T,
}

impl Default for ChunkSplitter<FfprobeProbe, FfmpegTranscoder> {
    fn default() -> Self {
        Self::new(FfprobeProbe::default(), FfmpegTranscoder::default())
    }
}

impl<P, T> ChunkSplitter<P, T>
where
    P: DurationProbe,
    T: Transcoder,
{
    pub fn new(probe: P, transcoder: T) -> Self {
        Self { probe, transcoder }
    }

    /// Probe the input and lay out its chunks without transcoding anything.
    pub fn plan(&self, request: &SplitRequest) -> Result<SplitPlan, AudioSplitError> {
        request.validate()?;
        let output_dir = request.resolve_output_dir()?;
        self.plan_into(request, &output_dir)
    }

    fn plan_into(
        &self,
        request: &SplitRequest,
        output_dir: &Path,
    ) -> Result<SplitPlan, AudioSplitError> {
        let input = request.input_path();
        let total_duration = self.probe.probe(input)?;
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(AudioSplitError::probe(
                input,
                format!("input reports a duration of {total_duration} seconds"),
            ));
        }
        if (total_duration / request.chunk_length_secs()).floor() >= MAX_WINDOWS as f64 {
            return Err(AudioSplitError::probe(
                input,
                format!(
                    "input reports a duration of {total_duration} seconds, \
                     more than {MAX_WINDOWS} chunks of {} minute(s)",
                    request.chunk_length_minutes()
                ),
            ));
        }

        SplitPlan::build(request, total_duration, output_dir)
    }

    /// Split the input of `request`, reporting progress after every window.
    ///
    /// `cancel` is checked before each window starts. A window that is already
    /// being transcoded always runs to completion.
    pub fn split<R>(
        &self,
        request: &SplitRequest,
        reporter: &mut R,
        cancel: &CancellationToken,
    ) -> Result<SplitOutcome, AudioSplitError>
    where
        R: ProgressReporter + ?Sized,
    {
        request.validate()?;
        let output_dir = request.resolve_output_dir()?;
        let plan = self.plan_into(request, &output_dir)?;
        let total = plan.len();

        info!(
            "splitting '{}' ({:.3}s) into {} chunk(s) of {} minute(s)",
            request.input_path().display(),
            plan.total_duration(),
            total,
            request.chunk_length_minutes()
        );
        reporter.report(ProgressEvent::Started {
            total_duration: plan.total_duration(),
            windows: total,
        });

        let codec = codec_for_format(request.format()).map(str::to_owned);
        let mut outputs = Vec::with_capacity(total);

        for chunk in plan.chunks() {
            if cancel.is_cancelled() {
                warn!(
                    "split of '{}' cancelled after {} of {} chunk(s)",
                    request.input_path().display(),
                    outputs.len(),
                    total
                );
                return Ok(SplitOutcome::Cancelled { outputs });
            }

            if outputs.is_empty() {
                fs::create_dir_all(&output_dir)?;
            }

            let job = TranscodeJob {
                window: chunk.window.index,
                input: request.input_path().to_path_buf(),
                start: chunk.window.start,
                end: chunk.window.end,
                normalize: request.normalize(),
                codec: codec.clone(),
                output: chunk.output_path.clone(),
            };
            self.transcoder.transcode(&job)?;
            debug!(
                "wrote chunk {}/{} to '{}'",
                chunk.window.index + 1,
                total,
                chunk.output_path.display()
            );

            outputs.push(chunk.output_path.clone());
            reporter.report(ProgressEvent::WindowFinished {
                window: chunk.window,
                progress: SplitProgress {
                    completed: outputs.len(),
                    total,
                },
            });
        }

        reporter.report(ProgressEvent::Finished);
        info!(
            "finished splitting '{}' into {} chunk(s)",
            request.input_path().display(),
            outputs.len()
        );

        Ok(SplitOutcome::Completed { outputs })
    }
}

/// Split `request` with the `ffprobe` and `ffmpeg` found on `PATH`.
pub fn split_audio<R>(
    request: &SplitRequest,
    reporter: &mut R,
    cancel: &CancellationToken,
) -> Result<SplitOutcome, AudioSplitError>
where
    R: ProgressReporter + ?Sized,
{
    ChunkSplitter::default().split(request, reporter, cancel)
}
