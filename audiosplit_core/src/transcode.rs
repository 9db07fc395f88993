use std::ffi::OsString;
use std::path::PathBuf;

use log::debug;

use crate::process::{failure_message, run_captured};
use crate::AudioSplitError;

/// Loudness-leveling filter applied when normalization is requested.
pub const NORMALIZE_FILTER: &str = "speechnorm=e=12.5:r=0.0001:l=1";

/// Audio encoder used for an output format, if one is known.
///
/// Unknown formats return `None` and the transcoder picks the container's
/// default encoder.
pub fn codec_for_format(format: &str) -> Option<&'static str> {
    match format.to_ascii_lowercase().as_str() {
        "mp3" => Some("libmp3lame"),
        "wav" => Some("pcm_s16le"),
        "flac" => Some("flac"),
        "ogg" => Some("libvorbis"),
        "opus" => Some("libopus"),
        "m4a" | "aac" => Some("aac"),
        _ => None,
    }
}

/// Everything needed to produce a single chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscodeJob {
    /// Zero-based window index.
    pub window: usize,
    pub input: PathBuf,
    /// Absolute start offset in seconds.
    pub start: f64,
    /// Absolute end offset in seconds.
    pub end: f64,
    pub normalize: bool,
    pub codec: Option<String>,
    pub output: PathBuf,
}

/// Producer of output chunks.
pub trait Transcoder {
    /// Write `job.output`, overwriting any existing file. Blocks until done.
    fn transcode(&self, job: &TranscodeJob) -> Result<(), AudioSplitError>;
}

impl<T: Transcoder + ?Sized> Transcoder for &T {
    fn transcode(&self, job: &TranscodeJob) -> Result<(), AudioSplitError> {
        (**self).transcode(job)
    }
}

/// [`Transcoder`] backed by the `ffmpeg` command line tool.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    program: OsString,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegTranscoder {
    /// Use `program` (a name looked up on `PATH`, or a full path) as ffmpeg.
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command line arguments for `job`. Start and end are passed at full
    /// precision.
    pub fn args(job: &TranscodeJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-nostdin".into(),
            "-hide_banner".into(),
            "-nostats".into(),
            "-y".into(),
            "-i".into(),
            job.input.as_os_str().to_owned(),
            "-ss".into(),
            job.start.to_string().into(),
            "-to".into(),
            job.end.to_string().into(),
        ];

        if job.normalize {
            args.push("-filter:a".into());
            args.push(NORMALIZE_FILTER.into());
        }

        if let Some(codec) = &job.codec {
            args.push("-c:a".into());
            args.push(codec.into());
        }

        args.push(job.output.as_os_str().to_owned());
        args
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, job: &TranscodeJob) -> Result<(), AudioSplitError> {
        debug!(
            "transcoding {:.3}s..{:.3}s of '{}' into '{}'",
            job.start,
            job.end,
            job.input.display(),
            job.output.display()
        );

        let output = run_captured(&self.program, Self::args(job))
            .map_err(|reason| AudioSplitError::transcode(job.window, reason))?;
        if !output.status.success() {
            return Err(AudioSplitError::transcode(
                job.window,
                failure_message(&output),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(normalize: bool, codec: Option<&str>) -> TranscodeJob {
        TranscodeJob {
            window: 1,
            input: PathBuf::from("in/song.wav"),
            start: 600.0,
            end: 1_234.567_891,
            normalize,
            codec: codec.map(str::to_owned),
            output: PathBuf::from("out/002_song.mp3"),
        }
    }

    fn as_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn builds_trim_arguments_with_full_precision() {
        let args = as_strings(FfmpegTranscoder::args(&job(false, Some("libmp3lame"))));
        assert_eq!(
            args,
            [
                "-nostdin",
                "-hide_banner",
                "-nostats",
                "-y",
                "-i",
                "in/song.wav",
                "-ss",
                "600",
                "-to",
                "1234.567891",
                "-c:a",
                "libmp3lame",
                "out/002_song.mp3",
            ]
        );
    }

    #[test]
    fn appends_normalize_filter() {
        let args = as_strings(FfmpegTranscoder::args(&job(true, None)));
        let filter = args.iter().position(|arg| arg == "-filter:a").unwrap();
        assert_eq!(args[filter + 1], NORMALIZE_FILTER);
        assert!(!args.iter().any(|arg| arg == "-c:a"));
        assert_eq!(args.last().unwrap(), "out/002_song.mp3");
    }

    #[test]
    fn maps_known_formats_to_codecs() {
        assert_eq!(codec_for_format("mp3"), Some("libmp3lame"));
        assert_eq!(codec_for_format("FLAC"), Some("flac"));
        assert_eq!(codec_for_format("m4a"), Some("aac"));
        assert_eq!(codec_for_format("mka"), None);
    }

    #[test]
    fn reports_missing_binary_as_transcode_error() {
        let transcoder = FfmpegTranscoder::new("audiosplit-test-missing-ffmpeg");
        let err = transcoder.transcode(&job(false, None)).unwrap_err();
        assert!(matches!(err, AudioSplitError::Transcode { window: 1, .. }));
    }
}
