use std::ffi::OsString;
use std::path::Path;

use log::debug;

use crate::process::{failure_message, run_captured};
use crate::AudioSplitError;

/// Source of media durations.
pub trait DurationProbe {
    /// Total duration of the media at `path`, in seconds. Never cached.
    fn probe(&self, path: &Path) -> Result<f64, AudioSplitError>;
}

impl<T: DurationProbe + ?Sized> DurationProbe for &T {
    fn probe(&self, path: &Path) -> Result<f64, AudioSplitError> {
        (**self).probe(path)
    }
}

/// [`DurationProbe`] backed by the `ffprobe` command line tool.
#[derive(Clone, Debug)]
pub struct FfprobeProbe {
    program: OsString,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProbe {
    /// Use `program` (a name looked up on `PATH`, or a full path) as ffprobe.
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-v".into(), "quiet".into(), "-i".into()];
        args.push(path.as_os_str().to_owned());
        args.extend(["-show_entries", "format=duration", "-of", "csv=p=0"].map(OsString::from));
        args
    }
}

impl DurationProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<f64, AudioSplitError> {
        debug!("probing duration of '{}'", path.display());

        let output = run_captured(&self.program, Self::args(path))
            .map_err(|reason| AudioSplitError::probe(path, reason))?;
        if !output.status.success() {
            return Err(AudioSplitError::probe(path, failure_message(&output)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_duration_output(&stdout).map_err(|reason| AudioSplitError::probe(path, reason))
    }
}

/// Parse the single decimal number ffprobe prints for `format=duration`.
pub fn parse_duration_output(stdout: &str) -> Result<f64, String> {
    let value = stdout.trim();
    if value.is_empty() {
        return Err("no duration reported".to_owned());
    }

    let seconds = value
        .parse::<f64>()
        .map_err(|_| format!("unexpected duration output '{value}'"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("unexpected duration output '{value}'"));
    }
    Ok(seconds)
}
