use std::path::{Path, PathBuf};

use crate::AudioSplitError;

/// Output format used when none is specified.
pub const DEFAULT_FORMAT: &str = "mp3";

/// Parameters of a single split operation.
///
/// A request is immutable once built; the splitter only ever borrows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitRequest {
    input_path: PathBuf,
    chunk_length_minutes: u32,
    format: String,
    normalize: bool,
    output_folder: Option<PathBuf>,
}

impl SplitRequest {
    /// Construct a request with default options, validating it.
    pub fn new<P: AsRef<Path>>(input: P, chunk_length_minutes: u32) -> Result<Self, AudioSplitError> {
        Self::builder(input, chunk_length_minutes).build()
    }

    /// Start building a request for `input` split every `chunk_length_minutes`.
    pub fn builder<P: AsRef<Path>>(input: P, chunk_length_minutes: u32) -> SplitRequestBuilder {
        SplitRequestBuilder {
            input_path: input.as_ref().to_path_buf(),
            chunk_length_minutes,
            format: DEFAULT_FORMAT.to_owned(),
            normalize: false,
            output_folder: None,
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn chunk_length_minutes(&self) -> u32 {
        self.chunk_length_minutes
    }

    /// Chunk length in seconds.
    pub fn chunk_length_secs(&self) -> f64 {
        f64::from(self.chunk_length_minutes) * 60.0
    }

    /// Lower-cased output format identifier, also used as the file extension.
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn output_folder(&self) -> Option<&Path> {
        self.output_folder.as_deref()
    }

    /// Directory the chunks are written to: the configured output folder, or
    /// the current working directory.
    pub fn resolve_output_dir(&self) -> Result<PathBuf, AudioSplitError> {
        match &self.output_folder {
            Some(folder) => Ok(folder.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// File name of the input without directory or extension.
    pub fn input_stem(&self) -> Result<&str, AudioSplitError> {
        self.input_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                AudioSplitError::invalid(format!(
                    "failed to derive a base name from '{}'",
                    self.input_path.display()
                ))
            })
    }

    /// Check every caller-fixable condition. Runs before any external call.
    pub fn validate(&self) -> Result<(), AudioSplitError> {
        if self.chunk_length_minutes == 0 {
            return Err(AudioSplitError::invalid(
                "chunk length must be greater than zero minutes",
            ));
        }

        if self.format.is_empty() || !self.format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AudioSplitError::invalid(format!(
                "unsupported output format '{}'",
                self.format
            )));
        }

        if !self.input_path.is_file() {
            return Err(AudioSplitError::invalid(format!(
                "input file does not exist: {}",
                self.input_path.display()
            )));
        }

        self.input_stem()?;

        if let Some(folder) = &self.output_folder {
            if folder.exists() && !folder.is_dir() {
                return Err(AudioSplitError::invalid(format!(
                    "output folder is not a directory: {}",
                    folder.display()
                )));
            }
        }

        Ok(())
    }
}

/// Builder for [`SplitRequest`].
#[derive(Clone, Debug)]
pub struct SplitRequestBuilder {
    input_path: PathBuf,
    chunk_length_minutes: u32,
    format: String,
    normalize: bool,
    output_folder: Option<PathBuf>,
}

impl SplitRequestBuilder {
    /// Output format identifier, e.g. `"mp3"` or `"flac"`.
    pub fn format<S: AsRef<str>>(mut self, format: S) -> Self {
        self.format = format.as_ref().trim().to_ascii_lowercase();
        self
    }

    /// Apply a loudness-normalization filter while transcoding.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Directory for the chunks. Created on demand when the split starts.
    pub fn output_folder<P: AsRef<Path>>(mut self, folder: P) -> Self {
        self.output_folder = Some(folder.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<SplitRequest, AudioSplitError> {
        let request = SplitRequest {
            input_path: self.input_path,
            chunk_length_minutes: self.chunk_length_minutes,
            format: self.format,
            normalize: self.normalize,
            output_folder: self.output_folder,
        };
        request.validate()?;
        Ok(request)
    }
}
