use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the whole run before any URL is processed.
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("FFmpeg or ffprobe not found after attempted install")]
    CodecToolMissing,

    #[error("Specified output folder '{0}' does not exist")]
    OutputDirMissing(PathBuf),

    #[error("Failed to create output folder '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read URL list '{path}': {source}")]
    BatchFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read operator input: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Errors raised while resolving or downloading a stream.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Unsupported site: {0}")]
    UnsupportedSite(String),

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout for URL: {0}")]
    RequestTimeout(String),

    #[error("HTTP error {status} for URL: {url}")]
    Http { status: u16, url: String },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Video unavailable: {0}")]
    Unavailable(String),

    #[error("No {0} stream available")]
    NoMatchingStream(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Size mismatch for {url}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        url: String,
        expected: u64,
        actual: u64,
    },

    #[error("Malformed stream URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors raised by the external codec tool.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("No audio stream in {0}")]
    NoAudioStream(PathBuf),

    #[error("Converted file is missing or empty: {0}")]
    EmptyOutput(PathBuf),

    #[error("Failed to parse probe output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while writing ID3 metadata.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Failed to read tag from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error("Failed to save tag to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid URL: {0}")]
pub struct ValidationError(pub String);

/// Failure of one pipeline stage for one URL.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Tag(#[from] TagError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Convert(_) => "convert",
            PipelineError::Tag(_) => "tag",
        }
    }
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;
