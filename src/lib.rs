pub mod config;
pub mod convert;
pub mod core;
mod download;
pub mod error;
pub mod fetch;
pub mod input;
pub mod pipeline;
pub mod preflight;
mod progress;
pub mod select;
pub mod tag;
pub mod validate;
#[cfg(feature = "youtube")]
pub mod youtube;

pub use config::OutputDirectory;
pub use convert::{Ffmpeg, Transcoder, convert_to_audio_container};
pub use crate::core::{Container, MediaService, MediaSource, OutputKind, StreamDescriptor, StreamKind};
pub use error::{ConvertError, FatalError, FetchError, PipelineError, TagError, ValidationError};
pub use fetch::{FetchedAudio, Fetcher};
pub use input::InputSource;
pub use pipeline::{BatchReport, Pipeline, UrlOutcome};
pub use preflight::{CodecTools, ToolSearch, ensure_codec_tool_available};
pub use validate::validate;
#[cfg(feature = "youtube")]
pub use youtube::YoutubeService;
