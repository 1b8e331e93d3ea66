use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
pub use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Longest file stem in bytes, leaving room for the extension and `.part`
pub const MAX_STEM_BYTES: usize = 200;

/// Requested output kinds
#[derive(
    EnumIter,
    EnumString,
    Display,
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[strum(ascii_case_insensitive)]
pub enum OutputKind {
    /// Audio re-encoded to MP3 and tagged
    #[strum(to_string = "MP3", serialize = "mp3")]
    Mp3,
    /// Highest-resolution progressive MP4
    #[strum(to_string = "MP4", serialize = "mp4")]
    Mp4,
}

/// Stream container representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Mp4,
    Webm,
    ThreeGp,
    Unknown,
}

impl Container {
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Webm => "webm",
            Container::ThreeGp => "3gp",
            Container::Unknown => "bin",
        }
    }

    /// Parse from a mime type such as `video/mp4; codecs="avc1.42001E, mp4a.40.2"`
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.split('/').nth(1) {
            Some("mp4") => Container::Mp4,
            Some("webm") => Container::Webm,
            Some("3gpp") => Container::ThreeGp,
            _ => Container::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    AudioOnly,
    VideoOnly,
    /// Audio and video multiplexed together
    Progressive,
}

/// One downloadable variant of a media asset
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub itag: u32,
    pub kind: StreamKind,
    pub container: Container,
    pub mime_type: String,
    /// Vertical resolution in pixels, video streams only
    pub resolution: Option<u32>,
    pub bitrate: Option<u64>,
    pub content_length: Option<u64>,
    pub url: String,
    /// Position in the order the service reported the streams
    pub position: usize,
}

impl StreamDescriptor {
    /// File extension used when persisting this stream
    pub fn extension(&self) -> &'static str {
        match (self.kind, self.container) {
            (StreamKind::AudioOnly, Container::Mp4) => "m4a",
            (_, container) => container.extension(),
        }
    }
}

/// Resolved handle to a remote asset
#[derive(Debug, Clone)]
pub struct MediaSource {
    pub id: String,
    pub title: String,
    pub author: String,
    pub streams: Vec<StreamDescriptor>,
}

impl MediaSource {
    pub fn new(id: String, title: String, author: String) -> Self {
        Self {
            id,
            title,
            author,
            streams: Vec::new(),
        }
    }

    pub fn with_streams(mut self, streams: Vec<StreamDescriptor>) -> Self {
        self.streams = streams;
        self
    }

    /// File name for a stream of this source: sanitized title plus extension
    pub fn file_name(&self, stream: &StreamDescriptor) -> String {
        let stem = sanitize_filename::sanitize(self.title.trim());
        let stem = truncate_stem(stem.trim_end());
        let stem = if stem.is_empty() { self.id.as_str() } else { stem };
        format!("{}.{}", stem, stream.extension())
    }
}

/// Cut `stem` to at most [`MAX_STEM_BYTES`] on a char boundary
fn truncate_stem(stem: &str) -> &str {
    if stem.len() <= MAX_STEM_BYTES {
        return stem;
    }
    let mut end = MAX_STEM_BYTES;
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    stem[..end].trim_end()
}

/// Trait for talking to a media-hosting service
#[async_trait::async_trait]
pub trait MediaService: Send + Sync {
    /// Check if the locator belongs to this service
    fn matches(&self, locator: &str) -> bool;

    /// Resolve the locator to its title, author and available streams
    async fn list_streams(&self, locator: &str) -> Result<MediaSource>;

    /// Persist one stream's bytes to `dest`, returning the written path
    async fn download(&self, stream: &StreamDescriptor, dest: &Path) -> Result<PathBuf>;
}
