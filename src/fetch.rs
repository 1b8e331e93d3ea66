use std::path::PathBuf;

use crate::core::{Container, MediaService, MediaSource};
use crate::error::{FetchError, Result};
use crate::select::{select_audio, select_video};
use crate::validate::validate;

/// Raw audio download plus the metadata needed to tag it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAudio {
    pub raw: PathBuf,
    pub title: String,
    pub author: String,
}

/// Resolves locators and persists the selected stream under `output_dir`
pub struct Fetcher<S> {
    service: S,
    output_dir: PathBuf,
}

impl<S: MediaService> Fetcher<S> {
    pub fn new(service: S, output_dir: PathBuf) -> Self {
        Self {
            service,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    async fn resolve(&self, locator: &str) -> Result<MediaSource> {
        if !validate(locator) {
            return Err(FetchError::InvalidUrl(locator.to_string()));
        }
        if !self.service.matches(locator) {
            return Err(FetchError::UnsupportedSite(locator.to_string()));
        }
        self.service.list_streams(locator).await
    }

    /// Download the first audio-only stream
    pub async fn fetch_audio(&self, locator: &str) -> Result<FetchedAudio> {
        let source = self.resolve(locator).await?;
        let stream = select_audio(&source.streams).ok_or(FetchError::NoMatchingStream("audio-only"))?;
        log::info!("audio for '{}': itag {}", source.title, stream.itag);

        let dest = self.output_dir.join(source.file_name(stream));
        let raw = self.service.download(stream, &dest).await?;
        Ok(FetchedAudio {
            raw,
            title: source.title,
            author: source.author,
        })
    }

    /// Download the highest-resolution progressive MP4 stream
    pub async fn fetch_video(&self, locator: &str) -> Result<PathBuf> {
        let source = self.resolve(locator).await?;
        let stream = select_video(&source.streams, Container::Mp4)
            .ok_or(FetchError::NoMatchingStream("progressive mp4"))?;
        log::info!(
            "video for '{}': itag {} ({:?}p)",
            source.title,
            stream.itag,
            stream.resolution
        );

        let dest = self.output_dir.join(source.file_name(stream));
        self.service.download(stream, &dest).await
    }
}
