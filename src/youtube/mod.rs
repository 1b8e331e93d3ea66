use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::core::{MediaService, MediaSource, StreamDescriptor};
use crate::download::HttpClient;
use crate::error::Result;

pub mod core;
pub mod types;
pub mod utils;

pub use types::{Format, PlayerResponse};
pub use utils::{build_watch_url, is_youtube_url, parse_id};

/// YouTube client implementing the MediaService trait
#[derive(Debug, Clone)]
pub struct YoutubeService {
    http: HttpClient,
}

impl YoutubeService {
    pub fn new(show_progress: bool) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(show_progress)?,
        })
    }
}

#[async_trait]
impl MediaService for YoutubeService {
    fn matches(&self, locator: &str) -> bool {
        is_youtube_url(locator)
    }

    async fn list_streams(&self, locator: &str) -> Result<MediaSource> {
        let video_id = parse_id(locator)?;
        log::debug!("resolving {} ({})", build_watch_url(&video_id), locator);
        let player = self::core::fetch_player(&self.http, &video_id).await?;
        self::core::media_source(&video_id, player)
    }

    async fn download(&self, stream: &StreamDescriptor, dest: &Path) -> Result<PathBuf> {
        log::debug!(
            "downloading itag {} ({}) to {}",
            stream.itag,
            stream.mime_type,
            dest.display()
        );
        self.http
            .download_to_file(&stream.url, dest, stream.content_length, self::core::client_headers())
            .await
    }
}
