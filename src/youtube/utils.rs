use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::core::StreamKind;
use crate::error::{FetchError, Result};

static CODECS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"codecs="([^"]*)""#).expect("codecs pattern is valid"));

/// Path prefixes that carry the video id as the next segment
const ID_PATH_PREFIXES: [&str; 4] = ["shorts", "embed", "live", "v"];

/// Parse video ID from a YouTube URL
pub fn parse_id(url: &str) -> Result<String> {
    if !is_youtube_url(url) {
        return Err(FetchError::UnsupportedSite(format!(
            "Not a valid YouTube URL: {}",
            url
        )));
    }
    let parsed = Url::parse(url)?;
    let domain = parsed.domain().unwrap_or_default();

    // youtu.be/VIDEO_ID
    if domain == "youtu.be" || domain.ends_with(".youtu.be") {
        if let Some(id) = parsed.path_segments().and_then(|mut s| s.next())
            && is_valid_video_id(id)
        {
            return Ok(id.to_string());
        }
    }

    // youtube.com/watch?v=VIDEO_ID
    if let Some((_, id)) = parsed.query_pairs().find(|(k, _)| k == "v")
        && is_valid_video_id(&id)
    {
        return Ok(id.into_owned());
    }

    // youtube.com/shorts/VIDEO_ID and friends
    if let Some(mut segments) = parsed.path_segments()
        && let (Some(prefix), Some(id)) = (segments.next(), segments.next())
        && ID_PATH_PREFIXES.contains(&prefix)
        && is_valid_video_id(id)
    {
        return Ok(id.to_string());
    }

    Err(FetchError::InvalidUrl(format!(
        "Cannot extract video ID from: {}",
        url
    )))
}

/// Validate if a string is a valid YouTube video ID (11 characters, alphanumeric + - and _)
pub fn is_valid_video_id(id: &str) -> bool {
    id.len() == 11 && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Check if URL is a YouTube link using strict domain validation
pub fn is_youtube_url(url: &str) -> bool {
    if let Ok(parsed) = Url::parse(url)
        && let Some(domain) = parsed.domain()
    {
        let domain = domain.to_ascii_lowercase();
        return domain == "youtube.com"
            || domain.ends_with(".youtube.com")
            || domain == "youtu.be"
            || domain.ends_with(".youtu.be");
    }
    false
}

/// Construct YouTube watch URL from video ID
pub fn build_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Codec list from a mime type, e.g. `["avc1.42001E", "mp4a.40.2"]`
pub fn parse_codecs(mime: &str) -> Vec<String> {
    CODECS_RE
        .captures(mime)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Classify a stream by its mime type: two codecs means audio and video are muxed
pub fn stream_kind(mime: &str) -> StreamKind {
    if mime.starts_with("audio/") {
        return StreamKind::AudioOnly;
    }
    if parse_codecs(mime).len() >= 2 {
        StreamKind::Progressive
    } else {
        StreamKind::VideoOnly
    }
}
