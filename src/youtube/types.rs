use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResponse {
    #[serde(rename = "playabilityStatus")]
    pub playability_status: PlayabilityStatus,
    #[serde(rename = "streamingData")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_data: Option<StreamingData>,
    #[serde(rename = "videoDetails")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_details: Option<VideoDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayabilityStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamingData {
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(rename = "adaptiveFormats")]
    #[serde(default)]
    pub adaptive_formats: Vec<Format>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Format {
    pub itag: u32,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "contentLength")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InnertubeClient {
    #[serde(rename = "clientName")]
    pub client_name: &'static str,
    #[serde(rename = "clientVersion")]
    pub client_version: &'static str,
    #[serde(rename = "deviceMake")]
    pub device_make: &'static str,
    #[serde(rename = "deviceModel")]
    pub device_model: &'static str,
    #[serde(rename = "androidSdkVersion")]
    pub android_sdk_version: u32,
    #[serde(rename = "osName")]
    pub os_name: &'static str,
    #[serde(rename = "osVersion")]
    pub os_version: &'static str,
    pub hl: &'static str,
    pub gl: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct InnertubeContext {
    pub client: InnertubeClient,
}

#[derive(Debug, Serialize)]
pub struct InnertubeRequest {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub context: InnertubeContext,
    #[serde(rename = "playbackContext")]
    pub playback_context: PlaybackContext,
    #[serde(rename = "contentCheckOk")]
    pub content_check_ok: bool,
    #[serde(rename = "racyCheckOk")]
    pub racy_check_ok: bool,
}

#[derive(Debug, Serialize)]
pub struct PlaybackContext {
    #[serde(rename = "contentPlaybackContext")]
    pub content_playback_context: ContentPlaybackContext,
}

#[derive(Debug, Serialize)]
pub struct ContentPlaybackContext {
    #[serde(rename = "html5Preference")]
    pub html5_preference: String,
}
