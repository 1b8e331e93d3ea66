use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, USER_AGENT};

use crate::core::{Container, MediaSource, StreamDescriptor};
use crate::download::HttpClient;
use crate::error::{FetchError, Result};
use crate::youtube::types::{
    ContentPlaybackContext, Format, InnertubeClient, InnertubeContext, InnertubeRequest,
    PlaybackContext, PlayerResponse,
};
use crate::youtube::utils::stream_kind;

const PLAYER_API_URL: &str = "https://www.youtube.com/youtubei/v1/player?prettyPrint=false";

// The VR client is served plain stream URLs without a signature cipher.
pub const VR_CLIENT_NAME: &str = "ANDROID_VR";
pub const VR_CLIENT_ID: &str = "28";
pub const VR_CLIENT_VERSION: &str = "1.60.19";
pub const VR_USER_AGENT: &str = "com.google.android.apps.youtube.vr.oculus/1.60.19 (Linux; U; Android 12L; eureka-user Build/SQ3A.220605.009.A1) gzip";

fn vr_client() -> InnertubeClient {
    InnertubeClient {
        client_name: VR_CLIENT_NAME,
        client_version: VR_CLIENT_VERSION,
        device_make: "Oculus",
        device_model: "Quest 3",
        android_sdk_version: 32,
        os_name: "Android",
        os_version: "12L",
        hl: "en",
        gl: "US",
    }
}

/// Headers expected alongside requests made as the VR client
pub fn client_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(VR_USER_AGENT));
    headers.insert("X-YouTube-Client-Name", HeaderValue::from_static(VR_CLIENT_ID));
    headers.insert(
        "X-YouTube-Client-Version",
        HeaderValue::from_static(VR_CLIENT_VERSION),
    );
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.youtube.com"));
    headers
}

/// Fetch player response from the innertube player API
pub async fn fetch_player(http: &HttpClient, video_id: &str) -> Result<PlayerResponse> {
    let request_body = InnertubeRequest {
        video_id: video_id.to_string(),
        context: InnertubeContext { client: vr_client() },
        playback_context: PlaybackContext {
            content_playback_context: ContentPlaybackContext {
                html5_preference: "HTML5_PREF_WANTS".to_string(),
            },
        },
        content_check_ok: true,
        racy_check_ok: true,
    };

    let mut headers = client_headers();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    http.post_json(PLAYER_API_URL, &request_body, headers).await
}

/// Turn a player response into a [`MediaSource`].
///
/// Streams are listed progressive formats first, then adaptive formats, which is
/// the order the service reports them in. Formats that only carry a signature
/// cipher have no usable URL and are skipped.
pub fn media_source(video_id: &str, player: PlayerResponse) -> Result<MediaSource> {
    if player.playability_status.status != "OK" {
        let reason = player
            .playability_status
            .reason
            .unwrap_or(player.playability_status.status);
        return Err(FetchError::Unavailable(reason));
    }

    let details = player
        .video_details
        .ok_or_else(|| FetchError::Unavailable("missing video details".to_string()))?;
    let streaming = player.streaming_data.unwrap_or_default();

    let streams = streaming
        .formats
        .iter()
        .chain(streaming.adaptive_formats.iter())
        .enumerate()
        .filter_map(|(position, format)| descriptor(position, format))
        .collect::<Vec<_>>();

    log::debug!(
        "{}: {} usable streams ({} formats, {} adaptive)",
        video_id,
        streams.len(),
        streaming.formats.len(),
        streaming.adaptive_formats.len()
    );

    Ok(MediaSource::new(details.video_id, details.title, details.author).with_streams(streams))
}

fn descriptor(position: usize, format: &Format) -> Option<StreamDescriptor> {
    let url = format.url.clone()?;
    Some(StreamDescriptor {
        itag: format.itag,
        kind: stream_kind(&format.mime_type),
        container: Container::from_mime(&format.mime_type),
        mime_type: format.mime_type.clone(),
        resolution: format.height,
        bitrate: format.bitrate,
        content_length: format
            .content_length
            .as_deref()
            .and_then(|l| l.parse().ok()),
        url,
        position,
    })
}
