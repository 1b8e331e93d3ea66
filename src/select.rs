//! Stream selection policy.
//!
//! Both functions are pure over the service-reported stream list so they can be
//! tested without a network.

use crate::core::{Container, StreamDescriptor, StreamKind};

/// First audio-only stream in service order. No bitrate comparison.
pub fn select_audio(streams: &[StreamDescriptor]) -> Option<&StreamDescriptor> {
    streams
        .iter()
        .filter(|s| s.kind == StreamKind::AudioOnly)
        .min_by_key(|s| s.position)
}

/// Highest-resolution progressive stream in `container`.
///
/// Ties keep service order; streams without a known resolution sort last.
pub fn select_video(streams: &[StreamDescriptor], container: Container) -> Option<&StreamDescriptor> {
    let mut candidates: Vec<&StreamDescriptor> = streams
        .iter()
        .filter(|s| s.kind == StreamKind::Progressive && s.container == container)
        .collect();
    candidates.sort_by_key(|s| s.position);
    // stable: equal resolutions stay in service order
    candidates.sort_by(|a, b| b.resolution.cmp(&a.resolution));
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stream(
        position: usize,
        kind: StreamKind,
        container: Container,
        resolution: Option<u32>,
    ) -> StreamDescriptor {
        StreamDescriptor {
            itag: position as u32,
            kind,
            container,
            mime_type: String::new(),
            resolution,
            bitrate: None,
            content_length: None,
            url: format!("https://example.com/{position}"),
            position,
        }
    }

    #[test]
    fn test_audio_picks_first_audio_only() {
        let streams = vec![
            make_stream(0, StreamKind::Progressive, Container::Mp4, Some(360)),
            make_stream(1, StreamKind::VideoOnly, Container::Mp4, Some(1080)),
            make_stream(2, StreamKind::AudioOnly, Container::Mp4, None),
            make_stream(3, StreamKind::AudioOnly, Container::Webm, None),
        ];
        assert_eq!(select_audio(&streams).unwrap().position, 2);
    }

    #[test]
    fn test_audio_none_when_missing() {
        let streams = vec![make_stream(0, StreamKind::Progressive, Container::Mp4, Some(360))];
        assert!(select_audio(&streams).is_none());
        assert!(select_audio(&[]).is_none());
    }

    #[test]
    fn test_video_highest_progressive_in_container() {
        let streams = vec![
            make_stream(0, StreamKind::Progressive, Container::Mp4, Some(360)),
            make_stream(1, StreamKind::Progressive, Container::Webm, Some(1080)),
            make_stream(2, StreamKind::VideoOnly, Container::Mp4, Some(2160)),
            make_stream(3, StreamKind::Progressive, Container::Mp4, Some(720)),
            make_stream(4, StreamKind::AudioOnly, Container::Mp4, None),
        ];
        assert_eq!(select_video(&streams, Container::Mp4).unwrap().position, 3);
        assert_eq!(select_video(&streams, Container::Webm).unwrap().position, 1);
        assert!(select_video(&streams, Container::ThreeGp).is_none());
    }

    #[test]
    fn test_video_ties_and_unknown_resolution() {
        let streams = vec![
            make_stream(5, StreamKind::Progressive, Container::Mp4, None),
            make_stream(2, StreamKind::Progressive, Container::Mp4, Some(720)),
            make_stream(1, StreamKind::Progressive, Container::Mp4, Some(720)),
        ];
        assert_eq!(select_video(&streams, Container::Mp4).unwrap().position, 1);

        let unknown_only = vec![make_stream(0, StreamKind::Progressive, Container::Mp4, None)];
        assert_eq!(select_video(&unknown_only, Container::Mp4).unwrap().position, 0);
    }
}
