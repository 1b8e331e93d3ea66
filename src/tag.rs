use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;

use crate::error::TagError;

/// Set title and artist on an MP3 file, starting an empty tag when none exists
pub fn tag(path: &Path, title: &str, author: &str) -> Result<(), TagError> {
    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
        Err(source) => {
            return Err(TagError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    tag.set_title(title);
    tag.set_artist(author);
    tag.write_to_path(path, Version::Id3v24)
        .map_err(|source| TagError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_mp3(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("song.mp3");
        // MPEG audio frame header followed by silence
        let mut bytes = vec![0xFF, 0xFB, 0x90, 0x64];
        bytes.extend(std::iter::repeat_n(0u8, 413));
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_tag_initializes_missing_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_mp3(dir.path());

        tag(&path, "Never Gonna Give You Up", "Rick Astley").unwrap();

        let written = Tag::read_from_path(&path).unwrap();
        assert_eq!(written.title(), Some("Never Gonna Give You Up"));
        assert_eq!(written.artist(), Some("Rick Astley"));
    }

    #[test]
    fn test_tag_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_mp3(dir.path());

        tag(&path, "Title", "Author").unwrap();
        let first = std::fs::read(&path).unwrap();
        tag(&path, "Title", "Author").unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_tag_overwrites_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_mp3(dir.path());

        tag(&path, "Old", "Someone").unwrap();
        tag(&path, "New", "Someone Else").unwrap();

        let written = Tag::read_from_path(&path).unwrap();
        assert_eq!(written.title(), Some("New"));
        assert_eq!(written.artist(), Some("Someone Else"));
    }

    #[test]
    fn test_tag_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = tag(&dir.path().join("missing.mp3"), "t", "a");
        assert!(matches!(result, Err(TagError::Read { .. })));
    }
}
