//! Audio conversion through the external codec tool.

use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::ConvertError;
use crate::preflight::CodecTools;

/// Extension of the converted audio file
pub const AUDIO_EXTENSION: &str = "mp3";

/// Narrow interface over the codec tool
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Number of audio streams found in `input`
    async fn probe_audio_streams(&self, input: &Path) -> Result<usize, ConvertError>;

    /// Re-encode the audio of `input` into `output`
    async fn transcode_audio(&self, input: &Path, output: &Path) -> Result<(), ConvertError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
}

/// ffmpeg/ffprobe backed transcoder
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    tools: CodecTools,
}

impl Ffmpeg {
    pub fn new(tools: CodecTools) -> Self {
        Self { tools }
    }

    async fn run(program: &Path, args: &[&OsStr]) -> Result<Vec<u8>, ConvertError> {
        let tool = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        log::debug!("running {} {:?}", program.display(), args);

        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ConvertError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(ConvertError::ToolFailed {
                tool,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    async fn probe_audio_streams(&self, input: &Path) -> Result<usize, ConvertError> {
        let stdout = Self::run(
            &self.tools.ffprobe,
            &[
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-show_streams"),
                OsStr::new("-of"),
                OsStr::new("json"),
                input.as_os_str(),
            ],
        )
        .await?;
        let probe: ProbeOutput = serde_json::from_slice(&stdout)?;
        Ok(probe
            .streams
            .iter()
            .filter(|s| s.codec_type.as_deref() == Some("audio"))
            .count())
    }

    async fn transcode_audio(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        Self::run(
            &self.tools.ffmpeg,
            &[
                OsStr::new("-hide_banner"),
                OsStr::new("-loglevel"),
                OsStr::new("error"),
                OsStr::new("-y"),
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-vn"),
                OsStr::new("-f"),
                OsStr::new("mp3"),
                output.as_os_str(),
            ],
        )
        .await
        .map(|_| ())
    }
}

/// Path of the converted file: same base name, `.mp3` extension
pub fn audio_path_for(raw: &Path) -> PathBuf {
    raw.with_extension(AUDIO_EXTENSION)
}

/// Convert `raw` to MP3 and delete it once the new file is confirmed written.
///
/// Any failure leaves `raw` untouched.
pub async fn convert_to_audio_container<T: Transcoder + ?Sized>(
    transcoder: &T,
    raw: &Path,
) -> Result<PathBuf, ConvertError> {
    if !tokio::fs::try_exists(raw).await.unwrap_or(false) {
        return Err(ConvertError::MissingInput(raw.to_path_buf()));
    }
    if transcoder.probe_audio_streams(raw).await? == 0 {
        return Err(ConvertError::NoAudioStream(raw.to_path_buf()));
    }

    let target = audio_path_for(raw);
    if let Err(e) = transcoder.transcode_audio(raw, &target).await {
        remove_partial(&target).await;
        return Err(e);
    }

    match tokio::fs::metadata(&target).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        _ => {
            remove_partial(&target).await;
            return Err(ConvertError::EmptyOutput(target));
        }
    }

    if let Err(e) = tokio::fs::remove_file(raw).await {
        log::warn!("converted but could not remove {}: {}", raw.display(), e);
    }
    Ok(target)
}

/// Drop whatever a failed transcode left at `target`
async fn remove_partial(target: &Path) {
    match tokio::fs::remove_file(target).await {
        Ok(()) => log::debug!("removed partial {}", target.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("could not remove {}: {}", target.display(), e),
    }
}
