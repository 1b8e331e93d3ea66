//! One-time check that the codec tool is reachable.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::FatalError;

pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";
pub const FFMPEG_DOWNLOAD_URL: &str = "https://ffmpeg.org/download.html";

/// Resolved encoder and probe executables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

/// Where to look for the codec tool before falling back to `PATH`
#[derive(Debug, Clone, Default)]
pub struct ToolSearch {
    pub bundled_dirs: Vec<PathBuf>,
}

impl ToolSearch {
    /// Explicit directory first, then the directory holding the running executable
    pub fn new(explicit_dir: Option<PathBuf>) -> Self {
        let mut bundled_dirs: Vec<PathBuf> = explicit_dir.into_iter().collect();
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            bundled_dirs.push(dir.to_path_buf());
        }
        Self { bundled_dirs }
    }

    /// Resolve a single executable
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        self.bundled_dirs
            .iter()
            .find_map(|dir| find_in_dir(dir, name))
            .or_else(|| which::which(name).ok())
    }

    /// Resolve both executables, or nothing
    pub fn locate(&self) -> Option<CodecTools> {
        Some(CodecTools {
            ffmpeg: self.find(FFMPEG)?,
            ffprobe: self.find(FFPROBE)?,
        })
    }
}

/// `dir/name` (or `dir/name.exe` on Windows) if it is a file
pub fn find_in_dir(dir: &Path, name: &str) -> Option<PathBuf> {
    let file_name = format!("{}{}", name, std::env::consts::EXE_SUFFIX);
    let candidate = dir.join(file_name);
    candidate.is_file().then_some(candidate)
}

/// Best-effort install through the system package manager. Failures are logged only.
async fn install_with_apt() {
    for args in [
        &["apt", "update"][..],
        &["apt", "install", "-y", "ffmpeg"][..],
    ] {
        println!("[*] Running: sudo {}", args.join(" "));
        match Command::new("sudo").args(args).status().await {
            Ok(status) if status.success() => {}
            Ok(status) => log::warn!("sudo {} exited with {}", args.join(" "), status),
            Err(e) => log::warn!("failed to run sudo {}: {}", args.join(" "), e),
        }
    }
}

/// Ask the operator to install the tool and wait for Enter
fn prompt_manual_install(input: &mut impl BufRead, out: &mut impl Write) -> Result<(), FatalError> {
    writeln!(
        out,
        "Please install FFmpeg manually from {} and ensure it's in your PATH.",
        FFMPEG_DOWNLOAD_URL
    )?;
    write!(out, "Press Enter after installing FFmpeg to continue...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Make sure both ffmpeg and ffprobe resolve, attempting recovery once.
pub async fn ensure_codec_tool_available(search: &ToolSearch) -> Result<CodecTools, FatalError> {
    if let Some(tools) = search.locate() {
        log::debug!("using {} and {}", tools.ffmpeg.display(), tools.ffprobe.display());
        return Ok(tools);
    }

    println!("[*] FFmpeg or ffprobe not found. Attempting installation...");
    if cfg!(target_os = "linux") {
        install_with_apt().await;
    } else {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        prompt_manual_install(&mut stdin.lock(), &mut stdout.lock())?;
    }

    search.locate().ok_or(FatalError::CodecToolMissing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX));
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_find_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_in_dir(dir.path(), FFMPEG).is_none());

        let ffmpeg = touch(dir.path(), FFMPEG);
        assert_eq!(find_in_dir(dir.path(), FFMPEG), Some(ffmpeg));

        std::fs::create_dir(dir.path().join(format!("{}{}", FFPROBE, std::env::consts::EXE_SUFFIX)))
            .unwrap();
        assert!(find_in_dir(dir.path(), FFPROBE).is_none());
    }

    #[test]
    fn test_bundled_dir_takes_priority() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = touch(dir.path(), FFMPEG);
        let ffprobe = touch(dir.path(), FFPROBE);

        let search = ToolSearch::new(Some(dir.path().to_path_buf()));
        assert_eq!(search.bundled_dirs[0], dir.path());
        assert_eq!(search.locate(), Some(CodecTools { ffmpeg, ffprobe }));
    }

    #[test]
    fn test_locate_needs_both_tools() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = touch(dir.path(), FFMPEG);
        let search = ToolSearch {
            bundled_dirs: vec![dir.path().to_path_buf()],
        };
        assert_eq!(search.find(FFMPEG), Some(ffmpeg));
        if which::which(FFPROBE).is_err() {
            assert!(search.locate().is_none());
        }
    }

    #[test]
    fn test_prompt_manual_install_waits_for_enter() {
        let mut input = Cursor::new(b"\n".to_vec());
        let mut out = Vec::new();
        prompt_manual_install(&mut input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(FFMPEG_DOWNLOAD_URL));
        assert!(text.contains("Press Enter"));
    }
}
