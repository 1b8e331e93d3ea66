//! Per-URL orchestration of fetch, convert and tag.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::convert::{Transcoder, convert_to_audio_container};
use crate::core::{MediaService, OutputKind};
use crate::error::PipelineError;
use crate::fetch::Fetcher;
use crate::tag::tag;

pub type StageResult = Result<PathBuf, PipelineError>;

/// What happened to one URL
#[derive(Debug)]
pub struct UrlOutcome {
    pub url: String,
    /// `None` when MP3 was not requested
    pub audio: Option<StageResult>,
    /// `None` when MP4 was not requested
    pub video: Option<StageResult>,
}

impl UrlOutcome {
    pub fn succeeded(&self) -> bool {
        self.audio.as_ref().is_none_or(|r| r.is_ok()) && self.video.as_ref().is_none_or(|r| r.is_ok())
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<UrlOutcome>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}

/// Sequences Fetcher → Converter → Tagger for every URL
pub struct Pipeline<S, T> {
    fetcher: Fetcher<S>,
    transcoder: T,
}

impl<S: MediaService, T: Transcoder> Pipeline<S, T> {
    pub fn new(fetcher: Fetcher<S>, transcoder: T) -> Self {
        Self {
            fetcher,
            transcoder,
        }
    }

    /// Download `url` as tagged MP3: fetch, convert, tag, stopping at the first failure
    pub async fn audio(&self, url: &str) -> StageResult {
        let fetched = self.fetcher.fetch_audio(url).await?;
        let mp3 = convert_to_audio_container(&self.transcoder, &fetched.raw).await?;
        tag(&mp3, &fetched.title, &fetched.author)?;
        Ok(mp3)
    }

    /// Download `url` as MP4
    pub async fn video(&self, url: &str) -> StageResult {
        Ok(self.fetcher.fetch_video(url).await?)
    }

    /// Run the requested branches for one URL, audio first
    pub async fn process_one(&self, url: &str, kinds: &BTreeSet<OutputKind>) -> UrlOutcome {
        let mut outcome = UrlOutcome {
            url: url.to_string(),
            audio: None,
            video: None,
        };
        for kind in kinds {
            println!("[*] {} Downloading: {}", kind, url);
            let result = match kind {
                OutputKind::Mp3 => self.audio(url).await,
                OutputKind::Mp4 => self.video(url).await,
            };
            report(*kind, &result);
            match kind {
                OutputKind::Mp3 => outcome.audio = Some(result),
                OutputKind::Mp4 => outcome.video = Some(result),
            }
        }
        outcome
    }

    /// Process every URL in order. Failures are reported and never stop the batch.
    pub async fn process<I, U>(&self, urls: I, kinds: &BTreeSet<OutputKind>) -> BatchReport
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for url in urls {
            let outcome = self.process_one(url.as_ref(), kinds).await;
            report.outcomes.push(outcome);
        }
        log::info!(
            "processed {} url(s), {} with failures",
            report.outcomes.len(),
            report.failed()
        );
        report
    }
}

fn report(kind: OutputKind, result: &StageResult) {
    match result {
        Ok(path) => println!("[*] {} Saved: {}", kind, path.display()),
        Err(e) => println!("[!] {} {} error: {}", kind, e.stage(), e),
    }
}
