//! Where URLs come from: a single link, a batch file, or an interactive prompt.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::convert::Transcoder;
use crate::core::{MediaService, OutputKind};
use crate::error::FatalError;
use crate::pipeline::{BatchReport, Pipeline};
use crate::validate::check;

pub const QUIT: &str = "quit";
pub const PROMPT: &str = "URL: ";
pub const INVALID_URL_MESSAGE: &str = "[*] Error: Invalid URL";

/// Mutually exclusive input modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Link(String),
    Interactive,
}

impl InputSource {
    /// File beats link, link beats interactive
    pub fn select(file: Option<PathBuf>, link: Option<String>) -> Self {
        match (file, link) {
            (Some(file), _) => InputSource::File(file),
            (None, Some(link)) => InputSource::Link(link.trim().to_string()),
            (None, None) => InputSource::Interactive,
        }
    }
}

/// Non-empty trimmed lines, in order
pub fn parse_batch(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_batch_file(path: &Path) -> Result<Vec<String>, FatalError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FatalError::BatchFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_batch(&contents))
}

/// What the interactive loop does with one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Quit,
    Skip,
    Invalid,
    Process(String),
}

pub fn classify(line: &str) -> PromptAction {
    let line = line.trim();
    if line.eq_ignore_ascii_case(QUIT) {
        PromptAction::Quit
    } else if line.is_empty() {
        PromptAction::Skip
    } else {
        match check(line) {
            Ok(url) => PromptAction::Process(url.to_string()),
            Err(_) => PromptAction::Invalid,
        }
    }
}

/// Prompt for one URL at a time until `quit` or end of input.
///
/// Returns one outcome per URL handed to the pipeline.
pub async fn run_interactive<S, T, R, W>(
    pipeline: &Pipeline<S, T>,
    kinds: &BTreeSet<OutputKind>,
    input: &mut R,
    out: &mut W,
) -> Result<BatchReport, FatalError>
where
    S: MediaService,
    T: Transcoder,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Enter YouTube URLs one at a time (type '{}' to exit):", QUIT)?;
    let mut report = BatchReport::default();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match classify(&line) {
            PromptAction::Quit => break,
            PromptAction::Skip => continue,
            PromptAction::Invalid => writeln!(out, "{}", INVALID_URL_MESSAGE)?,
            PromptAction::Process(url) => {
                report.outcomes.push(pipeline.process_one(&url, kinds).await);
            }
        }
    }
    Ok(report)
}

/// Drive the pipeline from the chosen input source
pub async fn run<S: MediaService, T: Transcoder>(
    source: InputSource,
    pipeline: &Pipeline<S, T>,
    kinds: &BTreeSet<OutputKind>,
) -> Result<BatchReport, FatalError> {
    match source {
        InputSource::File(path) => {
            let urls = read_batch_file(&path)?;
            log::info!("{} url(s) read from {}", urls.len(), path.display());
            Ok(pipeline.process(urls, kinds).await)
        }
        InputSource::Link(url) => Ok(pipeline.process([url], kinds).await),
        InputSource::Interactive => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_interactive(pipeline, kinds, &mut stdin.lock(), &mut stdout.lock()).await
        }
    }
}
