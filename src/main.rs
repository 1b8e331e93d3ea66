use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;
use tubegrab::core::OutputKind;
use tubegrab::{
    Ffmpeg, Fetcher, InputSource, OutputDirectory, Pipeline, ToolSearch, YoutubeService,
    ensure_codec_tool_available, input,
};

const VERSION: &str = git_version::git_version!(
    args = ["--tags", "--always", "--dirty"],
    fallback = env!("CARGO_PKG_VERSION")
);

#[derive(Parser)]
#[command(
    name = "tubegrab",
    version = VERSION,
    about = "Download YouTube videos as MP3 or MP4",
    long_about = "Download YouTube videos as tagged MP3 audio and/or MP4 video.\n\
    Requires FFmpeg (ffmpeg and ffprobe) for MP3 conversion.\n\n\
    Examples:\n\
      tubegrab -l https://www.youtube.com/watch?v=dQw4w9WgXcQ   # Both MP3 and MP4\n\
      tubegrab -t mp3 -l https://youtu.be/dQw4w9WgXcQ           # MP3 only\n\
      tubegrab -f urls.txt -o ./music                          # Batch from file\n\
      tubegrab                                                 # Interactive prompt"
)]
struct Args {
    /// Download type(s)
    #[arg(
        short = 't',
        long = "type",
        num_args = 1..,
        default_values = ["mp3", "mp4"],
        value_parser = OutputKind::from_str,
        help = "Download type(s) (mp3, mp4, or both)"
    )]
    types: Vec<OutputKind>,

    /// Single URL to the YouTube video
    #[arg(short = 'l', long = "link", help = "Single URL to the YouTube video")]
    link: Option<String>,

    /// Text file with one URL per line
    #[arg(
        short = 'f',
        long = "file",
        help = "Path to a .txt file containing a list of YouTube URLs"
    )]
    file: Option<PathBuf>,

    /// Output folder; defaults to ./downloads which is created if missing
    #[arg(short = 'o', long = "output", help = "Output folder for downloads")]
    output: Option<PathBuf>,

    /// Folder holding bundled ffmpeg/ffprobe executables
    #[arg(
        long = "codec-dir",
        env = "TUBEGRAB_CODEC_DIR",
        help = "Folder containing ffmpeg and ffprobe, searched before PATH"
    )]
    codec_dir: Option<PathBuf>,

    /// Hide download progress bars
    #[arg(short = 'q', long = "quiet", help = "Hide download progress bars")]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging")]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(args).await {
        println!("[!] Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let kinds: BTreeSet<OutputKind> = args.types.into_iter().collect();

    let output = OutputDirectory::from_arg(args.output).ensure()?;
    let tools = ensure_codec_tool_available(&ToolSearch::new(args.codec_dir)).await?;
    log::info!("saving to {}", output.display());

    let service = YoutubeService::new(!args.quiet)?;
    let pipeline = Pipeline::new(Fetcher::new(service, output), Ffmpeg::new(tools));

    let source = InputSource::select(args.file, args.link);
    let report = input::run(source, &pipeline, &kinds).await?;
    if report.failed() > 0 {
        log::warn!(
            "{} of {} url(s) had failures",
            report.failed(),
            report.outcomes.len()
        );
    }
    Ok(())
}
