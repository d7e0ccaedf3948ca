use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    sync::atomic::{AtomicU64, Ordering},
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framecast::{
    DecodeOptions, ExtractOptions, FrameSink, dominant_color, frame_count_with, has_transparency,
    is_animated_with,
};
use image::Rgb;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framecast info banner.gif --json\n  framecast extract banner.gif --progress\n  framecast extract banner.gif --quality 85 --max-frames 10\n  framecast completions zsh > _framecast";

#[derive(Debug, Parser)]
#[command(
    name = "framecast",
    version,
    about = "Classify images and stream their frames as base64 payloads",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Tolerate truncated input, stopping at the last good frame.
    #[arg(long)]
    tolerate_truncation: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print classification info for an image (alias: probe).
    #[command(
        about = "Print image classification info",
        visible_alias = "probe",
        after_help = "Examples:\n  framecast info banner.gif\n  framecast info banner.gif --json"
    )]
    Info {
        /// Input image path.
        input: PathBuf,

        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Stream frames to stdout, one payload line per frame.
    #[command(
        about = "Extract frames as payload lines",
        after_help = "Examples:\n  framecast extract banner.gif\n  framecast extract banner.gif --quality 85 --progress\n  framecast extract huge.gif --max-frames 25"
    )]
    Extract {
        /// Input image path.
        input: PathBuf,

        /// JPEG re-encoding quality (1-100).
        #[arg(long, default_value_t = framecast::DEFAULT_JPEG_QUALITY)]
        quality: u8,

        /// Stop after this many frames have been emitted.
        #[arg(long)]
        max_frames: Option<u64>,

        /// Show a progress bar on stderr.
        #[arg(long)]
        progress: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Host sink that writes payload lines to stdout.
///
/// Doubles as the cancellation source: with `--max-frames` set it answers
/// `stop_requested` with `true` once the budget is spent.
struct StdoutSink {
    show_progress: bool,
    max_frames: Option<u64>,
    emitted: AtomicU64,
    bar: Mutex<Option<ProgressBar>>,
}

impl StdoutSink {
    fn new(show_progress: bool, max_frames: Option<u64>) -> Self {
        Self {
            show_progress,
            max_frames,
            emitted: AtomicU64::new(0),
            bar: Mutex::new(None),
        }
    }
}

impl FrameSink for StdoutSink {
    fn report_info(&self, frame_count: u64, path: &Path) {
        if self.show_progress {
            let bar = ProgressBar::new(frame_count);
            let style = ProgressStyle::with_template(
                "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style.progress_chars("##-"));
            *self.bar.lock().unwrap() = Some(bar);
        } else {
            eprintln!(
                "{} {} frame(s) in {}",
                "info:".cyan().bold(),
                frame_count,
                path.display()
            );
        }
    }

    fn stop_requested(&self, _path: &Path) -> bool {
        match self.max_frames {
            Some(limit) => self.emitted.load(Ordering::Acquire) >= limit,
            None => false,
        }
    }

    fn emit_frame(&self, payload: &str) {
        println!("{payload}");
        self.emitted.fetch_add(1, Ordering::Release);
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(1);
        }
    }
}

fn rgb_hex(color: Rgb<u8>) -> String {
    let Rgb([r, g, b]) = color;
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.global.verbose { "debug" } else { "warn" },
    ))
    .init();

    let decode = DecodeOptions::new().with_tolerate_truncation(cli.global.tolerate_truncation);

    match cli.command {
        Commands::Info { input, json } => {
            let animated = is_animated_with(&input, &decode)?;
            let frames = frame_count_with(&input, &decode)?;
            let first = image::open(&input)?;
            let transparent = has_transparency(&first);
            let accent = dominant_color(&first);

            if json {
                let payload = json!({
                    "path": input.display().to_string(),
                    "frame_count": frames,
                    "animated": animated,
                    "width": first.width(),
                    "height": first.height(),
                    "transparent": transparent,
                    "dominant_color": rgb_hex(accent),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Path: {}", input.display());
                println!("Size: {}x{}", first.width(), first.height());
                println!("Frames: {frames}");
                println!("Animated: {animated}");
                println!("Transparent: {transparent}");
                println!("Dominant color: {}", rgb_hex(accent));
            }
        }
        Commands::Extract {
            input,
            quality,
            max_frames,
            progress,
        } => {
            let options = ExtractOptions::new()
                .with_decode(decode)
                .with_jpeg_quality(quality);

            let sink = StdoutSink::new(progress, max_frames);
            let summary = framecast::extract_frames_with(&input, &sink, &options)?;

            if let Some(bar) = sink.bar.lock().unwrap().take() {
                bar.finish_and_clear();
            }

            let outcome = if summary.cancelled {
                format!(
                    "Stopped after {} of {} frame(s) ({})",
                    summary.frames_emitted, summary.frame_count, summary.format
                )
            } else {
                format!(
                    "Emitted {} frame(s) as {}",
                    summary.frames_emitted, summary.format
                )
            };
            eprintln!("{} {}", "success:".green().bold(), outcome.green());
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framecast", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
