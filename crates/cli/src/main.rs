//! CLI tool turning a PDF into a slide deck and a narrated video.

mod pipeline;

use anyhow::Result;
use clap::Parser;
use pipeline::PipelineOptions;
use slidecast_media::{EspeakEngine, FfmpegEncoder, SpeechConfig, VideoConfig, VisualStyle};
use std::path::PathBuf;

/// Summarize a PDF into slides, narrate them, and render a video.
#[derive(Parser, Debug)]
#[command(name = "slidecast")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PDF file
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    outdir: PathBuf,

    /// Maximum number of slides
    #[arg(short, long, default_value = "6", value_parser = clap::value_parser!(u32).range(1..))]
    slides: u32,

    /// Background music, looped under the narration
    #[arg(short, long)]
    music: Option<PathBuf>,

    /// Speech rate in words per minute
    #[arg(long, default_value = "150")]
    rate: u32,

    /// Narration voice, e.g. "en-us" (default: first voice espeak lists, usually "af")
    #[arg(long)]
    voice: Option<String>,

    /// Font used on the slide cards (default: a common system font)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Video frame rate
    #[arg(long, default_value = "24", value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut style = VisualStyle::new();
    if let Some(font) = &args.font {
        style = style.with_font(font);
    }
    let video = VideoConfig::new().with_fps(args.fps);

    let mut options = PipelineOptions::new(&args.outdir)
        .with_slides(args.slides as usize)
        .with_style(style)
        .with_video(video.clone());
    if let Some(music) = &args.music {
        options = options.with_music(music);
    }

    let mut speech_config = SpeechConfig::new().with_rate(args.rate);
    if let Some(voice) = &args.voice {
        speech_config = speech_config.with_voice(voice);
    }

    if args.verbose {
        eprintln!("Processing: {}", args.input.display());
    }

    let prepared = pipeline::prepare(&args.input, &options)?;

    // Narration and video need espeak and ffmpeg; the deck is already on disk.
    let mut speech = EspeakEngine::init(&speech_config)?;
    let encoder = FfmpegEncoder::new(video)?;

    let result = pipeline::narrate(prepared, &options, &mut speech, &encoder);
    speech.shutdown()?;
    let outputs = result?;

    if args.verbose {
        eprintln!(
            "  {} sections found, {} slides, {:.1}s of video",
            outputs.sections_found,
            outputs.slides.len(),
            outputs.duration
        );
        for (visual, audio) in outputs.visuals.iter().zip(&outputs.audio) {
            eprintln!("  {} + {}", visual.display(), audio.display());
        }
    }

    println!("Outputs:");
    println!(" PPTX: {}", outputs.pptx.display());
    println!(" Video: {}", outputs.video.display());

    Ok(())
}
