//! Narration synthesis.
//!
//! [`EspeakEngine`] renders speech offline with `espeak-ng` and transcodes
//! it to MP3 with `ffmpeg`. The engine is created explicitly with
//! [`EspeakEngine::init`], handed to [`synthesize_texts`], and released
//! with [`EspeakEngine::shutdown`].

use crate::tools::{find_any_tool, find_tool, path_arg, run_tool};
use slidecast_core::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Length of the clip produced for empty narration text.
const SILENT_CLIP_SECS: f64 = 0.5;

/// Speech settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// Speaking rate in words per minute.
    pub rate: u32,
    /// Voice identifier; the first installed voice when unset.
    pub voice: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: 150,
            voice: None,
        }
    }
}

impl SpeechConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

/// A text-to-speech backend writing one audio file per call.
pub trait SpeechEngine {
    /// Speak `text` into the audio file at `out`.
    fn synthesize(&mut self, text: &str, out: &Path) -> Result<()>;
}

/// Offline speech through `espeak-ng` (or classic `espeak`).
pub struct EspeakEngine {
    espeak: PathBuf,
    ffmpeg: PathBuf,
    rate: u32,
    voice: Option<String>,
    scratch: TempDir,
    clips: usize,
}

impl EspeakEngine {
    /// Locate the speech and transcoding tools and pick a voice.
    ///
    /// Without a configured voice the first entry of `espeak --voices` is
    /// used. espeak lists voices alphabetically by language, so that is
    /// usually Afrikaans (`af`); set [`SpeechConfig::voice`] (for example
    /// `en-us`) for English narration.
    pub fn init(config: &SpeechConfig) -> Result<Self> {
        let espeak = find_any_tool(&["espeak-ng", "espeak"])?;
        let ffmpeg = find_tool("ffmpeg")?;

        let voice = match &config.voice {
            Some(voice) => Some(voice.clone()),
            None => {
                let output = run_tool(&espeak, &["--voices".to_string()], Error::SpeechError)?;
                default_voice(&String::from_utf8_lossy(&output.stdout))
            }
        };
        log::debug!(
            "Speech engine {} at {} wpm, voice {}",
            espeak.display(),
            config.rate,
            voice.as_deref().unwrap_or("default")
        );

        Ok(Self {
            espeak,
            ffmpeg,
            rate: config.rate,
            voice,
            scratch: tempfile::tempdir()?,
            clips: 0,
        })
    }

    /// The voice in use, if one was selected.
    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    /// Release the engine and its scratch directory.
    pub fn shutdown(self) -> Result<()> {
        log::debug!("Speech engine done after {} clips", self.clips);
        self.scratch.close()?;
        Ok(())
    }
}

impl SpeechEngine for EspeakEngine {
    fn synthesize(&mut self, text: &str, out: &Path) -> Result<()> {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.clips += 1;

        if text.trim().is_empty() {
            run_tool(&self.ffmpeg, &silence_args(out), Error::SpeechError)?;
            return Ok(());
        }

        // Text goes through a file so leading dashes are never read as flags.
        let text_file = self.scratch.path().join(format!("clip_{:03}.txt", self.clips));
        let wav = self.scratch.path().join(format!("clip_{:03}.wav", self.clips));
        std::fs::write(&text_file, text)?;

        run_tool(
            &self.espeak,
            &espeak_args(self.rate, self.voice.as_deref(), &text_file, &wav),
            Error::SpeechError,
        )?;
        run_tool(&self.ffmpeg, &transcode_args(&wav, out), Error::SpeechError)?;

        Ok(())
    }
}

/// Speak each text into `out_dir/slide_NN.mp3`, in order.
pub fn synthesize_texts<S: AsRef<str>>(
    engine: &mut dyn SpeechEngine,
    texts: &[S],
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let mut paths = Vec::with_capacity(texts.len());
    for (idx, text) in texts.iter().enumerate() {
        let out = out_dir.join(format!("slide_{:02}.mp3", idx + 1));
        engine.synthesize(text.as_ref(), &out)?;
        log::debug!("Narration {} -> {}", idx + 1, out.display());
        paths.push(out);
    }

    Ok(paths)
}

/// First listed voice, announced so an unexpected language is noticed.
fn default_voice(listing: &str) -> Option<String> {
    let voice = parse_voices(listing).into_iter().next();
    match &voice {
        Some(voice) => log::info!("No voice configured, using \"{}\" (choose another with --voice)", voice),
        None => log::info!("No voices listed, using the espeak default voice"),
    }
    voice
}

/// Language column of `espeak --voices` output, in listed order.
fn parse_voices(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

fn espeak_args(rate: u32, voice: Option<&str>, text_file: &Path, wav: &Path) -> Vec<String> {
    let mut args = vec!["-s".to_string(), rate.to_string()];
    if let Some(voice) = voice {
        args.push("-v".to_string());
        args.push(voice.to_string());
    }
    args.extend([
        "-w".to_string(),
        path_arg(wav),
        "-f".to_string(),
        path_arg(text_file),
    ]);
    args
}

fn transcode_args(wav: &Path, out: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        path_arg(wav),
        "-codec:a".to_string(),
        "libmp3lame".to_string(),
        "-q:a".to_string(),
        "4".to_string(),
        path_arg(out),
    ]
}

fn silence_args(out: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        "anullsrc=r=22050:cl=mono".to_string(),
        "-t".to_string(),
        SILENT_CLIP_SECS.to_string(),
        "-codec:a".to_string(),
        "libmp3lame".to_string(),
        path_arg(out),
    ]
}
