//! Video assembly.
//!
//! Slide images are paired with their narration clips into a [`VideoPlan`]
//! and handed to a [`VideoEncoder`]. [`FfmpegEncoder`] encodes every clip
//! as a still-image segment, joins the segments with the concat demuxer and
//! optionally lays looped background music under the result.

use crate::tools::{find_tool, path_arg, run_tool};
use serde::Deserialize;
use slidecast_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Sample rate shared by every segment so they can be concatenated losslessly.
const SEGMENT_SAMPLE_RATE: &str = "44100";

/// Encoding settings for the final video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoConfig {
    pub fps: u32,
    /// Duration in seconds of a slide without narration audio.
    pub default_duration: f64,
    /// Linear gain applied to background music.
    pub music_gain: f64,
    pub video_codec: String,
    pub audio_codec: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            default_duration: 6.0,
            music_gain: 0.08,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl VideoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_default_duration(mut self, seconds: f64) -> Self {
        self.default_duration = seconds;
        self
    }

    pub fn with_music_gain(mut self, gain: f64) -> Self {
        self.music_gain = gain;
        self
    }
}

/// One slide of the timeline: a still image held for `duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    pub image: PathBuf,
    /// Narration for the slide, when its audio file exists.
    pub audio: Option<PathBuf>,
    pub duration: f64,
}

/// Ordered clips plus optional background music.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoPlan {
    pub clips: Vec<ClipSpec>,
    pub music: Option<PathBuf>,
}

impl VideoPlan {
    /// Length of the final video in seconds.
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration).sum()
    }

    /// Whether any clip carries narration.
    pub fn has_narration(&self) -> bool {
        self.clips.iter().any(|c| c.audio.is_some())
    }
}

/// Backend that measures audio and renders a plan into a video file.
pub trait VideoEncoder {
    /// Duration of an audio file in seconds.
    fn probe_duration(&self, path: &Path) -> Result<f64>;

    /// Encode the plan into a single video at `out`.
    fn encode(&self, plan: &VideoPlan, out: &Path) -> Result<()>;
}

/// Pair slide images with narration and encode them into one video.
///
/// `images` and `audio` are positionally aligned and must have the same
/// length. A slide whose audio file is missing is shown for the configured
/// default duration without sound. Music that does not exist is ignored.
pub fn make_video(
    encoder: &dyn VideoEncoder,
    images: &[PathBuf],
    audio: &[PathBuf],
    music: Option<&Path>,
    out: &Path,
    config: &VideoConfig,
) -> Result<VideoPlan> {
    if images.len() != audio.len() {
        return Err(Error::LengthMismatch {
            visuals: images.len(),
            audio: audio.len(),
        });
    }
    if images.is_empty() {
        return Err(Error::VideoError("no slides to encode".to_string()));
    }

    let mut clips = Vec::with_capacity(images.len());
    for (image, clip_audio) in images.iter().zip(audio) {
        let clip = if clip_audio.is_file() {
            ClipSpec {
                image: image.clone(),
                audio: Some(clip_audio.clone()),
                duration: encoder.probe_duration(clip_audio)?,
            }
        } else {
            log::warn!(
                "Audio {} missing, holding slide for {}s",
                clip_audio.display(),
                config.default_duration
            );
            ClipSpec {
                image: image.clone(),
                audio: None,
                duration: config.default_duration,
            }
        };
        clips.push(clip);
    }

    let music = match music {
        Some(path) if path.is_file() => Some(path.to_path_buf()),
        Some(path) => {
            log::warn!("Background music {} not found, skipping", path.display());
            None
        }
        None => None,
    };

    let plan = VideoPlan { clips, music };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    log::info!(
        "Encoding {} slides ({:.1}s) to {}",
        plan.clips.len(),
        plan.total_duration(),
        out.display()
    );
    encoder.encode(&plan, out)?;

    Ok(plan)
}

/// `ffprobe -print_format json -show_format` output, reduced to what is read.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Encoder driving the `ffmpeg` and `ffprobe` executables.
pub struct FfmpegEncoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    config: VideoConfig,
}

impl FfmpegEncoder {
    /// Locate `ffmpeg` and `ffprobe` on `PATH`.
    pub fn new(config: VideoConfig) -> Result<Self> {
        Ok(Self {
            ffmpeg: find_tool("ffmpeg")?,
            ffprobe: find_tool("ffprobe")?,
            config,
        })
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn probe_duration(&self, path: &Path) -> Result<f64> {
        let args = vec![
            "-v".to_string(),
            "quiet".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            path_arg(path),
        ];
        let output = run_tool(&self.ffprobe, &args, Error::VideoError)?;
        parse_probe_duration(&output.stdout)
            .map_err(|e| Error::VideoError(format!("{}: {}", path.display(), e)))
    }

    fn encode(&self, plan: &VideoPlan, out: &Path) -> Result<()> {
        let scratch = tempfile::tempdir()?;

        let mut segments = Vec::with_capacity(plan.clips.len());
        for (idx, clip) in plan.clips.iter().enumerate() {
            let segment = scratch.path().join(format!("segment_{:03}.mp4", idx + 1));
            run_tool(&self.ffmpeg, &clip_args(&self.config, clip, &segment), Error::VideoError)?;
            log::debug!("Segment {} ({:.2}s) encoded", idx + 1, clip.duration);
            segments.push(segment);
        }

        let list = scratch.path().join("segments.txt");
        std::fs::write(&list, concat_list(&segments))?;

        match &plan.music {
            Some(music) => {
                let joined = scratch.path().join("joined.mp4");
                run_tool(&self.ffmpeg, &concat_args(&list, &joined), Error::VideoError)?;
                let args = music_mix_args(
                    &self.config,
                    &joined,
                    music,
                    plan.has_narration(),
                    plan.total_duration(),
                    out,
                );
                run_tool(&self.ffmpeg, &args, Error::VideoError)?;
            }
            None => {
                run_tool(&self.ffmpeg, &concat_args(&list, out), Error::VideoError)?;
            }
        }

        scratch.close()?;
        Ok(())
    }
}

fn parse_probe_duration(json: &[u8]) -> std::result::Result<f64, String> {
    let probe: ProbeOutput = serde_json::from_slice(json).map_err(|e| e.to_string())?;
    probe
        .format
        .duration
        .ok_or_else(|| "no duration reported".to_string())?
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad duration: {}", e))
}

fn base_args() -> Vec<String> {
    ["-hide_banner", "-loglevel", "error", "-y"]
        .iter()
        .map(std::string::ToString::to_string)
        .collect()
}

/// Arguments encoding one still-image clip of exactly its duration.
fn clip_args(config: &VideoConfig, clip: &ClipSpec, out: &Path) -> Vec<String> {
    let fps = config.fps.to_string();
    let mut args = base_args();

    args.extend(["-loop".to_string(), "1".to_string(), "-framerate".to_string(), fps.clone()]);
    args.push("-i".to_string());
    args.push(path_arg(&clip.image));

    match &clip.audio {
        Some(audio) => {
            args.push("-i".to_string());
            args.push(path_arg(audio));
        }
        None => {
            // Silent track keeps every segment's stream layout identical.
            args.extend(["-f".to_string(), "lavfi".to_string(), "-i".to_string()]);
            args.push(format!(
                "anullsrc=channel_layout=stereo:sample_rate={}",
                SEGMENT_SAMPLE_RATE
            ));
        }
    }

    args.extend(["-map".to_string(), "0:v".to_string(), "-map".to_string(), "1:a".to_string()]);
    args.push("-t".to_string());
    args.push(format!("{:.3}", clip.duration));
    args.extend(["-r".to_string(), fps]);

    args.push("-c:v".to_string());
    args.push(config.video_codec.clone());
    if config.video_codec == "libx264" {
        args.extend(["-tune".to_string(), "stillimage".to_string()]);
    }
    args.extend([
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-vf".to_string(),
        "scale=trunc(iw/2)*2:trunc(ih/2)*2".to_string(),
    ]);

    args.push("-c:a".to_string());
    args.push(config.audio_codec.clone());
    args.extend([
        "-ar".to_string(),
        SEGMENT_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        "2".to_string(),
    ]);

    args.push(path_arg(out));
    args
}

/// Concat demuxer list file content.
fn concat_list(segments: &[PathBuf]) -> String {
    segments
        .iter()
        .map(|segment| format!("file '{}'\n", path_arg(segment).replace('\'', "'\\''")))
        .collect()
}

/// Arguments joining the listed segments without re-encoding.
fn concat_args(list: &Path, out: &Path) -> Vec<String> {
    let mut args = base_args();
    args.extend(
        ["-f", "concat", "-safe", "0", "-i"]
            .iter()
            .map(std::string::ToString::to_string),
    );
    args.push(path_arg(list));
    args.extend(["-c".to_string(), "copy".to_string()]);
    args.push(path_arg(out));
    args
}

/// Audio filter graph producing `[aout]` from the video's audio (input 0)
/// and the music (input 1).
fn music_filter(gain: f64, narrated: bool) -> String {
    if narrated {
        format!("[1:a]volume={gain}[bg];[0:a][bg]amix=inputs=2:duration=first:normalize=0[aout]")
    } else {
        format!("[1:a]volume={gain}[aout]")
    }
}

/// Arguments laying looped, attenuated music under the joined video.
fn music_mix_args(
    config: &VideoConfig,
    video: &Path,
    music: &Path,
    narrated: bool,
    total: f64,
    out: &Path,
) -> Vec<String> {
    let mut args = base_args();
    args.push("-i".to_string());
    args.push(path_arg(video));
    args.extend(["-stream_loop".to_string(), "-1".to_string(), "-i".to_string()]);
    args.push(path_arg(music));
    args.push("-filter_complex".to_string());
    args.push(music_filter(config.music_gain, narrated));
    args.extend(
        ["-map", "0:v", "-map", "[aout]", "-c:v", "copy", "-c:a"]
            .iter()
            .map(std::string::ToString::to_string),
    );
    args.push(config.audio_codec.clone());
    args.push("-t".to_string());
    args.push(format!("{:.3}", total));
    args.push(path_arg(out));
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Probes every file as `clip_secs` long and records the encoded plan.
    struct FakeEncoder {
        clip_secs: f64,
        encoded: RefCell<Option<VideoPlan>>,
    }

    impl FakeEncoder {
        fn new(clip_secs: f64) -> Self {
            Self {
                clip_secs,
                encoded: RefCell::new(None),
            }
        }
    }

    impl VideoEncoder for FakeEncoder {
        fn probe_duration(&self, _path: &Path) -> Result<f64> {
            Ok(self.clip_secs)
        }

        fn encode(&self, plan: &VideoPlan, out: &Path) -> Result<()> {
            std::fs::write(out, b"video")?;
            *self.encoded.borrow_mut() = Some(plan.clone());
            Ok(())
        }
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![touch(dir.path(), "a.png"), touch(dir.path(), "b.png")];
        let audio = vec![touch(dir.path(), "a.mp3")];

        let encoder = FakeEncoder::new(1.0);
        let result = make_video(
            &encoder,
            &images,
            &audio,
            None,
            &dir.path().join("video.mp4"),
            &VideoConfig::default(),
        );

        assert!(matches!(result, Err(Error::LengthMismatch { visuals: 2, audio: 1 })));
        assert!(encoder.encoded.borrow().is_none());
    }

    #[test]
    fn test_durations_follow_audio() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![touch(dir.path(), "1.png"), touch(dir.path(), "2.png")];
        let audio = vec![touch(dir.path(), "1.mp3"), dir.path().join("missing.mp3")];
        let out = dir.path().join("out").join("video.mp4");

        let encoder = FakeEncoder::new(2.5);
        let plan = make_video(&encoder, &images, &audio, None, &out, &VideoConfig::default()).unwrap();

        assert_eq!(plan.clips.len(), 2);
        assert_eq!(plan.clips[0].duration, 2.5);
        assert_eq!(plan.clips[0].audio.as_deref(), Some(audio[0].as_path()));
        assert_eq!(plan.clips[1].duration, 6.0);
        assert_eq!(plan.clips[1].audio, None);
        assert_eq!(plan.total_duration(), 8.5);
        assert!(plan.has_narration());
        assert!(out.is_file());
        assert_eq!(encoder.encoded.borrow().as_ref(), Some(&plan));
    }

    #[test]
    fn test_missing_music_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![touch(dir.path(), "1.png")];
        let audio = vec![touch(dir.path(), "1.mp3")];
        let encoder = FakeEncoder::new(1.0);
        let config = VideoConfig::default();

        let missing = dir.path().join("none.mp3");
        let plan = make_video(&encoder, &images, &audio, Some(missing.as_path()), &dir.path().join("a.mp4"), &config)
            .unwrap();
        assert_eq!(plan.music, None);

        let music = touch(dir.path(), "music.mp3");
        let plan = make_video(&encoder, &images, &audio, Some(music.as_path()), &dir.path().join("b.mp4"), &config)
            .unwrap();
        assert_eq!(plan.music, Some(music));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = FakeEncoder::new(1.0);
        let result = make_video(&encoder, &[], &[], None, &dir.path().join("v.mp4"), &VideoConfig::default());
        assert!(matches!(result, Err(Error::VideoError(_))));
    }

    fn ffmpeg_encoder() -> Option<FfmpegEncoder> {
        match FfmpegEncoder::new(VideoConfig::default()) {
            Ok(encoder) => Some(encoder),
            Err(e) => {
                eprintln!("skipping: {}", e);
                None
            }
        }
    }

    /// Write a sine tone of `secs` seconds.
    fn tone(encoder: &FfmpegEncoder, path: &Path, frequency: u32, secs: f64) {
        let mut args = base_args();
        args.extend(["-f".to_string(), "lavfi".to_string(), "-i".to_string()]);
        args.push(format!("sine=frequency={}:duration={}", frequency, secs));
        args.extend(["-c:a".to_string(), "aac".to_string()]);
        args.push(path_arg(path));
        run_tool(&encoder.ffmpeg, &args, Error::VideoError).unwrap();
    }

    fn card(path: &Path) {
        image::RgbImage::from_pixel(64, 36, image::Rgb([30, 60, 90])).save(path).unwrap();
    }

    /// Encode two narrated slides and compare the result with the plan.
    fn encode_two_slides(with_music: bool) {
        let Some(encoder) = ffmpeg_encoder() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let images = vec![dir.path().join("slide_01.png"), dir.path().join("slide_02.png")];
        for image in &images {
            card(image);
        }
        let audio = vec![dir.path().join("slide_01.m4a"), dir.path().join("slide_02.m4a")];
        tone(&encoder, &audio[0], 440, 1.0);
        tone(&encoder, &audio[1], 660, 1.5);

        let music = dir.path().join("music.m4a");
        if with_music {
            tone(&encoder, &music, 220, 0.7);
        }

        let out = dir.path().join("video.mp4");
        let plan = make_video(
            &encoder,
            &images,
            &audio,
            with_music.then_some(music.as_path()),
            &out,
            encoder.config(),
        )
        .unwrap();
        assert_eq!(plan.music.is_some(), with_music);

        let expected: f64 = audio.iter().map(|a| encoder.probe_duration(a).unwrap()).sum();
        assert_eq!(plan.total_duration(), expected);

        // Each segment may run up to one frame past its clip.
        let frame = 1.0 / f64::from(encoder.config().fps);
        let actual = encoder.probe_duration(&out).unwrap();
        assert!(
            (actual - expected).abs() <= frame * plan.clips.len() as f64,
            "video is {actual:.3}s, clips add up to {expected:.3}s"
        );
    }

    #[test]
    fn test_ffmpeg_video_matches_narration() {
        encode_two_slides(false);
    }

    #[test]
    fn test_ffmpeg_video_with_music() {
        encode_two_slides(true);
    }

    #[test]
    fn test_config_builder() {
        let config = VideoConfig::new().with_fps(30).with_default_duration(4.0).with_music_gain(0.2);
        assert_eq!(config.fps, 30);
        assert_eq!(config.default_duration, 4.0);
        assert_eq!(config.music_gain, 0.2);
        assert_eq!(config.video_codec, "libx264");
        assert_eq!(config.audio_codec, "aac");
    }

    #[test]
    fn test_parse_probe_duration() {
        let json = br#"{"format": {"filename": "a.mp3", "duration": "3.216000"}}"#;
        assert_eq!(parse_probe_duration(json), Ok(3.216));

        assert!(parse_probe_duration(br#"{"format": {}}"#).is_err());
        assert!(parse_probe_duration(b"not json").is_err());
    }

    #[test]
    fn test_clip_args_with_audio() {
        let clip = ClipSpec {
            image: PathBuf::from("slide_01.png"),
            audio: Some(PathBuf::from("slide_01.mp3")),
            duration: 2.5,
        };
        let args = clip_args(&VideoConfig::default(), &clip, Path::new("seg.mp4"));

        assert!(args.contains(&"slide_01.png".to_string()));
        assert!(args.contains(&"slide_01.mp3".to_string()));
        assert!(args.contains(&"2.500".to_string()));
        assert!(args.contains(&"stillimage".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("anullsrc")));
        assert_eq!(args.last().map(String::as_str), Some("seg.mp4"));
    }

    #[test]
    fn test_clip_args_silent() {
        let clip = ClipSpec {
            image: PathBuf::from("slide_02.png"),
            audio: None,
            duration: 6.0,
        };
        let args = clip_args(&VideoConfig::default().with_fps(30), &clip, Path::new("seg.mp4"));

        assert!(args.iter().any(|a| a.starts_with("anullsrc")));
        assert!(args.contains(&"6.000".to_string()));
        assert!(args.contains(&"30".to_string()));
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list(&[PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/it's.mp4")]);
        assert_eq!(list, "file '/tmp/a.mp4'\nfile '/tmp/it'\\''s.mp4'\n");
    }

    #[test]
    fn test_concat_args() {
        let args = concat_args(Path::new("list.txt"), Path::new("video.mp4"));
        assert!(args.contains(&"concat".to_string()));
        assert!(args.contains(&"copy".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("video.mp4"));
    }

    #[test]
    fn test_music_filter() {
        assert_eq!(
            music_filter(0.08, true),
            "[1:a]volume=0.08[bg];[0:a][bg]amix=inputs=2:duration=first:normalize=0[aout]"
        );
        assert_eq!(music_filter(0.08, false), "[1:a]volume=0.08[aout]");
    }

    #[test]
    fn test_music_mix_args() {
        let args = music_mix_args(
            &VideoConfig::default(),
            Path::new("joined.mp4"),
            Path::new("music.mp3"),
            true,
            8.5,
            Path::new("video.mp4"),
        );
        let loop_pos = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_pos + 1], "-1");
        assert_eq!(args[loop_pos + 3], "music.mp3");
        assert!(args.contains(&"8.500".to_string()));
        assert!(args.contains(&"[aout]".to_string()));
    }
}
