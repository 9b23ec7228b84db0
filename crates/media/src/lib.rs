//! Media stages of the pipeline: slide cards, narration, and the final video.
//!
//! Speech and video encoding sit behind the [`SpeechEngine`] and
//! [`VideoEncoder`] traits; the shipped implementations drive `espeak-ng`
//! and `ffmpeg` as external programs.

pub mod speech;
pub mod tools;
pub mod video;
pub mod visual;

pub use speech::{synthesize_texts, EspeakEngine, SpeechConfig, SpeechEngine};
pub use tools::find_tool;
pub use video::{make_video, ClipSpec, FfmpegEncoder, VideoConfig, VideoEncoder, VideoPlan};
pub use visual::{compose_visual, render_visuals, VisualStyle};
