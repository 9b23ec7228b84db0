//! End-to-end pipeline: PDF to sections, slides, deck, narration and video.

use anyhow::{Context, Result};
use slidecast_core::{SectionExtractor, SlideItem, Summarizer};
use slidecast_media::{
    make_video, render_visuals, synthesize_texts, SpeechEngine, VideoConfig, VideoEncoder, VisualStyle,
};
use slidecast_pdf::PdfReader;
use slidecast_pptx::{DeckLayout, PptxWriter};
use std::path::{Path, PathBuf};

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub outdir: PathBuf,
    /// Maximum number of sections turned into slides.
    pub slides: usize,
    pub music: Option<PathBuf>,
    pub style: VisualStyle,
    pub layout: DeckLayout,
    pub video: VideoConfig,
}

impl PipelineOptions {
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
            slides: 6,
            music: None,
            style: VisualStyle::default(),
            layout: DeckLayout::default(),
            video: VideoConfig::default(),
        }
    }

    pub fn with_slides(mut self, slides: usize) -> Self {
        self.slides = slides.max(1);
        self
    }

    pub fn with_music(mut self, music: impl Into<PathBuf>) -> Self {
        self.music = Some(music.into());
        self
    }

    pub fn with_style(mut self, style: VisualStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_video(mut self, video: VideoConfig) -> Self {
        self.video = video;
        self
    }
}

/// Slides, cards and deck, produced before any external tool is needed.
#[derive(Debug)]
pub struct Prepared {
    pub sections_found: usize,
    pub slides: Vec<SlideItem>,
    pub visuals: Vec<PathBuf>,
    pub pptx: PathBuf,
}

/// Files written by a run, aligned by slide.
#[derive(Debug)]
pub struct PipelineOutputs {
    pub sections_found: usize,
    pub slides: Vec<SlideItem>,
    pub visuals: Vec<PathBuf>,
    pub pptx: PathBuf,
    pub audio: Vec<PathBuf>,
    pub video: PathBuf,
    /// Length of the video in seconds.
    pub duration: f64,
}

/// Extract sections, summarize them, and write the cards and the deck.
pub fn prepare(input: &Path, options: &PipelineOptions) -> Result<Prepared> {
    std::fs::create_dir_all(&options.outdir)
        .with_context(|| format!("Failed to create output directory: {}", options.outdir.display()))?;

    let reader =
        PdfReader::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let pages = reader.pages();
    log::debug!("Read {} pages from {}", pages.len(), input.display());

    let sections = SectionExtractor::new().extract(&pages)?;
    let sections_found = sections.len();
    log::debug!("Found {} sections, using up to {}", sections_found, options.slides);

    let summarizer = Summarizer::new();
    let slides: Vec<SlideItem> = sections
        .iter()
        .take(options.slides)
        .map(|section| summarizer.make_slide_text(section))
        .collect();

    let visuals = render_visuals(&slides, &options.outdir.join("visuals"), &options.style)?;

    let pptx = PptxWriter::new()
        .with_layout(options.layout.clone())
        .write(&slides, options.outdir.join("slides.pptx"))
        .context("Failed to write slide deck")?;

    Ok(Prepared {
        sections_found,
        slides,
        visuals,
        pptx,
    })
}

/// Narrate the prepared slides and assemble the video.
///
/// The speech engine and video encoder are supplied by the caller, which
/// owns their setup and teardown.
pub fn narrate(
    prepared: Prepared,
    options: &PipelineOptions,
    speech: &mut dyn SpeechEngine,
    encoder: &dyn VideoEncoder,
) -> Result<PipelineOutputs> {
    let texts: Vec<&str> = prepared.slides.iter().map(SlideItem::narration).collect();
    let audio = synthesize_texts(speech, &texts, &options.outdir.join("tts"))
        .context("Failed to synthesize narration")?;

    let video = options.outdir.join("video.mp4");
    let plan = make_video(
        encoder,
        &prepared.visuals,
        &audio,
        options.music.as_deref(),
        &video,
        &options.video,
    )
    .context("Failed to assemble video")?;

    Ok(PipelineOutputs {
        sections_found: prepared.sections_found,
        slides: prepared.slides,
        visuals: prepared.visuals,
        pptx: prepared.pptx,
        audio,
        video,
        duration: plan.total_duration(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use slidecast_core::Error;
    use slidecast_media::VideoPlan;
    use slidecast_pptx::PptxParser;

    fn run(
        input: &Path,
        options: &PipelineOptions,
        speech: &mut dyn SpeechEngine,
        encoder: &dyn VideoEncoder,
    ) -> Result<PipelineOutputs> {
        narrate(prepare(input, options)?, options, speech, encoder)
    }

    struct FakeSpeech;

    impl SpeechEngine for FakeSpeech {
        fn synthesize(&mut self, text: &str, out: &Path) -> slidecast_core::Result<()> {
            std::fs::write(out, text)?;
            Ok(())
        }
    }

    struct FakeEncoder;

    impl VideoEncoder for FakeEncoder {
        fn probe_duration(&self, _path: &Path) -> slidecast_core::Result<f64> {
            Ok(3.0)
        }

        fn encode(&self, plan: &VideoPlan, out: &Path) -> slidecast_core::Result<()> {
            std::fs::write(out, format!("{} clips", plan.clips.len()))?;
            Ok(())
        }
    }

    /// One text object per line.
    fn line_objects(lines: &[&str]) -> Vec<Operation> {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new(
                "Td",
                vec![72.into(), (720 - 20 * i as i64).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        operations
    }

    /// One text object per page, lines advanced with `Td`.
    fn single_object(lines: &[&str]) -> Vec<Operation> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-20).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));
        operations
    }

    fn write_pdf(path: &Path, pages: &[&[&str]]) {
        write_pdf_with(path, pages, line_objects);
    }

    fn write_pdf_with(path: &Path, pages: &[&[&str]], layout: fn(&[&str]) -> Vec<Operation>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let operations = layout(lines);
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    const THREE_SECTIONS: &[&[&str]] = &[
        &[
            "INTRODUCTION",
            "the pipeline reads every page of the document and collects the text.",
            "each heading starts a new section of the slide deck.",
        ],
        &[
            "METHODS",
            "sentences are ranked by the frequency of the words they contain.",
            "the best sentences become the bullets and the speaker note.",
        ],
        &[
            "RESULTS",
            "every slide gets a rendered card and a narration clip of its own.",
            "the clips are joined into one video with the cards as frames.",
        ],
    ];

    fn three_section_pdf(path: &Path) {
        write_pdf(path, THREE_SECTIONS);
    }

    #[test]
    fn test_three_pages_two_slides() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("paper.pdf");
        three_section_pdf(&pdf);

        let outdir = dir.path().join("output");
        let options = PipelineOptions::new(&outdir)
            .with_slides(2)
            .with_style(VisualStyle::new().with_size(320, 180));

        let outputs = run(&pdf, &options, &mut FakeSpeech, &FakeEncoder).unwrap();

        assert_eq!(outputs.sections_found, 3);
        assert_eq!(outputs.slides.len(), 2);
        assert_eq!(outputs.slides[0].headline, "INTRODUCTION");
        assert_eq!(outputs.slides[1].headline, "METHODS");

        assert_eq!(
            outputs.visuals,
            vec![
                outdir.join("visuals").join("slide_01.png"),
                outdir.join("visuals").join("slide_02.png"),
            ]
        );
        assert!(outputs.visuals.iter().all(|p| p.is_file()));

        assert_eq!(
            outputs.audio,
            vec![outdir.join("tts").join("slide_01.mp3"), outdir.join("tts").join("slide_02.mp3")]
        );
        assert!(outputs.audio.iter().all(|p| p.is_file()));

        assert_eq!(outputs.pptx, outdir.join("slides.pptx"));
        let deck = PptxParser::new().open(&outputs.pptx).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck[0].title(), Some("INTRODUCTION"));
        assert_eq!(deck[1].title(), Some("METHODS"));
        assert_eq!(deck[0].notes.as_deref(), Some(outputs.slides[0].note.as_str()));

        assert_eq!(outputs.video, outdir.join("video.mp4"));
        assert_eq!(std::fs::read_to_string(&outputs.video).unwrap(), "2 clips");
        assert_eq!(outputs.duration, 6.0);
    }

    #[test]
    fn test_narration_follows_notes() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("paper.pdf");
        three_section_pdf(&pdf);

        let options = PipelineOptions::new(dir.path().join("out"))
            .with_style(VisualStyle::new().with_size(320, 180));
        let outputs = run(&pdf, &options, &mut FakeSpeech, &FakeEncoder).unwrap();

        assert_eq!(outputs.slides.len(), 3);
        for (slide, audio) in outputs.slides.iter().zip(&outputs.audio) {
            assert!(!slide.note.is_empty());
            assert_eq!(std::fs::read_to_string(audio).unwrap(), slide.note);
        }
    }

    #[test]
    fn test_no_sections_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("blank.pdf");
        write_pdf(&pdf, &[&[]]);

        let outdir = dir.path().join("out");
        let err = run(&pdf, &PipelineOptions::new(&outdir), &mut FakeSpeech, &FakeEncoder).unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NoSections)));
        assert!(!outdir.join("slides.pptx").exists());
    }

    #[test]
    fn test_single_text_object_pages() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("paper.pdf");
        write_pdf_with(&pdf, THREE_SECTIONS, single_object);

        let options = PipelineOptions::new(dir.path().join("out"))
            .with_style(VisualStyle::new().with_size(320, 180));
        let outputs = run(&pdf, &options, &mut FakeSpeech, &FakeEncoder).unwrap();

        assert_eq!(outputs.sections_found, 3);
        let headlines: Vec<&str> = outputs.slides.iter().map(|s| s.headline.as_str()).collect();
        assert_eq!(headlines, vec!["INTRODUCTION", "METHODS", "RESULTS"]);
    }

    #[test]
    fn test_prepare_writes_deck_without_engines() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("paper.pdf");
        three_section_pdf(&pdf);

        let outdir = dir.path().join("out");
        let options = PipelineOptions::new(&outdir).with_style(VisualStyle::new().with_size(320, 180));
        let prepared = prepare(&pdf, &options).unwrap();

        assert_eq!(prepared.slides.len(), 3);
        assert!(prepared.pptx.is_file());
        assert!(prepared.visuals.iter().all(|p| p.is_file()));
        assert!(!outdir.join("tts").exists());
        assert!(!outdir.join("video.mp4").exists());
    }

    #[test]
    fn test_no_sections_fails_before_narration() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("blank.pdf");
        write_pdf(&pdf, &[&[]]);

        let err = prepare(&pdf, &PipelineOptions::new(dir.path().join("out"))).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NoSections)));
    }

    #[test]
    fn test_slide_count_is_at_least_one() {
        assert_eq!(PipelineOptions::new("out").with_slides(0).slides, 1);
        assert_eq!(PipelineOptions::new("out").slides, 6);
    }
}
