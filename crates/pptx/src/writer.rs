//! PPTX file writer implementation.

use crate::templates::{self, content_types, rel_types, NS_A, NS_P, NS_R};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use slidecast_core::{Error, Result, SlideItem};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// English Metric Units per inch.
const EMU_PER_INCH: f64 = 914_400.0;

/// Notes page size (portrait letter), in EMU.
const NOTES_WIDTH: i64 = 6_858_000;
const NOTES_HEIGHT: i64 = 9_144_000;

fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH).round() as i64
}

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Text insets of a text box, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Insets {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

/// Geometry and typography of generated slides.
#[derive(Debug, Clone)]
pub struct DeckLayout {
    /// Slide width in inches.
    pub width_in: f64,
    /// Slide height in inches.
    pub height_in: f64,
    /// Headline font size in points.
    pub title_font_pt: u32,
    /// Bullet font size in points.
    pub body_font_pt: u32,
}

impl Default for DeckLayout {
    fn default() -> Self {
        Self {
            width_in: 8.0,
            height_in: 4.5,
            title_font_pt: 32,
            body_font_pt: 18,
        }
    }
}

impl DeckLayout {
    const MARGIN_IN: f64 = 0.3;
    const TOP_IN: f64 = 0.2;
    const TITLE_HEIGHT_IN: f64 = 1.2;
    const GAP_IN: f64 = 0.15;
    const BOTTOM_IN: f64 = 0.4;

    /// Slide size in EMU.
    pub fn slide_size(&self) -> (i64, i64) {
        (inches(self.width_in), inches(self.height_in))
    }

    /// Full-width headline box at the top of the slide.
    pub fn title_frame(&self) -> Frame {
        Frame {
            x: inches(Self::MARGIN_IN),
            y: inches(Self::TOP_IN),
            cx: inches(self.width_in - 2.0 * Self::MARGIN_IN),
            cy: inches(Self::TITLE_HEIGHT_IN),
        }
    }

    /// Bullet box filling the rest of the slide below the headline.
    pub fn content_frame(&self) -> Frame {
        let top = Self::TOP_IN + Self::TITLE_HEIGHT_IN + Self::GAP_IN;
        Frame {
            x: inches(Self::MARGIN_IN),
            y: inches(top),
            cx: inches(self.width_in - 2.0 * Self::MARGIN_IN),
            cy: inches((self.height_in - top - Self::BOTTOM_IN).max(0.5)),
        }
    }
}

/// Writer producing a PPTX deck with one slide per slide item.
///
/// Each slide holds a headline text box, a bullet text box and speaker
/// notes. Rendered slide cards are not embedded.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    layout: DeckLayout,
}

impl PptxWriter {
    /// Create a writer with the default 8in x 4.5in layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom layout.
    pub fn with_layout(mut self, layout: DeckLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Write the deck to a file, creating parent directories.
    pub fn write<P: AsRef<Path>>(&self, items: &[SlideItem], path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut out = self.write_to(items, BufWriter::new(file))?;
        out.flush()?;

        log::info!("Wrote {} slides to {}", items.len(), path.display());
        Ok(path.to_path_buf())
    }

    /// Write the deck into any seekable writer and hand the writer back.
    pub fn write_to<W: Write + Seek>(&self, items: &[SlideItem], writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let count = items.len();

        add_part(&mut zip, "[Content_Types].xml", &content_types_xml(count)?)?;
        add_part(
            &mut zip,
            "_rels/.rels",
            &relationships_xml(&[(rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml".to_string())])?,
        )?;

        add_part(&mut zip, "ppt/presentation.xml", &self.presentation_xml(count)?)?;
        add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels_xml(count)?,
        )?;

        add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &templates::slide_master_xml())?;
        add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships_xml(&[
                (rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string()),
                (rel_types::THEME, "../theme/theme1.xml".to_string()),
            ])?,
        )?;
        add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &templates::slide_layout_xml())?;
        add_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships_xml(&[(
                rel_types::SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml".to_string(),
            )])?,
        )?;
        add_part(&mut zip, "ppt/notesMasters/notesMaster1.xml", &templates::notes_master_xml())?;
        add_part(
            &mut zip,
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &relationships_xml(&[(rel_types::THEME, "../theme/theme2.xml".to_string())])?,
        )?;
        add_part(&mut zip, "ppt/theme/theme1.xml", &templates::theme_xml())?;
        add_part(&mut zip, "ppt/theme/theme2.xml", &templates::theme_xml())?;

        for (idx, item) in items.iter().enumerate() {
            let n = idx + 1;
            log::debug!("Writing slide {}: {}", n, item.headline);

            add_part(&mut zip, &format!("ppt/slides/slide{n}.xml"), &self.slide_xml(item)?)?;
            add_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                &relationships_xml(&[
                    (rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string()),
                    (rel_types::NOTES_SLIDE, format!("../notesSlides/notesSlide{n}.xml")),
                ])?,
            )?;
            add_part(
                &mut zip,
                &format!("ppt/notesSlides/notesSlide{n}.xml"),
                &notes_slide_xml(&item.note)?,
            )?;
            add_part(
                &mut zip,
                &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
                &relationships_xml(&[
                    (rel_types::NOTES_MASTER, "../notesMasters/notesMaster1.xml".to_string()),
                    (rel_types::SLIDE, format!("../slides/slide{n}.xml")),
                ])?,
            )?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }

    /// The presentation part: masters, slide list and sizes.
    fn presentation_xml(&self, count: usize) -> Result<String> {
        let (cx, cy) = self.layout.slide_size();
        let mut w = XmlWriter::new()?;

        w.start("p:presentation", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;

        w.start("p:sldMasterIdLst", &[])?;
        let master_id = templates::SLIDE_MASTER_ID.to_string();
        let master_rel = format!("rId{}", count + 1);
        w.empty("p:sldMasterId", &[("id", &master_id), ("r:id", &master_rel)])?;
        w.end("p:sldMasterIdLst")?;

        w.start("p:notesMasterIdLst", &[])?;
        let notes_rel = format!("rId{}", count + 2);
        w.empty("p:notesMasterId", &[("r:id", &notes_rel)])?;
        w.end("p:notesMasterIdLst")?;

        if count > 0 {
            w.start("p:sldIdLst", &[])?;
            for idx in 0..count {
                let id = (256 + idx).to_string();
                let rel = format!("rId{}", idx + 1);
                w.empty("p:sldId", &[("id", &id), ("r:id", &rel)])?;
            }
            w.end("p:sldIdLst")?;
        }

        w.empty("p:sldSz", &[("cx", &cx.to_string()), ("cy", &cy.to_string())])?;
        w.empty(
            "p:notesSz",
            &[("cx", &NOTES_WIDTH.to_string()), ("cy", &NOTES_HEIGHT.to_string())],
        )?;

        w.end("p:presentation")?;
        w.finish()
    }

    /// A slide with headline and bullet text boxes.
    fn slide_xml(&self, item: &SlideItem) -> Result<String> {
        let mut w = XmlWriter::new()?;

        w.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
        w.start("p:cSld", &[])?;
        w.start("p:spTree", &[])?;
        group_properties(&mut w)?;

        let title_insets = Insets {
            left: inches(0.06),
            top: inches(0.02),
            right: inches(0.06),
            bottom: inches(0.02),
        };
        text_box(
            &mut w,
            2,
            "Title",
            self.layout.title_frame(),
            title_insets,
            &[item.headline.as_str()],
            self.layout.title_font_pt,
        )?;

        let content_insets = Insets {
            left: inches(0.06),
            top: inches(0.03),
            right: inches(0.06),
            bottom: inches(0.03),
        };
        let bullets: Vec<&str> = item.bullets.iter().map(String::as_str).collect();
        text_box(
            &mut w,
            3,
            "Content",
            self.layout.content_frame(),
            content_insets,
            &bullets,
            self.layout.body_font_pt,
        )?;

        w.end("p:spTree")?;
        w.end("p:cSld")?;
        w.start("p:clrMapOvr", &[])?;
        w.empty("a:masterClrMapping", &[])?;
        w.end("p:clrMapOvr")?;
        w.end("p:sld")?;
        w.finish()
    }
}

/// Thin wrapper over the quick-xml writer mapping errors into our Error type.
struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::new());
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { inner })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Start(elem)).map_err(xml_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Empty(elem)).map_err(xml_error)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|e| Error::XmlError(format!("Generated XML is not UTF-8: {}", e)))
    }
}

fn xml_error<E: std::fmt::Display>(e: E) -> Error {
    Error::XmlError(e.to_string())
}

/// Add one part to the archive.
fn add_part<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &str) -> Result<()> {
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, options)
        .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

/// `[Content_Types].xml` for a deck with `count` slides.
fn content_types_xml(count: usize) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start("Types", &[("xmlns", templates::NS_CONTENT_TYPES)])?;
    w.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", content_types::RELATIONSHIPS)],
    )?;
    w.empty("Default", &[("Extension", "xml"), ("ContentType", content_types::XML)])?;

    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".to_string(), content_types::PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), content_types::SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), content_types::SLIDE_LAYOUT),
        ("/ppt/notesMasters/notesMaster1.xml".to_string(), content_types::NOTES_MASTER),
        ("/ppt/theme/theme1.xml".to_string(), content_types::THEME),
        ("/ppt/theme/theme2.xml".to_string(), content_types::THEME),
    ];
    for n in 1..=count {
        overrides.push((format!("/ppt/slides/slide{n}.xml"), content_types::SLIDE));
        overrides.push((format!("/ppt/notesSlides/notesSlide{n}.xml"), content_types::NOTES_SLIDE));
    }
    for (part, content_type) in &overrides {
        w.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }

    w.end("Types")?;
    w.finish()
}

/// Relationship part with ids `rId1..` in the given order.
fn relationships_xml(rels: &[(&str, String)]) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start("Relationships", &[("xmlns", templates::NS_PACKAGE_RELS)])?;
    for (idx, (rel_type, target)) in rels.iter().enumerate() {
        let id = format!("rId{}", idx + 1);
        w.empty(
            "Relationship",
            &[("Id", &id), ("Type", rel_type), ("Target", target)],
        )?;
    }
    w.end("Relationships")?;
    w.finish()
}

/// Presentation relationships: slides first, then master, notes master and theme.
fn presentation_rels_xml(count: usize) -> Result<String> {
    let mut rels: Vec<(&str, String)> = (1..=count)
        .map(|n| (rel_types::SLIDE, format!("slides/slide{n}.xml")))
        .collect();
    rels.push((rel_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()));
    rels.push((rel_types::NOTES_MASTER, "notesMasters/notesMaster1.xml".to_string()));
    rels.push((rel_types::THEME, "theme/theme1.xml".to_string()));
    relationships_xml(&rels)
}

/// Non-visual group properties every shape tree starts with.
fn group_properties(w: &mut XmlWriter) -> Result<()> {
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;
    w.start("p:grpSpPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    w.end("a:xfrm")?;
    w.end("p:grpSpPr")?;
    Ok(())
}

/// A word-wrapping text box with one paragraph per entry.
fn text_box(
    w: &mut XmlWriter,
    id: u32,
    name: &str,
    frame: Frame,
    insets: Insets,
    paragraphs: &[&str],
    font_pt: u32,
) -> Result<()> {
    let size = (font_pt * 100).to_string();

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", &id.to_string()), ("name", name)])?;
    w.empty("p:cNvSpPr", &[("txBox", "1")])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvSpPr")?;

    w.start("p:spPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", &frame.x.to_string()), ("y", &frame.y.to_string())])?;
    w.empty("a:ext", &[("cx", &frame.cx.to_string()), ("cy", &frame.cy.to_string())])?;
    w.end("a:xfrm")?;
    w.start("a:prstGeom", &[("prst", "rect")])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")?;
    w.empty("a:noFill", &[])?;
    w.end("p:spPr")?;

    w.start("p:txBody", &[])?;
    w.start(
        "a:bodyPr",
        &[
            ("wrap", "square"),
            ("lIns", &insets.left.to_string()),
            ("tIns", &insets.top.to_string()),
            ("rIns", &insets.right.to_string()),
            ("bIns", &insets.bottom.to_string()),
            ("rtlCol", "0"),
        ],
    )?;
    w.empty("a:noAutofit", &[])?;
    w.end("a:bodyPr")?;
    w.empty("a:lstStyle", &[])?;

    let non_empty: Vec<&str> = paragraphs.iter().copied().filter(|p| !p.is_empty()).collect();
    if non_empty.is_empty() {
        w.start("a:p", &[])?;
        w.empty("a:endParaRPr", &[("lang", "en-US"), ("sz", &size)])?;
        w.end("a:p")?;
    }
    for text in non_empty {
        w.start("a:p", &[])?;
        w.start("a:r", &[])?;
        w.empty("a:rPr", &[("lang", "en-US"), ("sz", &size), ("dirty", "0")])?;
        w.start("a:t", &[])?;
        w.text(text)?;
        w.end("a:t")?;
        w.end("a:r")?;
        w.end("a:p")?;
    }

    w.end("p:txBody")?;
    w.end("p:sp")?;
    Ok(())
}

/// Notes slide carrying the speaker note in its body placeholder.
fn notes_slide_xml(note: &str) -> Result<String> {
    let mut w = XmlWriter::new()?;

    w.start("p:notes", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;
    group_properties(&mut w)?;

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "2"), ("name", "Notes Placeholder 1")])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &[("type", "body"), ("idx", "1")])?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.empty("p:spPr", &[])?;

    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    w.start("a:p", &[])?;
    if note.is_empty() {
        w.empty("a:endParaRPr", &[("lang", "en-US")])?;
    } else {
        w.start("a:r", &[])?;
        w.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
        w.start("a:t", &[])?;
        w.text(note)?;
        w.end("a:t")?;
        w.end("a:r")?;
    }
    w.end("a:p")?;
    w.end("p:txBody")?;
    w.end("p:sp")?;

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")?;
    w.end("p:notes")?;
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn item(headline: &str, bullets: &[&str], note: &str) -> SlideItem {
        SlideItem {
            headline: headline.to_string(),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
            note: note.to_string(),
        }
    }

    fn write_deck(items: &[SlideItem]) -> ZipArchive<Cursor<Vec<u8>>> {
        let cursor = PptxWriter::new().write_to(items, Cursor::new(Vec::new())).unwrap();
        ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }

    fn read_part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_default_layout_geometry() {
        let layout = DeckLayout::default();
        assert_eq!(layout.slide_size(), (7_315_200, 4_114_800));

        let title = layout.title_frame();
        assert_eq!((title.x, title.y), (274_320, 182_880));
        assert_eq!((title.cx, title.cy), (6_766_560, 1_097_280));

        let content = layout.content_frame();
        assert_eq!(content.y, 1_417_320);
        assert_eq!(content.cy, 2_331_720);
    }

    #[test]
    fn test_package_parts() {
        let mut archive = write_deck(&[
            item("One", &["a"], "first"),
            item("Two", &["b"], "second"),
        ]);

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/notesMasters/notesMaster1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/notesSlides/notesSlide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {name}");
        }
        assert!(archive.by_name("ppt/slides/slide3.xml").is_err());
    }

    #[test]
    fn test_every_part_is_well_formed() {
        let mut archive = write_deck(&[item("Q&A <draft>", &["x < y", "\"quoted\""], "a & b")]);
        let names: Vec<String> = archive.file_names().map(String::from).collect();

        for name in names {
            let content = read_part(&mut archive, &name);
            let mut reader = Reader::from_str(&content);
            loop {
                match reader.read_event() {
                    Ok(Event::Eof) => break,
                    Ok(_) => {}
                    Err(e) => panic!("{name} is malformed: {e}"),
                }
            }
        }
    }

    #[test]
    fn test_slide_content() {
        let mut archive = write_deck(&[item("Results", &["Up", "Down"], "Narrate me")]);
        let slide = read_part(&mut archive, "ppt/slides/slide1.xml");

        assert!(slide.contains("<a:t>Results</a:t>"));
        assert!(slide.contains("<a:t>Up</a:t>"));
        assert!(slide.contains("<a:t>Down</a:t>"));
        assert!(slide.contains(r#"sz="3200""#));
        assert!(slide.contains(r#"sz="1800""#));
        assert!(slide.contains(r#"wrap="square""#));
        assert!(!slide.contains("p:pic"));

        let notes = read_part(&mut archive, "ppt/notesSlides/notesSlide1.xml");
        assert!(notes.contains("<a:t>Narrate me</a:t>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut archive = write_deck(&[item("Q&A <draft>", &[], "")]);
        let slide = read_part(&mut archive, "ppt/slides/slide1.xml");

        assert!(slide.contains("Q&amp;A &lt;draft&gt;"));
    }

    #[test]
    fn test_presentation_lists_slides_in_order() {
        let mut archive = write_deck(&[item("A", &[], ""), item("B", &[], ""), item("C", &[], "")]);
        let presentation = read_part(&mut archive, "ppt/presentation.xml");
        let rels = read_part(&mut archive, "ppt/_rels/presentation.xml.rels");

        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId1"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="258" r:id="rId3"/>"#));
        assert!(presentation.contains(r#"<p:sldMasterId id="2147483648" r:id="rId4"/>"#));
        assert!(rels.contains(r#"Id="rId3""#));
        assert!(rels.contains("slides/slide3.xml"));
        assert!(rels.contains("slideMasters/slideMaster1.xml"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("slides.pptx");

        let written = PptxWriter::new()
            .write(&[item("Only", &["bullet"], "note")], &path)
            .unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }
}
