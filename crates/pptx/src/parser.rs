//! PPTX file parser implementation.
//!
//! Reads a deck back into per-slide text boxes and speaker notes, used to
//! inspect and verify generated decks.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use slidecast_core::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Text content of one slide in a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Text of each text box, top-to-bottom then left-to-right.
    /// Paragraphs inside a box are separated by newlines.
    pub texts: Vec<String>,

    /// Speaker notes, if the slide has a notes part.
    pub notes: Option<String>,
}

impl DeckSlide {
    /// Text of the topmost box.
    pub fn title(&self) -> Option<&str> {
        self.texts.first().map(String::as_str)
    }

    /// Paragraphs of every box below the title.
    pub fn body_lines(&self) -> Vec<&str> {
        self.texts
            .iter()
            .skip(1)
            .flat_map(|t| t.lines())
            .filter(|l| !l.trim().is_empty())
            .collect()
    }
}

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from disk.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<Vec<DeckSlide>> {
        let file = File::open(path.as_ref())?;
        self.parse(BufReader::new(file))
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Vec<DeckSlide>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        // Get the slide order from presentation.xml.rels
        let slide_order = self.get_slide_order(&mut archive)?;

        let mut slides = Vec::with_capacity(slide_order.len());
        for (idx, slide_path) in slide_order.iter().enumerate() {
            slides.push(self.parse_slide(&mut archive, slide_path, idx + 1)?);
        }

        Ok(slides)
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = self
            .parse_relationships(&rels_content)?
            .into_iter()
            .filter(|rel| rel.is_slide())
            .map(|rel| {
                // Order by the number in the rId, falling back to the target name
                let order_num = extract_slide_number(&rel.id).or_else(|| extract_slide_number(&rel.target));
                (resolve_target("ppt", &rel.target), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide and its notes from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<DeckSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;

        let mut shapes = self.extract_shapes_from_xml(&content)?;
        // Sort by position (top-to-bottom, left-to-right)
        shapes.sort_by(|a, b| a.y.cmp(&b.y).then(a.x.cmp(&b.x)));

        let notes = match self.find_notes_path(archive, slide_path)? {
            Some(notes_path) => {
                let notes_xml = self.read_file_from_archive(archive, &notes_path)?;
                let text = self
                    .extract_shapes_from_xml(&notes_xml)?
                    .into_iter()
                    .map(|s| s.text)
                    .collect::<Vec<_>>()
                    .join("\n");
                Some(text)
            }
            None => None,
        };

        Ok(DeckSlide {
            number: slide_number,
            texts: shapes.into_iter().map(|s| s.text).collect(),
            notes,
        })
    }

    /// Locate the notes part of a slide through the slide's relationships.
    fn find_notes_path<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Option<String>> {
        let (dir, file) = slide_path.rsplit_once('/').unwrap_or(("", slide_path));
        let rels_path = format!("{}/_rels/{}.rels", dir, file);

        if archive.by_name(&rels_path).is_err() {
            log::debug!("No relationships for {}", slide_path);
            return Ok(None);
        }

        let rels_content = self.read_file_from_archive(archive, &rels_path)?;
        Ok(self
            .parse_relationships(&rels_content)?
            .into_iter()
            .find(|rel| rel.rel_type.ends_with("/notesSlide"))
            .map(|rel| resolve_target(dir, &rel.target)))
    }

    /// Parse every `Relationship` element of a relationships part.
    fn parse_relationships(&self, xml_content: &str) -> Result<Vec<Relationship>> {
        let mut rels = Vec::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship::default();
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"Id" => rel.id = value,
                            _ => {}
                        }
                    }
                    rels.push(rel);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Extract text-bearing shapes with their positions from slide XML.
    fn extract_shapes_from_xml(&self, xml_content: &str) -> Result<Vec<ShapeInfo>> {
        let mut shapes = Vec::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut current_shape: Option<ShapeInfo> = None;
        let mut in_text_body = false;
        let mut in_paragraph = false;
        let mut current_text = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => current_shape = Some(ShapeInfo::default()),
                    b"txBody" => in_text_body = true,
                    b"p" if in_text_body => {
                        in_paragraph = true;
                        if !current_text.is_empty() {
                            current_text.push('\n');
                        }
                    }
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => {
                    if local_name(e.name().as_ref()) == b"off" {
                        if let Some(ref mut shape) = current_shape {
                            for attr in e.attributes().flatten() {
                                let value = String::from_utf8_lossy(&attr.value).parse::<i64>().ok();
                                match (attr.key.as_ref(), value) {
                                    (b"x", Some(x)) => shape.x = x,
                                    (b"y", Some(y)) => shape.y = y,
                                    _ => {}
                                }
                            }
                        }
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if in_paragraph {
                        let text = e.unescape().unwrap_or_default();
                        current_text.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => {
                        if let Some(mut shape) = current_shape.take() {
                            shape.text = current_text.trim().to_string();
                            if !shape.text.is_empty() {
                                shapes.push(shape);
                            }
                        }
                        current_text.clear();
                        in_text_body = false;
                        in_paragraph = false;
                    }
                    b"txBody" => in_text_body = false,
                    b"p" => in_paragraph = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::PptxParseError(format!("Malformed slide XML: {}", e)));
                }
                _ => {}
            }
        }

        Ok(shapes)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry of a relationships part.
#[derive(Debug, Default)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

impl Relationship {
    fn is_slide(&self) -> bool {
        self.rel_type.ends_with("/slide")
    }
}

/// Information about a shape extracted from XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    text: String,
    x: i64,
    y: i64,
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            other => parts.push(other),
        }
    }
    parts.join("/")
}
