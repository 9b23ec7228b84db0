//! Line-preserving text extraction from page content streams.
//!
//! Shown strings are placed on visual lines by following the text matrix:
//! a vertical move starts a new line, a horizontal move or a new text
//! object inserts a space.

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;

/// TJ adjustment (thousandths of text space) treated as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Fraction of the font size a baseline may shift without starting a new line.
const BASELINE_TOLERANCE: f32 = 0.3;

/// Text matrix; only the parts needed to locate baselines.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn vertical_scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// Accumulates shown text into newline-separated lines.
#[derive(Debug, Default)]
struct LineBuilder {
    out: String,
    baseline: Option<f32>,
    gap: bool,
    force_break: bool,
}

impl LineBuilder {
    fn mark_gap(&mut self) {
        self.gap = true;
    }

    fn break_line(&mut self) {
        self.force_break = true;
    }

    fn push(&mut self, text: &str, baseline: f32, tolerance: f32) {
        if text.is_empty() {
            return;
        }

        let moved = self
            .baseline
            .map_or(false, |prev| (prev - baseline).abs() > tolerance);
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            if moved || self.force_break {
                let trimmed = self.out.trim_end_matches(' ').len();
                self.out.truncate(trimmed);
                self.out.push('\n');
            } else if self.gap && !self.out.ends_with(' ') && !text.starts_with(' ') {
                self.out.push(' ');
            }
        }

        self.out.push_str(text);
        self.baseline = Some(baseline);
        self.gap = false;
        self.force_break = false;
    }

    fn finish(mut self) -> String {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}

/// Extract one page's text with one visual line per text line.
pub(crate) fn page_lines(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| match font.get_font_encoding(doc) {
            Ok(encoding) => Some((name, encoding)),
            Err(e) => {
                log::debug!("Font {}: no usable encoding ({})", String::from_utf8_lossy(&name), e);
                None
            }
        })
        .collect();

    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut matrix = TextMatrix::default();
    let mut leading = 0.0_f32;
    let mut font_size = 12.0_f32;
    let mut encoding: Option<&Encoding> = None;
    let mut lines = LineBuilder::default();

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                matrix = TextMatrix::default();
                lines.mark_gap();
            }
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| encodings.get(name));
                if let Some(size) = operands.get(1).and_then(number) {
                    font_size = size;
                }
            }
            "TL" => {
                if let Some(value) = operands.first().and_then(number) {
                    leading = value;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    if op.operator == "TD" {
                        leading = -ty;
                    }
                    matrix.translate(tx, ty);
                    lines.mark_gap();
                }
            }
            "Tm" => {
                let values: Vec<f32> = operands.iter().filter_map(number).collect();
                if let &[a, b, c, d, e, f] = values.as_slice() {
                    matrix = TextMatrix { a, b, c, d, e, f };
                    lines.mark_gap();
                }
            }
            "T*" => {
                matrix.translate(0.0, -leading);
                lines.break_line();
            }
            "Tj" | "TJ" => {
                let text = show_text(encoding, operands);
                lines.push(&text, matrix.f, tolerance(font_size, &matrix));
            }
            "'" | "\"" => {
                matrix.translate(0.0, -leading);
                lines.break_line();
                let shown = if op.operator == "'" { operands.first() } else { operands.get(2) };
                if let Some(shown) = shown {
                    let text = show_text(encoding, std::slice::from_ref(shown));
                    lines.push(&text, matrix.f, tolerance(font_size, &matrix));
                }
            }
            _ => {}
        }
    }

    Ok(lines.finish())
}

fn tolerance(font_size: f32, matrix: &TextMatrix) -> f32 {
    (font_size * matrix.vertical_scale() * BASELINE_TOLERANCE).max(1.0)
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode the operands of a text-showing operator.
fn show_text(encoding: Option<&Encoding>, operands: &[Object]) -> String {
    let mut text = String::new();
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&decode(encoding, bytes)),
            Object::Array(items) => {
                for item in items {
                    match item {
                        Object::String(bytes, _) => text.push_str(&decode(encoding, bytes)),
                        other => {
                            let adjustment = number(other).map_or(0.0, |n| -n);
                            if adjustment > TJ_SPACE_THRESHOLD && !text.is_empty() && !text.ends_with(' ') {
                                text.push(' ');
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn decode(encoding: Option<&Encoding>, bytes: &[u8]) -> String {
    encoding
        .and_then(|enc| Document::decode_text(enc, bytes).ok())
        .unwrap_or_else(|| bytes.iter().map(|&b| char::from(b)).collect())
}
