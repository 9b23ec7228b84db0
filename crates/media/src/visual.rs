//! Slide card rendering.
//!
//! Each card is a fixed layout: an icon panel on the left holding a
//! shadowed circular emblem with the headline's initials, and a text column
//! on the right with the wrapped headline followed by the bullets.

use ab_glyph::{FontVec, PxScale};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use slidecast_core::{Error, Result, SlideItem};
use std::path::{Path, PathBuf};

/// Fonts tried, in order, when no explicit font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const ICON_PANEL: Rgb<u8> = Rgb([230, 240, 255]);
const EMBLEM: Rgb<u8> = Rgb([60, 130, 200]);
const EMBLEM_SHADOW: Rgb<u8> = Rgb([70, 80, 90]);
const INITIALS: Rgb<u8> = Rgb([255, 255, 255]);
const HEADLINE: Rgb<u8> = Rgb([18, 24, 38]);
const BULLET: Rgb<u8> = Rgb([60, 70, 85]);
const FALLBACK: Rgb<u8> = Rgb([240, 240, 240]);

/// Minimum wrap width in characters.
const MIN_WRAP_CHARS: usize = 10;

/// Canvas and font settings for slide cards.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualStyle {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    /// Explicit TrueType/OpenType font. When unset, common system fonts are tried.
    pub font_path: Option<PathBuf>,
}

impl Default for VisualStyle {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            background: [250, 250, 255],
            font_path: None,
        }
    }
}

impl VisualStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the card size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    /// Use a specific font file instead of system discovery.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Resolve the font for a card.
    ///
    /// An explicit font that cannot be loaded is an error. With no explicit
    /// font and no usable system font this returns `None`.
    fn load_font(&self) -> Result<Option<FontVec>> {
        if let Some(path) = &self.font_path {
            return load_font_file(path).map(Some);
        }

        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            match load_font_file(path) {
                Ok(font) => {
                    log::debug!("Using system font {}", candidate);
                    return Ok(Some(font));
                }
                Err(e) => log::debug!("Skipping {}: {}", candidate, e),
            }
        }

        Ok(None)
    }
}

fn load_font_file(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path)
        .map_err(|e| Error::FontError(format!("{}: {}", path.display(), e)))?;
    FontVec::try_from_vec(data).map_err(|e| Error::FontError(format!("{}: {}", path.display(), e)))
}

/// Draw one slide card and save it as PNG at `out`.
///
/// Parent directories are created. The image always has exactly the
/// style's dimensions, whatever the text.
pub fn compose_visual(headline: &str, bullets: &[String], out: &Path, style: &VisualStyle) -> Result<PathBuf> {
    check_size(style)?;
    let (w, h) = (style.width, style.height);

    let font = style.load_font()?;

    let mut img = RgbImage::from_pixel(w, h, Rgb(style.background));
    let (wf, hf) = (w as f32, h as f32);

    // Icon panel
    let icon_w = (wf * 0.35) as i32;
    let padding = 12.max((wf * 0.03) as i32);
    let (left, top, right, bottom) = (padding, padding, icon_w - padding, h as i32 - padding);
    if right > left && bottom > top {
        draw_filled_rect_mut(
            &mut img,
            Rect::at(left, top).of_size((right - left) as u32, (bottom - top) as u32),
            ICON_PANEL,
        );
    }

    // Emblem
    let (cx, cy) = ((left + right) / 2, (top + bottom) / 2);
    let radius = ((right - left).min(bottom - top).max(0) as f32 * 0.25) as i32;
    let shadow = 2.max((hf * 0.01) as i32);
    if radius > 0 {
        draw_filled_circle_mut(&mut img, (cx + shadow, cy + shadow), radius, EMBLEM_SHADOW);
        draw_filled_circle_mut(&mut img, (cx, cy), radius, EMBLEM);
    }

    let Some(font) = font else {
        // Text needs a font; the card keeps its shapes only.
        log::warn!("No usable font found, drawing {} without text", out.display());
        return save_card(&img, out);
    };

    let initials = initials(headline);
    if !initials.is_empty() {
        let scale = PxScale::from(hf * 0.07);
        let (tw, th) = text_size(scale, &font, &initials);
        draw_text_mut(
            &mut img,
            INITIALS,
            cx - tw as i32 / 2,
            cy - th as i32 / 2,
            scale,
            &font,
            &initials,
        );
    }

    // Text column
    let right_x = icon_w + padding;
    let right_w = (w as i32 - right_x - padding).max(0) as u32;

    let headline_scale = PxScale::from(hf * 0.08);
    let body_scale = PxScale::from(hf * 0.038);

    let mut y = padding;
    let headline_chars = wrap_width(right_w, char_width(&font, headline_scale));
    for line in wrap_text(headline, headline_chars) {
        draw_text_mut(&mut img, HEADLINE, right_x, y, headline_scale, &font, &line);
        y += (text_size(headline_scale, &font, &line).1 as f32 * 1.15) as i32;
    }

    y += (hf * 0.03) as i32;
    let body_chars = wrap_width(right_w, char_width(&font, body_scale));
    for bullet in bullets {
        for line in wrap_text(bullet, body_chars) {
            let text = format!("\u{2022} {}", line);
            draw_text_mut(&mut img, BULLET, right_x + 10, y, body_scale, &font, &text);
            y += (text_size(body_scale, &font, &line).1 as f32 * 1.3) as i32;
        }
    }

    save_card(&img, out)
}

/// Render one card per slide into `dir` as `slide_NN.png`.
///
/// A slide whose card cannot be drawn gets a plain fallback card of the
/// same size, so the result always has one path per item. A style with a
/// zero dimension is rejected before anything is written.
pub fn render_visuals(items: &[SlideItem], dir: &Path, style: &VisualStyle) -> Result<Vec<PathBuf>> {
    check_size(style)?;
    std::fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let out = dir.join(format!("slide_{:02}.png", idx + 1));
        if let Err(e) = compose_visual(&item.headline, &item.bullets, &out, style) {
            log::warn!("Slide {}: {}, using a blank card", idx + 1, e);
            let blank = RgbImage::from_pixel(style.width, style.height, FALLBACK);
            save_card(&blank, &out)?;
        }
        paths.push(out);
    }

    Ok(paths)
}

fn check_size(style: &VisualStyle) -> Result<()> {
    if style.width == 0 || style.height == 0 {
        return Err(Error::RenderError(format!(
            "invalid card size {}x{}",
            style.width, style.height
        )));
    }
    Ok(())
}

fn save_card(img: &RgbImage, out: &Path) -> Result<PathBuf> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(out, ImageFormat::Png)
        .map_err(|e| Error::RenderError(format!("{}: {}", out.display(), e)))?;
    Ok(out.to_path_buf())
}

/// Width of the glyph "a", used as the average character width.
fn char_width(font: &FontVec, scale: PxScale) -> u32 {
    text_size(scale, font, "a").0.max(1)
}

/// Characters per line for a column of `column_px` pixels.
fn wrap_width(column_px: u32, char_px: u32) -> usize {
    MIN_WRAP_CHARS.max((column_px / (char_px + 1)) as usize)
}

/// Greedy word wrap to lines of at most `max_chars` characters.
///
/// A single word longer than the limit gets a line of its own.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if current_len > 0 && current_len + 1 + len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += len;
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Up to two upper-cased initials from the headline's first two words.
pub fn initials(headline: &str) -> String {
    headline
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}
