use std::collections::{HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{FontMetrics, encode_as_gids, to_winansi_bytes, write_font};
use crate::model::{Color, DrawInstruction, FontWeight, Page, PageGeometry};

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

/// Bezier control-point distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// How text of each weight is encoded in content streams.
struct FontEncoders {
    regular_gids: Option<HashMap<char, u16>>,
}

impl FontEncoders {
    fn encode(&self, weight: FontWeight, text: &str) -> Vec<u8> {
        match (weight, &self.regular_gids) {
            (FontWeight::Regular, Some(map)) => encode_as_gids(text, map),
            _ => to_winansi_bytes(text),
        }
    }
}

/// Characters drawn in `weight` across all pages.
fn text_chars(pages: &[Page], weight: FontWeight) -> HashSet<char> {
    pages
        .iter()
        .flat_map(|p| p.instructions.iter())
        .filter_map(|ins| match ins {
            DrawInstruction::Text { lines, style, .. } if style.weight == weight => Some(lines),
            _ => None,
        })
        .flat_map(|lines| lines.iter().flat_map(|l| l.chars()))
        .collect()
}

fn warn_missing(font: &FontMetrics, used: &HashSet<char>, role: &str) {
    let missing = font.missing_chars(used.iter().copied());
    if !missing.is_empty() {
        let sample: String = missing.iter().take(10).collect();
        log::warn!(
            "{} cannot draw {} character(s) of the {role} text ({sample:?}); they will not render",
            font.name(),
            missing.len(),
        );
    }
}

fn set_fill(content: &mut Content, color: Color) {
    let [r, g, b] = color.to_rgb_f32();
    content.set_fill_rgb(r, g, b);
}

fn set_stroke(content: &mut Content, color: Color) {
    let [r, g, b] = color.to_rgb_f32();
    content.set_stroke_rgb(r, g, b);
}

/// Append a (possibly rounded) rectangle path. `y` is the bottom edge in PDF space.
fn rect_path(content: &mut Content, x: f32, y: f32, w: f32, h: f32, radius: f32) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if r <= 0.0 {
        content.rect(x, y, w, h);
        return;
    }
    let k = KAPPA * r;
    content.move_to(x + r, y);
    content.line_to(x + w - r, y);
    content.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    content.line_to(x + w, y + h - r);
    content.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    content.line_to(x + r, y + h);
    content.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    content.line_to(x, y + r);
    content.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    content.close_path();
}

fn render_page(page: &Page, page_height: f32, fonts: &FontEncoders) -> Content {
    let mut content = Content::new();
    for ins in &page.instructions {
        match ins {
            DrawInstruction::PageBreak => {}
            &DrawInstruction::FillRect {
                x,
                y,
                width,
                height,
                radius,
                color,
            } => {
                content.save_state();
                set_fill(&mut content, color);
                rect_path(&mut content, x, page_height - y - height, width, height, radius);
                content.fill_nonzero();
                content.restore_state();
            }
            &DrawInstruction::StrokeRect {
                x,
                y,
                width,
                height,
                radius,
                color,
                line_width,
            } => {
                content.save_state();
                set_stroke(&mut content, color);
                content.set_line_width(line_width);
                rect_path(&mut content, x, page_height - y - height, width, height, radius);
                content.stroke();
                content.restore_state();
            }
            DrawInstruction::Text {
                x,
                y,
                lines,
                line_height,
                style,
            } => {
                if lines.iter().all(|l| l.is_empty()) {
                    continue;
                }
                let font = match style.weight {
                    FontWeight::Regular => REGULAR_FONT,
                    FontWeight::Bold => BOLD_FONT,
                };
                content.save_state();
                set_fill(&mut content, style.color);
                content.begin_text();
                content.set_font(Name(font), style.size);
                content.next_line(*x, page_height - *y);
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        content.next_line(0.0, -*line_height);
                    }
                    content.show(Str(&fonts.encode(style.weight, line)));
                }
                content.end_text();
                content.restore_state();
            }
        }
    }
    content
}

/// Serialize rendered pages into a PDF document.
///
/// Regular-weight text uses `body_font` (embedded and subset when it is a
/// TrueType font); bold text uses the standard Helvetica-Bold.
pub fn write_pdf(pages: &[Page], geometry: &PageGeometry, body_font: &FontMetrics) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let regular_ref = alloc();
    let bold_ref = alloc();

    let mut used = text_chars(pages, FontWeight::Regular);
    warn_missing(body_font, &used, "body");
    warn_missing(&FontMetrics::helvetica(), &text_chars(pages, FontWeight::Bold), "bold");
    used.insert(' ');
    let regular_gids = write_font(&mut pdf, body_font, regular_ref, &used, &mut alloc)?;
    pdf.type1_font(bold_ref)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    let fonts = FontEncoders { regular_gids };
    let t_fonts = t0.elapsed();

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let raw = render_page(page, geometry.page_height, &fonts).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        resources
            .fonts()
            .pair(Name(REGULAR_FONT), regular_ref)
            .pair(Name(BOLD_FONT), bold_ref);
    }

    let bytes = pdf.finish();
    log::info!(
        "PDF phases: fonts={:.1}ms, pages={:.1}ms ({n} pages, {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_fonts).as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}
