use std::collections::{HashMap, HashSet};
use std::path::Path;

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// Wraps text to a width without drawing it.
///
/// Implementations must be deterministic and safe to share between threads:
/// the renderer only ever reads from a measurer. Narrowing `max_width` must
/// never reduce the number of lines.
pub trait TextMeasurer: Sync {
    /// Greedy word wrap of `text` at `max_width` points. Embedded `\n` are
    /// hard breaks. Whitespace-only text wraps to no lines.
    fn wrap_lines(&self, text: &str, max_width: f32, font_size: f32) -> Result<Vec<String>, Error>;

    fn measure_wrapped_lines(&self, text: &str, max_width: f32, font_size: f32) -> Result<usize, Error> {
        Ok(self.wrap_lines(text, max_width, font_size)?.len())
    }
}

pub(crate) enum FontData {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl AsRef<[u8]> for FontData {
    fn as_ref(&self) -> &[u8] {
        match self {
            FontData::Owned(v) => v,
            FontData::Mapped(m) => m,
        }
    }
}

pub(crate) enum FontSource {
    /// Standard 14 Helvetica, WinAnsi encoded, never embedded.
    Helvetica,
    TrueType { data: FontData, face_index: u32 },
}

/// Where a font's advance widths come from, in 1000-units per em.
enum Advances {
    /// WinAnsi bytes 32..=255 of a standard font. Chars outside WinAnsi are not drawn.
    WinAnsi(Vec<f32>),
    /// Per-char widths read from a TrueType cmap; unmapped chars use `.notdef`.
    Cmap { widths: HashMap<char, f32>, notdef: f32 },
}

pub struct FontMetrics {
    name: String,
    advances: Advances,
    pub(crate) source: FontSource,
}

impl FontMetrics {
    pub fn helvetica() -> Self {
        Self {
            name: "Helvetica".into(),
            advances: Advances::WinAnsi(helvetica_widths()),
            source: FontSource::Helvetica,
        }
    }

    /// Metrics of an in-memory TrueType/OpenType font. The data is kept for embedding.
    pub fn from_bytes(data: Vec<u8>, face_index: u32) -> Result<Self, Error> {
        Self::from_data(FontData::Owned(data), face_index)
    }

    /// Memory-map a TrueType/OpenType file and read its metrics.
    pub fn from_file(path: &Path, face_index: u32) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        let data = unsafe { Mmap::map(&file) }?;
        Self::from_data(FontData::Mapped(data), face_index)
    }

    fn from_data(data: FontData, face_index: u32) -> Result<Self, Error> {
        let t0 = std::time::Instant::now();
        let face = Face::parse(data.as_ref(), face_index)
            .map_err(|e| Error::Font(format!("cannot parse font: {e}")))?;
        let units = face.units_per_em() as f32;
        if units <= 0.0 {
            return Err(Error::Font("font reports zero units per em".into()));
        }
        let advance = |gid: ttf_parser::GlyphId| {
            face.glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
        };

        let mut widths = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|cp| {
                    let Some(ch) = char::from_u32(cp) else {
                        return;
                    };
                    if let Some(w) = subtable.glyph_index(cp).and_then(advance) {
                        widths.entry(ch).or_insert(w);
                    }
                });
            }
        }
        if widths.is_empty() {
            return Err(Error::Font("font has no usable unicode metrics".into()));
        }

        let notdef = advance(ttf_parser::GlyphId(0)).unwrap_or(0.0);
        let name = font_family_name(&face).unwrap_or_else(|| "Embedded".into());

        log::debug!(
            "loaded font {name}: {} chars mapped in {:.1}ms",
            widths.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );

        Ok(Self {
            name,
            advances: Advances::Cmap { widths, notdef },
            source: FontSource::TrueType { data, face_index },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        match &self.advances {
            Advances::WinAnsi(table) => {
                char_to_winansi(ch).map_or(0.0, |byte| table[(byte - 32) as usize])
            }
            Advances::Cmap { widths, notdef } => widths.get(&ch).copied().unwrap_or(*notdef),
        }
    }

    fn has_glyph(&self, ch: char) -> bool {
        match &self.advances {
            Advances::WinAnsi(_) => char_to_winansi(ch).is_some(),
            Advances::Cmap { widths, .. } => widths.contains_key(&ch),
        }
    }

    /// Non-whitespace chars this font cannot draw, sorted and deduplicated.
    pub fn missing_chars(&self, chars: impl IntoIterator<Item = char>) -> Vec<char> {
        let mut missing: Vec<char> = chars
            .into_iter()
            .filter(|&ch| !ch.is_whitespace() && !self.has_glyph(ch))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    pub(crate) fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    /// Split a word wider than `max_width` into pieces that fit, one char minimum.
    fn break_word<'a>(&self, word: &'a str, max_width: f32, font_size: f32) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut width = 0.0f32;
        for (i, ch) in word.char_indices() {
            let cw = self.char_width_1000(ch) * font_size / 1000.0;
            if i > start && width + cw > max_width {
                pieces.push(&word[start..i]);
                start = i;
                width = 0.0;
            }
            width += cw;
        }
        pieces.push(&word[start..]);
        pieces
    }
}

impl TextMeasurer for FontMetrics {
    fn wrap_lines(&self, text: &str, max_width: f32, font_size: f32) -> Result<Vec<String>, Error> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(Error::Measure(format!("invalid font size {font_size}")));
        }
        if !max_width.is_finite() || max_width <= 0.0 {
            return Err(Error::Measure(format!("invalid wrap width {max_width}")));
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let space_w = self.space_width(font_size);
        let mut lines: Vec<String> = Vec::new();
        for hard_line in text.split('\n') {
            let mut current = String::new();
            let mut current_w = 0.0f32;
            for word in hard_line.split_whitespace() {
                let ww = self.word_width(word, font_size);
                let pieces = if ww > max_width {
                    self.break_word(word, max_width, font_size)
                } else {
                    vec![word]
                };
                for piece in pieces {
                    let pw = if piece.len() == word.len() {
                        ww
                    } else {
                        self.word_width(piece, font_size)
                    };
                    let proposed = if current.is_empty() {
                        pw
                    } else {
                        current_w + space_w + pw
                    };
                    if !current.is_empty() && proposed > max_width {
                        lines.push(std::mem::take(&mut current));
                        current_w = pw;
                    } else {
                        current_w = proposed;
                        if !current.is_empty() {
                            current.push(' ');
                        }
                    }
                    current.push_str(piece);
                }
            }
            lines.push(current);
        }
        Ok(lines)
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

/// Windows-1252 code points 0x80..=0x9F that differ from Latin-1.
const WINANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Printable WinAnsi byte for `ch`, if it has one.
fn char_to_winansi(ch: char) -> Option<u8> {
    match ch as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(ch as u8),
        _ => WINANSI_HIGH
            .iter()
            .find(|&&(_, c)| c == ch)
            .map(|&(byte, _)| byte),
    }
}

/// WinAnsi bytes for a PDF string; chars without a byte are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().filter_map(char_to_winansi).collect()
}

/// Big-endian 2-byte glyph IDs for an Identity-H CIDFont; unmapped chars become `.notdef`.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| char_to_gid.get(&ch).copied().unwrap_or(0).to_be_bytes())
        .collect()
}

/// Helvetica AFM widths for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0 - 9
    278, 278, 584, 584, 584, 556, 1015,                                             // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N - Z
    278, 278, 278, 469, 556, 333,                                                   // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n - z
    334, 260, 334, 584,                                                             // { - ~
];

/// Helvetica widths for WinAnsi bytes 32..=255. Accented Latin-1 letters use
/// the average lowercase width.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|byte| match byte {
            32..=126 => HELVETICA_ASCII[(byte - 32) as usize] as f32,
            0x85 | 0x97 | 0x99 => 1000.0,
            0x91 | 0x92 => 222.0,
            0x93 | 0x94 => 333.0,
            0x95 => 350.0,
            0xA0 => 278.0,
            _ => 556.0,
        })
        .collect()
}

/// Write the font objects for `metrics` under `font_ref`.
///
/// Helvetica is referenced as a standard Type1 font. TrueType data is subset to
/// `used_chars` and embedded as a Type0/CIDFont with Identity-H encoding; the
/// returned map translates chars to the subset's glyph IDs.
pub(crate) fn write_font(
    pdf: &mut Pdf,
    metrics: &FontMetrics,
    font_ref: Ref,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<Option<HashMap<char, u16>>, Error> {
    match &metrics.source {
        FontSource::Helvetica => {
            pdf.type1_font(font_ref)
                .base_font(Name(b"Helvetica"))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            Ok(None)
        }
        FontSource::TrueType { data, face_index } => embed_truetype(
            pdf,
            font_ref,
            &metrics.name,
            data.as_ref(),
            *face_index,
            used_chars,
            alloc,
        )
        .map(Some),
    }
}

fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<HashMap<char, u16>, Error> {
    let face = Face::parse(font_data, face_index)
        .map_err(|e| Error::Font(format!("cannot parse {font_name}: {e}")))?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    // Sort so glyph remapping (and therefore the output bytes) is deterministic.
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for ch in chars {
        let Some(gid) = face.glyph_index(ch) else {
            continue;
        };
        let new_gid = remapper.remap(gid.0);
        char_to_gid.insert(ch, new_gid);
        let w = face
            .glyph_hor_advance(gid)
            .map(|adv| adv as f32 / units * 1000.0)
            .unwrap_or(0.0);
        gid_widths.push((new_gid, w));
    }

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e} \u{2014} embedding full font");
        font_data.to_vec()
    });

    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| Error::Font(format!("{font_name} is too large to embed")))?;
    let descriptor_ref = alloc();
    let data_ref = alloc();
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };

    let cid_font_ref = alloc();
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    let mut pairs: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    pairs.sort_unstable();
    for (gid, ch) in pairs {
        cmap.pair(gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(char_to_gid)
}
