#![allow(dead_code)]

use pitchcraft_pdf::{DrawInstruction, Error, Page, TextMeasurer};

/// Every character is `char_width` points wide, so line counts are easy to predict.
pub struct FixedMeasurer {
    pub char_width: f32,
}

impl FixedMeasurer {
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }
}

impl TextMeasurer for FixedMeasurer {
    fn wrap_lines(&self, text: &str, max_width: f32, _font_size: f32) -> Result<Vec<String>, Error> {
        if max_width <= 0.0 {
            return Err(Error::Measure(format!("invalid wrap width {max_width}")));
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let max_chars = ((max_width / self.char_width).floor() as usize).max(1);
        let mut lines = Vec::new();
        for hard_line in text.split('\n') {
            let mut current = String::new();
            for word in hard_line.split_whitespace() {
                let needed = if current.is_empty() {
                    word.chars().count()
                } else {
                    current.chars().count() + 1 + word.chars().count()
                };
                if !current.is_empty() && needed > max_chars {
                    lines.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
            lines.push(current);
        }
        Ok(lines)
    }
}

/// Measurer whose metrics are unusable.
pub struct BrokenMeasurer;

impl TextMeasurer for BrokenMeasurer {
    fn wrap_lines(&self, _text: &str, _max_width: f32, _font_size: f32) -> Result<Vec<String>, Error> {
        Err(Error::Measure("font has no metrics".into()))
    }
}

pub const SAMPLE_PITCH: &str = "\
Startup Name: Brew & Co.
Tagline: **Coffee**, delivered before you wake up
Elevator Pitch: A subscription service that roasts beans to order and ships them overnight.
Problem: Office workers waste time
queueing for mediocre coffee every morning.
Note: this line is commentary from the generator
Solution: Overnight delivery of freshly roasted beans.
Target Audience: Remote workers aged 25-45
Market Size: $45B specialty coffee market
Revenue Model: Monthly subscriptions
Landing Page Content: Wake up to coffee that was roasted yesterday.
";

/// Raw text with `label: first` followed by `extra` continuation lines.
pub fn section_with_lines(label: &str, extra: usize) -> String {
    let mut out = format!("{label}: first line");
    for i in 0..extra {
        out.push_str(&format!("\ncontinuation {i}"));
    }
    out
}

/// All text lines drawn on a page, in emission order.
pub fn page_texts(page: &Page) -> Vec<String> {
    page.instructions
        .iter()
        .filter_map(|ins| match ins {
            DrawInstruction::Text { lines, .. } => Some(lines.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

/// Index of the page whose text contains `needle`, for every page that does.
pub fn pages_containing(pages: &[Page], needle: &str) -> Vec<usize> {
    pages
        .iter()
        .enumerate()
        .filter(|(_, p)| page_texts(p).iter().any(|t| t == needle))
        .map(|(i, _)| i)
        .collect()
}

/// Number of page objects in a PDF produced by pdf-writer.
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    let needle = b"/Type /Page";
    bytes
        .windows(needle.len() + 1)
        .filter(|w| w.starts_with(needle) && w[needle.len()] != b's')
        .count()
}
