mod common;

use std::path::PathBuf;

use common::{SAMPLE_PITCH, pdf_page_count};
use pitchcraft_pdf::{FontMetrics, Settings, TextMeasurer, convert_text_to_pdf_bytes};

const MONO_TTF: &[u8] = include_bytes!("fixtures/DejaVuSansMono.ttf");

const ACCENTED: &str = "Problem: café ünïcode \u{2014} 東京 text";

fn mono() -> FontMetrics {
    FontMetrics::from_bytes(MONO_TTF.to_vec(), 0).unwrap()
}

fn mono_settings() -> Settings {
    Settings {
        body_font: mono(),
        ..Settings::default()
    }
}

fn repeated_words(word: &str, count: usize) -> String {
    vec![word; count].join(" ")
}

#[test]
fn family_name_comes_from_name_table() {
    assert_eq!(mono().name(), "DejaVu Sans Mono");
}

#[test]
fn file_and_bytes_give_same_metrics() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
    let mapped = FontMetrics::from_file(&path, 0).unwrap();
    let owned = mono();
    let text = repeated_words("measure", 30);
    assert_eq!(
        mapped.wrap_lines(&text, 120.0, 11.0).unwrap(),
        owned.wrap_lines(&text, 120.0, 11.0).unwrap()
    );
}

#[test]
fn cmap_widths_replace_helvetica_widths() {
    let narrow = repeated_words("iiiiiiiiii", 20);
    let wide = repeated_words("mmmmmmmmmm", 20);

    // monospaced: every glyph has the same advance
    let font = mono();
    let n = font.measure_wrapped_lines(&narrow, 150.0, 11.0).unwrap();
    let w = font.measure_wrapped_lines(&wide, 150.0, 11.0).unwrap();
    assert_eq!(n, w);
    assert_eq!(n, 10);

    let helvetica = FontMetrics::helvetica();
    let n = helvetica.measure_wrapped_lines(&narrow, 150.0, 11.0).unwrap();
    let w = helvetica.measure_wrapped_lines(&wide, 150.0, 11.0).unwrap();
    assert!(n < w, "helvetica i ({n} lines) should be narrower than m ({w} lines)");
}

#[test]
fn missing_chars_follow_the_font() {
    let text = "café ünïcode \u{2014} 東京";
    assert_eq!(FontMetrics::helvetica().missing_chars(text.chars()), ['京', '東']);
    assert_eq!(mono().missing_chars(text.chars()), ['京', '東']);
    assert!(mono().missing_chars("Ωmega".chars()).is_empty());
    assert_eq!(FontMetrics::helvetica().missing_chars("Ωmega".chars()), ['Ω']);
    assert!(FontMetrics::helvetica().missing_chars("\u{20ac}5 \u{2122} \u{201c}x\u{201d}".chars()).is_empty());
}

#[test]
fn truetype_body_font_is_embedded_as_cid_font() {
    let _ = env_logger::builder().is_test(true).try_init();
    let bytes = convert_text_to_pdf_bytes(ACCENTED, &mono_settings()).unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(pdf_page_count(&bytes), 1);
    assert!(text.contains("/Type0"));
    assert!(text.contains("/Identity-H"));
    assert!(text.contains("/ToUnicode"));
    assert!(text.contains("/FontFile2"));
    assert!(text.contains("/BaseFont /DejaVuSansMono"));
    // bold text stays on the standard font
    assert!(text.contains("/BaseFont /Helvetica-Bold"));
}

#[test]
fn embedded_font_is_subset() {
    let bytes = convert_text_to_pdf_bytes(SAMPLE_PITCH, &mono_settings()).unwrap();
    assert!(
        bytes.len() < MONO_TTF.len() / 2,
        "{} byte PDF suggests the full {} byte font was embedded",
        bytes.len(),
        MONO_TTF.len()
    );
}

#[test]
fn embedded_output_is_deterministic() {
    let a = convert_text_to_pdf_bytes(ACCENTED, &mono_settings()).unwrap();
    let b = convert_text_to_pdf_bytes(ACCENTED, &mono_settings()).unwrap();
    assert_eq!(a, b);

    let a = convert_text_to_pdf_bytes(SAMPLE_PITCH, &mono_settings()).unwrap();
    let b = convert_text_to_pdf_bytes(SAMPLE_PITCH, &mono_settings()).unwrap();
    assert_eq!(a, b);
}
