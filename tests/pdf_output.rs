mod common;

use common::{SAMPLE_PITCH, pdf_page_count, section_with_lines};
use pitchcraft_pdf::{
    FontMetrics, PageGeometry, ReportChrome, Schema, Settings, convert_text_to_pdf,
    convert_text_to_pdf_bytes, parse, render, write_pdf,
};

fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn sample_pitch_produces_pdf() {
    setup();
    let bytes = convert_text_to_pdf_bytes(SAMPLE_PITCH, &Settings::default()).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(pdf_page_count(&bytes), 1);
}

#[test]
fn page_objects_match_rendered_pages() {
    setup();
    let settings = Settings::default();
    let raw = settings
        .schema
        .labels()
        .iter()
        .map(|l| section_with_lines(l, 20))
        .collect::<Vec<_>>()
        .join("\n");
    let record = parse(&raw, &settings.schema);
    let pages = render(
        &record,
        &settings.schema,
        &settings.geometry,
        &settings.body_font,
        &settings.chrome,
    )
    .unwrap();
    assert!(pages.len() > 1);

    let bytes = write_pdf(&pages, &settings.geometry, &settings.body_font).unwrap();
    assert_eq!(pdf_page_count(&bytes), pages.len());
}

#[test]
fn empty_input_still_writes_one_page() {
    let bytes = convert_text_to_pdf_bytes("", &Settings::default()).unwrap();
    assert_eq!(pdf_page_count(&bytes), 1);
}

#[test]
fn output_is_byte_for_byte_deterministic() {
    let settings = Settings {
        chrome: ReportChrome {
            generated_on: "October 19, 2026".into(),
            ..ReportChrome::default()
        },
        ..Settings::default()
    };
    let a = convert_text_to_pdf_bytes(SAMPLE_PITCH, &settings).unwrap();
    let b = convert_text_to_pdf_bytes(SAMPLE_PITCH, &settings).unwrap();
    assert_eq!(a, b);
}

#[test]
fn letter_pages_use_letter_media_box() {
    let settings = Settings {
        geometry: PageGeometry::default().with_page_size(PageGeometry::LETTER),
        ..Settings::default()
    };
    let bytes = convert_text_to_pdf_bytes(SAMPLE_PITCH, &settings).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/MediaBox [0 0 612"));
}

#[test]
fn writes_report_to_disk() {
    setup();
    let path = std::env::temp_dir().join(format!("pitchcraft-test-{}.pdf", std::process::id()));
    convert_text_to_pdf(SAMPLE_PITCH, &path, &Settings::default()).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn unwritable_output_reports_path() {
    let path = std::path::Path::new("/nonexistent-dir/report.pdf");
    let err = convert_text_to_pdf(SAMPLE_PITCH, path, &Settings::default()).unwrap_err();
    assert!(err.to_string().contains("/nonexistent-dir/report.pdf"));
}

#[test]
fn standard_fonts_are_referenced() {
    let schema = Schema::pitch();
    let record = parse(SAMPLE_PITCH, &schema);
    let g = PageGeometry::default();
    let font = FontMetrics::helvetica();
    let pages = render(&record, &schema, &g, &font, &ReportChrome::default()).unwrap();
    let bytes = write_pdf(&pages, &g, &font).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/BaseFont /Helvetica"));
    assert!(text.contains("/BaseFont /Helvetica-Bold"));
}
