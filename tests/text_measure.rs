use pitchcraft_pdf::{Error, FontMetrics, Schema, TextMeasurer, parse, report_file_name};

const PARAGRAPH: &str = "Office workers lose twenty minutes every morning queueing for coffee \
that is roasted months before it is brewed, and nobody enjoys it.";

#[test]
fn wrapping_is_idempotent() {
    let font = FontMetrics::helvetica();
    let a = font.wrap_lines(PARAGRAPH, 180.0, 11.0).unwrap();
    let b = font.wrap_lines(PARAGRAPH, 180.0, 11.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(font.measure_wrapped_lines(PARAGRAPH, 180.0, 11.0).unwrap(), a.len());
}

#[test]
fn narrower_width_never_means_fewer_lines() {
    let font = FontMetrics::helvetica();
    let mut previous = 0;
    // no single word is wider than 80pt at 11pt, so nothing is split here
    for width in (80..=520).rev().step_by(20) {
        let count = font.measure_wrapped_lines(PARAGRAPH, width as f32, 11.0).unwrap();
        assert!(count >= previous, "width {width}: {count} < {previous}");
        previous = count;
    }
}

#[test]
fn wrapped_lines_keep_every_word() {
    let font = FontMetrics::helvetica();
    let lines = font.wrap_lines(PARAGRAPH, 150.0, 11.0).unwrap();
    assert!(lines.len() > 1);
    let rejoined = lines.join(" ");
    let words: Vec<&str> = PARAGRAPH.split_whitespace().collect();
    assert_eq!(rejoined.split_whitespace().collect::<Vec<_>>(), words);
    assert!(lines.len() <= words.len());
}

#[test]
fn hard_breaks_start_new_lines() {
    let font = FontMetrics::helvetica();
    let lines = font.wrap_lines("first\nsecond\nthird", 400.0, 11.0).unwrap();
    assert_eq!(lines, ["first", "second", "third"]);
}

#[test]
fn overlong_word_is_split_across_lines() {
    let font = FontMetrics::helvetica();
    let word = "x".repeat(200);
    let lines = font.wrap_lines(&word, 100.0, 11.0).unwrap();
    assert!(lines.len() > 1);
    assert_eq!(lines.concat(), word);
}

#[test]
fn blank_text_wraps_to_nothing() {
    let font = FontMetrics::helvetica();
    assert_eq!(font.measure_wrapped_lines("   \n  ", 200.0, 11.0).unwrap(), 0);
}

#[test]
fn invalid_font_size_or_width_is_an_error() {
    let font = FontMetrics::helvetica();
    assert!(matches!(font.wrap_lines("text", 200.0, 0.0), Err(Error::Measure(_))));
    assert!(matches!(font.wrap_lines("text", 200.0, f32::NAN), Err(Error::Measure(_))));
    assert!(matches!(font.wrap_lines("text", -1.0, 11.0), Err(Error::Measure(_))));
}

#[test]
fn garbage_font_data_is_rejected() {
    let err = FontMetrics::from_bytes(b"definitely not a font".to_vec(), 0).err();
    assert!(matches!(err, Some(Error::Font(_))));
}

#[test]
fn missing_font_file_is_an_io_error() {
    let err = FontMetrics::from_file(std::path::Path::new("/nonexistent/font.ttf"), 0).err();
    assert!(matches!(err, Some(Error::Io(_))));
}

#[test]
fn file_name_is_sanitized_startup_name() {
    let schema = Schema::pitch();
    let record = parse("Startup Name: Brew & Co.", &schema);
    assert_eq!(report_file_name(&record, &schema), "Brew___Co__PitchCraft_Report.pdf");

    let record = parse("Startup Name: **Zap**", &schema);
    assert_eq!(report_file_name(&record, &schema), "Zap_PitchCraft_Report.pdf");
}

#[test]
fn file_name_falls_back_without_startup_name() {
    let schema = Schema::pitch();
    for raw in ["", "Tagline: no name here", "Startup Name: Not provided"] {
        let record = parse(raw, &schema);
        assert_eq!(report_file_name(&record, &schema), "PitchCraft_Pitch_Report.pdf");
    }
}
