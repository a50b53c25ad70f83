mod error;
mod fonts;
mod layout;
mod model;
mod parser;
mod pdf;
mod render;
mod schema;

pub use error::Error;
pub use fonts::{FontMetrics, TextMeasurer};
pub use layout::{Layout, PlacedBox, Placement, box_height, layout};
pub use model::{Color, DrawInstruction, FontWeight, Page, PageGeometry, ReportChrome, TextStyle};
pub use parser::{Record, clean_text, parse};
pub use pdf::write_pdf;
pub use render::{draw, render};
pub use schema::{NOT_PROVIDED, Schema};

use std::path::Path;
use std::time::Instant;

const STARTUP_NAME: &str = "Startup Name";
const FALLBACK_FILE_NAME: &str = "PitchCraft_Pitch_Report.pdf";

/// Everything that stays fixed between reports.
///
/// `Settings::default()` leaves `chrome.generated_on` empty, so the footer
/// has no date line until one is set.
pub struct Settings {
    pub schema: Schema,
    pub geometry: PageGeometry,
    pub chrome: ReportChrome,
    /// Measures and draws all regular-weight text.
    pub body_font: FontMetrics,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema: Schema::pitch(),
            geometry: PageGeometry::default(),
            chrome: ReportChrome::default(),
            body_font: FontMetrics::helvetica(),
        }
    }
}

/// Suggested file name for a report: the startup name with every character
/// outside `[A-Za-z0-9]` replaced by `_`.
pub fn report_file_name(record: &Record, schema: &Schema) -> String {
    let name = clean_text(record.get(STARTUP_NAME).unwrap_or(""));
    if name.is_empty() || name == schema.not_provided() {
        return FALLBACK_FILE_NAME.to_string();
    }
    let token: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{token}_PitchCraft_Report.pdf")
}

pub fn convert_text_to_pdf_bytes(raw: &str, settings: &Settings) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let record = parse(raw, &settings.schema);
    let t_parse = t0.elapsed();

    let pages = render(
        &record,
        &settings.schema,
        &settings.geometry,
        &settings.body_font,
        &settings.chrome,
    )?;
    let t_render = t0.elapsed();

    let bytes = write_pdf(&pages, &settings.geometry, &settings.body_font)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, layout={:.1}ms, pdf={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages.len(),
        bytes.len(),
    );

    Ok(bytes)
}

pub fn convert_text_to_pdf(raw: &str, output: &Path, settings: &Settings) -> Result<(), Error> {
    let bytes = convert_text_to_pdf_bytes(raw, settings)?;
    std::fs::write(output, &bytes).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, output.display())))
    })?;
    log::debug!("wrote {}", output.display());
    Ok(())
}
