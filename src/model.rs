use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BRAND: Color = Color(33, 150, 243);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const BOX_FILL: Color = Color(245, 247, 250);
    pub const BOX_BORDER: Color = Color(220, 220, 220);
    pub const TITLE: Color = Color(33, 33, 33);
    pub const BODY: Color = Color(60, 60, 60);
    pub const RULE: Color = Color(200, 200, 200);
    pub const MUTED: Color = Color(120, 120, 120);

    pub(crate) fn to_rgb_f32(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub weight: FontWeight,
    pub size: f32,
}

/// Page and box dimensions, all in points, origin at the top-left of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Height of the colored band drawn at the top of every page.
    pub header_height: f32,
    /// Where the layout cursor starts on a fresh page.
    pub body_top: f32,
    /// Space kept free above the bottom edge for the footer.
    pub footer_reserve: f32,
    pub box_padding: f32,
    pub title_height: f32,
    /// Padding above and below a box's title + text, summed.
    pub vertical_padding: f32,
    pub line_height: f32,
    pub box_spacing: f32,
    pub column_gap: f32,
    pub body_font_size: f32,
    pub title_font_size: f32,
    pub corner_radius: f32,
}

impl PageGeometry {
    pub const A4: (f32, f32) = (595.28, 841.89);
    pub const LETTER: (f32, f32) = (612.0, 792.0);

    pub fn with_page_size(self, (page_width, page_height): (f32, f32)) -> Self {
        Self {
            page_width,
            page_height,
            ..self
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Width of each box when `columns` boxes share a row.
    pub fn column_width(&self, columns: usize) -> f32 {
        let n = columns.max(1) as f32;
        (self.content_width() - self.column_gap * (n - 1.0)) / n
    }

    /// Lowest y a box may reach before the page has to break.
    pub fn usable_bottom(&self) -> f32 {
        self.page_height - self.footer_reserve
    }

    /// Vertical space available to boxes on one page.
    pub fn usable_height(&self) -> f32 {
        self.usable_bottom() - self.body_top
    }

    pub fn validate(&self) -> Result<(), Error> {
        let all = [
            self.page_width,
            self.page_height,
            self.margin,
            self.header_height,
            self.body_top,
            self.footer_reserve,
            self.box_padding,
            self.title_height,
            self.vertical_padding,
            self.line_height,
            self.box_spacing,
            self.column_gap,
            self.body_font_size,
            self.title_font_size,
            self.corner_radius,
        ];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(Error::Geometry("dimensions must be finite and non-negative".into()));
        }
        if self.content_width() <= 2.0 * self.box_padding {
            return Err(Error::Geometry(format!(
                "content width {:.1}pt leaves no room inside the box padding",
                self.content_width()
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(Error::Geometry(format!(
                "body top {:.1}pt is below the usable bottom {:.1}pt",
                self.body_top,
                self.usable_bottom()
            )));
        }
        if self.body_font_size <= 0.0 || self.line_height <= 0.0 {
            return Err(Error::Geometry("font size and line height must be positive".into()));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        let (page_width, page_height) = Self::A4;
        Self {
            page_width,
            page_height,
            margin: 40.0,
            header_height: 100.0,
            body_top: 130.0,
            footer_reserve: 80.0,
            box_padding: 15.0,
            title_height: 25.0,
            vertical_padding: 30.0,
            line_height: 15.0,
            box_spacing: 15.0,
            column_gap: 12.0,
            body_font_size: 11.0,
            title_font_size: 13.0,
            corner_radius: 6.0,
        }
    }
}

/// One primitive handed to the document emitter. Coordinates are page-relative.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawInstruction {
    /// Ends the previous page. Every page after the first starts with one.
    PageBreak,
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: Color,
        line_width: f32,
    },
    /// `y` is the baseline of the first line; later lines step down by `line_height`.
    Text {
        x: f32,
        y: f32,
        lines: Vec<String>,
        line_height: f32,
        style: TextStyle,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub instructions: Vec<DrawInstruction>,
}

/// Strings repeated in the header and footer of every page.
///
/// The library never reads the clock: `generated_on` starts empty and the
/// footer's "Date:" line is only drawn once the caller sets it, e.g. with
/// [`ReportChrome::with_date`]. The CLI fills in today's date.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportChrome {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub generated_on: String,
    pub copyright: String,
}

impl ReportChrome {
    pub fn with_date(self, generated_on: impl Into<String>) -> Self {
        Self {
            generated_on: generated_on.into(),
            ..self
        }
    }
}

impl Default for ReportChrome {
    fn default() -> Self {
        Self {
            title: "PitchCraft Startup Report".into(),
            subtitle: "AI-powered startup pitch crafted to perfection".into(),
            author: "Anonymous User".into(),
            generated_on: String::new(),
            copyright: "\u{a9} 2025 PitchCraft \u{2014} AI Startup Builder".into(),
        }
    }
}
