use crate::error::Error;
use crate::fonts::TextMeasurer;
use crate::layout::{Layout, Placement, layout};
use crate::model::{
    Color, DrawInstruction, FontWeight, Page, PageGeometry, ReportChrome, TextStyle,
};
use crate::parser::Record;
use crate::schema::Schema;

const BRAND_MARK_SIZE: f32 = 45.0;
const FOOTER_FONT_SIZE: f32 = 9.0;
const FOOTER_RIGHT_COLUMN: f32 = 200.0;

/// Lay out `record` and turn the result into per-page draw instructions.
///
/// Pure: the same inputs always produce the same pages. Measurement errors
/// are returned unchanged.
pub fn render(
    record: &Record,
    schema: &Schema,
    geometry: &PageGeometry,
    measurer: &dyn TextMeasurer,
    chrome: &ReportChrome,
) -> Result<Vec<Page>, Error> {
    let layout = layout(record, schema, geometry, measurer)?;
    Ok(draw(&layout, geometry, chrome))
}

/// Emit instructions for an existing layout: header, boxes, then footers once
/// the page count is known.
pub fn draw(layout: &Layout, geometry: &PageGeometry, chrome: &ReportChrome) -> Vec<Page> {
    let mut pages: Vec<Page> = (0..layout.pages.max(1))
        .map(|i| {
            let mut page = Page::default();
            if i > 0 {
                page.instructions.push(DrawInstruction::PageBreak);
            }
            draw_header(&mut page, geometry, chrome);
            page
        })
        .collect();

    for placement in &layout.placements {
        if let Some(page) = pages.get_mut(placement.page) {
            draw_placement(page, placement, geometry);
        }
    }

    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        draw_footer(page, geometry, chrome, i + 1, total);
    }
    pages
}

fn text(x: f32, y: f32, line: impl Into<String>, style: TextStyle) -> DrawInstruction {
    DrawInstruction::Text {
        x,
        y,
        lines: vec![line.into()],
        line_height: style.size,
        style,
    }
}

fn draw_header(page: &mut Page, g: &PageGeometry, chrome: &ReportChrome) {
    let out = &mut page.instructions;
    out.push(DrawInstruction::FillRect {
        x: 0.0,
        y: 0.0,
        width: g.page_width,
        height: g.header_height,
        radius: 0.0,
        color: Color::BRAND,
    });

    // brand mark: white tile with the initial
    let mark_y = (g.header_height - BRAND_MARK_SIZE) / 2.0 - 7.5;
    out.push(DrawInstruction::FillRect {
        x: g.margin,
        y: mark_y,
        width: BRAND_MARK_SIZE,
        height: BRAND_MARK_SIZE,
        radius: 8.0,
        color: Color::WHITE,
    });
    out.push(text(
        g.margin + 14.0,
        mark_y + 32.0,
        "P",
        TextStyle {
            color: Color::BRAND,
            weight: FontWeight::Bold,
            size: 26.0,
        },
    ));

    let text_x = g.margin + BRAND_MARK_SIZE + 15.0;
    out.push(text(
        text_x,
        mark_y + 25.0,
        chrome.title.clone(),
        TextStyle {
            color: Color::WHITE,
            weight: FontWeight::Bold,
            size: 20.0,
        },
    ));
    if !chrome.subtitle.is_empty() {
        out.push(text(
            text_x,
            mark_y + 45.0,
            chrome.subtitle.clone(),
            TextStyle {
                color: Color::WHITE,
                weight: FontWeight::Regular,
                size: 11.0,
            },
        ));
    }
}

fn draw_placement(page: &mut Page, placement: &Placement, g: &PageGeometry) {
    let title_style = TextStyle {
        color: Color::TITLE,
        weight: FontWeight::Bold,
        size: g.title_font_size,
    };
    let body_style = TextStyle {
        color: Color::BODY,
        weight: FontWeight::Regular,
        size: g.body_font_size,
    };
    let y = placement.y;

    for b in &placement.boxes {
        page.instructions.push(DrawInstruction::FillRect {
            x: b.x,
            y,
            width: b.width,
            height: placement.height,
            radius: g.corner_radius,
            color: Color::BOX_FILL,
        });
        page.instructions.push(DrawInstruction::StrokeRect {
            x: b.x,
            y,
            width: b.width,
            height: placement.height,
            radius: g.corner_radius,
            color: Color::BOX_BORDER,
            line_width: 1.0,
        });

        let text_x = b.x + g.box_padding;
        let title_baseline = y + g.vertical_padding / 2.0 + 5.0;
        page.instructions.push(text(text_x, title_baseline, b.label.clone(), title_style));
        if !b.lines.is_empty() {
            page.instructions.push(DrawInstruction::Text {
                x: text_x,
                y: title_baseline + g.title_height,
                lines: b.lines.clone(),
                line_height: g.line_height,
                style: body_style,
            });
        }
    }
}

fn draw_footer(page: &mut Page, g: &PageGeometry, chrome: &ReportChrome, page_num: usize, total: usize) {
    let footer_y = g.page_height - g.footer_reserve + 30.0;
    let style = TextStyle {
        color: Color::MUTED,
        weight: FontWeight::Regular,
        size: FOOTER_FONT_SIZE,
    };
    let right_x = g.page_width - g.margin - FOOTER_RIGHT_COLUMN;
    let out = &mut page.instructions;

    // separator rule
    out.push(DrawInstruction::FillRect {
        x: g.margin,
        y: footer_y - 10.5,
        width: g.content_width(),
        height: 1.0,
        radius: 0.0,
        color: Color::RULE,
    });
    out.push(text(g.margin, footer_y, format!("Generated for: {}", chrome.author), style));
    if !chrome.generated_on.is_empty() {
        out.push(text(
            g.margin,
            footer_y + 15.0,
            format!("Date: {}", chrome.generated_on),
            style,
        ));
    }
    if !chrome.copyright.is_empty() {
        out.push(text(right_x, footer_y, chrome.copyright.clone(), style));
    }
    out.push(text(right_x, footer_y + 15.0, format!("Page {page_num} of {total}"), style));
}
