use crate::error::Error;
use crate::fonts::TextMeasurer;
use crate::model::PageGeometry;
use crate::parser::{Record, clean_text};
use crate::schema::Schema;

/// One section box with its wrapped body text.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBox {
    pub label: String,
    pub x: f32,
    pub width: f32,
    pub lines: Vec<String>,
}

/// A single box, or a row of boxes sharing one height, placed on a page.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub y: f32,
    pub height: f32,
    pub boxes: Vec<PlacedBox>,
    /// Taller than a whole page; placed at the top and allowed to run past the footer.
    pub overflow: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Always at least one, even when nothing was placed.
    pub pages: usize,
    pub placements: Vec<Placement>,
}

pub fn box_height(geometry: &PageGeometry, line_count: usize) -> f32 {
    geometry.title_height + line_count as f32 * geometry.line_height + geometry.vertical_padding
}

/// Cleaned value of `label`, or `None` when there is nothing worth a box.
fn display_value(record: &Record, schema: &Schema, label: &str) -> Option<String> {
    let value = clean_text(record.get(label).unwrap_or(""));
    if value.is_empty() || value == schema.not_provided() {
        None
    } else {
        Some(value)
    }
}

/// Every unit must leave room for text inside its box padding when all of
/// its members are shown.
fn check_row_widths(schema: &Schema, geometry: &PageGeometry) -> Result<(), Error> {
    for unit in schema.units() {
        let inner = geometry.column_width(unit.len()) - 2.0 * geometry.box_padding;
        if inner <= 0.0 {
            return Err(Error::Geometry(format!(
                "a row of {} boxes leaves {inner:.1}pt for text in each ({:?} ...)",
                unit.len(),
                unit[0]
            )));
        }
    }
    Ok(())
}

/// Assign every non-empty section to a page and a vertical position.
///
/// Sections are visited in declared order; a schema row is one unit whose
/// boxes share the height of the tallest member. A unit that does not fit
/// below the cursor moves to a fresh page. A unit that cannot fit even on a
/// fresh page is placed at the top anyway and flagged as overflow, so every
/// unit causes at most one page break.
pub fn layout(
    record: &Record,
    schema: &Schema,
    geometry: &PageGeometry,
    measurer: &dyn TextMeasurer,
) -> Result<Layout, Error> {
    geometry.validate()?;
    check_row_widths(schema, geometry)?;

    let mut placements: Vec<Placement> = Vec::new();
    let mut page = 0usize;
    let mut cursor = geometry.body_top;

    for unit in schema.units() {
        let members: Vec<(&str, String)> = unit
            .iter()
            .filter_map(|&label| display_value(record, schema, label).map(|v| (label, v)))
            .collect();
        if members.is_empty() {
            continue;
        }

        let width = geometry.column_width(members.len());
        let inner_width = width - 2.0 * geometry.box_padding;

        let mut boxes = Vec::with_capacity(members.len());
        let mut line_count = 0usize;
        for (i, (label, value)) in members.into_iter().enumerate() {
            let count = measurer.measure_wrapped_lines(&value, inner_width, geometry.body_font_size)?;
            let lines = measurer.wrap_lines(&value, inner_width, geometry.body_font_size)?;
            // box height comes from `count`, the drawn text from `lines`
            if count != lines.len() {
                return Err(Error::Measure(format!(
                    "{label:?}: measurer counted {count} lines but wrapped {}",
                    lines.len()
                )));
            }
            line_count = line_count.max(count);
            boxes.push(PlacedBox {
                label: label.to_string(),
                x: geometry.margin + i as f32 * (width + geometry.column_gap),
                width,
                lines,
            });
        }
        let height = box_height(geometry, line_count);

        let at_page_top = (cursor - geometry.body_top).abs() < 0.5;
        if !at_page_top && cursor + height > geometry.usable_bottom() {
            page += 1;
            cursor = geometry.body_top;
            log::debug!(
                "page break before {:?} (needs {height:.1}pt), now on page {}",
                boxes[0].label,
                page + 1
            );
        }

        let overflow = cursor + height > geometry.usable_bottom();
        if overflow {
            log::warn!(
                "{:?} needs {height:.1}pt but a page holds {:.1}pt; letting it overflow",
                boxes[0].label,
                geometry.usable_height()
            );
        }

        placements.push(Placement {
            page,
            y: cursor,
            height,
            boxes,
            overflow,
        });
        cursor += height + geometry.box_spacing;
    }

    Ok(Layout {
        pages: page + 1,
        placements,
    })
}
