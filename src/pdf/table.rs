use crate::error::Error;
use crate::present::{Align, RowStyle, TableUnit};

use super::cursor::PageCursor;
use super::layout::{Fonts, TextStyle, draw_lines, wrap_text};
use super::{LayoutReport, RowPlacement};

const CELL_PAD_X: f32 = 4.0;
const CELL_PAD_Y: f32 = 3.0;
const TOTAL_FILL_GRAY: f32 = 0.85;

pub(super) struct RowLayout {
    label_lines: Vec<String>,
    value_lines: Vec<String>,
    height: f32,
}

pub(super) struct TableLayout {
    label_w: f32,
    value_w: f32,
    rows: Vec<RowLayout>,
}

impl TableLayout {
    pub(super) fn height(&self) -> f32 {
        self.rows.iter().map(|r| r.height).sum()
    }

    /// Height that must stay on the page of a heading placed above this
    /// table: all of it when it fits on one page, else its first row.
    pub(super) fn lead_height(&self, printable_height: f32) -> f32 {
        let total = self.height();
        if total <= printable_height {
            total
        } else {
            self.rows.first().map_or(0.0, |r| r.height)
        }
    }
}

fn row_text_style(style: RowStyle, size: f32) -> TextStyle {
    TextStyle {
        bold: style == RowStyle::Total,
        size,
    }
}

pub(super) fn layout_table(
    table: &TableUnit,
    fonts: &Fonts,
    font_size: f32,
    content_width: f32,
) -> TableLayout {
    let label_w = content_width * table.label_fraction;
    let value_w = content_width - label_w;
    let text_w = |w: f32| (w - 2.0 * CELL_PAD_X).max(1.0);

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let style = row_text_style(row.style, font_size);
            let font = fonts.get(style.bold);
            let label_lines = wrap_text(&row.label, font, font_size, text_w(label_w));
            // amounts print whole; a too-wide one overflows into the left padding
            let value_lines = if row.style == RowStyle::Total || row.value_align == Align::Right {
                unbroken_lines(&row.value)
            } else {
                wrap_text(&row.value, font, font_size, text_w(value_w))
            };
            let line_count = label_lines.len().max(value_lines.len()).max(1);
            RowLayout {
                height: line_count as f32 * font.line_height(font_size) + 2.0 * CELL_PAD_Y,
                label_lines,
                value_lines,
            }
        })
        .collect();

    TableLayout {
        label_w,
        value_w,
        rows,
    }
}

fn unbroken_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Emit a table unit at the cursor. A unit that fits on one page is checked
/// once as a whole and so is never split; a taller one breaks between rows.
#[allow(clippy::too_many_arguments)]
pub(super) fn render_table(
    cursor: &mut PageCursor,
    table: &TableUnit,
    layout: &TableLayout,
    fonts: &Fonts,
    font_size: f32,
    left: f32,
    printable_height: f32,
    unit_index: usize,
    report: &mut LayoutReport,
) -> Result<(), Error> {
    let table_h = layout.height();
    let whole = table_h <= printable_height;
    if whole {
        cursor.check_page_break(table_h)?;
    } else {
        log::debug!(
            "unit {unit_index}: {:.1}pt table exceeds a page, breaking between rows",
            table_h
        );
    }

    let table_w = layout.label_w + layout.value_w;

    for (ri, (row, row_layout)) in table.rows.iter().zip(layout.rows.iter()).enumerate() {
        let row_h = row_layout.height;
        if !whole {
            cursor.check_page_break(row_h)?;
        }
        if row_h > printable_height {
            log::warn!(
                "unit {unit_index} row {ri}: {row_h:.1}pt is taller than a page and will overflow"
            );
        }

        let row_top = cursor.y();
        let row_bottom = row_top - row_h;
        let style = row_text_style(row.style, font_size);
        let content = cursor.content();

        if row.style == RowStyle::Total {
            content.save_state();
            content.set_fill_gray(TOTAL_FILL_GRAY);
            content.rect(left, row_bottom, table_w, row_h);
            content.fill_nonzero();
            content.set_line_width(0.75);
            content.move_to(left, row_top);
            content.line_to(left + table_w, row_top);
            content.stroke();
            content.restore_state();
        }

        draw_lines(
            content,
            fonts,
            style,
            &row_layout.label_lines,
            left + CELL_PAD_X,
            layout.label_w - 2.0 * CELL_PAD_X,
            row_top - CELL_PAD_Y,
            false,
        );
        draw_lines(
            content,
            fonts,
            style,
            &row_layout.value_lines,
            left + layout.label_w + CELL_PAD_X,
            layout.value_w - 2.0 * CELL_PAD_X,
            row_top - CELL_PAD_Y,
            row.value_align == Align::Right,
        );

        content.save_state();
        content.set_line_width(0.25);
        content.set_stroke_gray(0.6);
        content.move_to(left, row_bottom);
        content.line_to(left + table_w, row_bottom);
        content.stroke();
        content.restore_state();

        report.rows.push(RowPlacement {
            unit: unit_index,
            row: ri,
            page: cursor.page_index(),
            top: row_top,
            bottom: row_bottom,
        });
        cursor.advance(row_h);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SectionId;
    use crate::config::FontConfig;
    use crate::fonts::{FontRole, register_font};
    use crate::present::PresentRow;
    use pdf_writer::{Pdf, Ref};
    use std::collections::BTreeSet;

    fn standard_fonts() -> Fonts {
        let mut pdf = Pdf::new();
        let mut next = 0;
        let mut alloc = || {
            next += 1;
            Ref::new(next)
        };
        let config = FontConfig {
            embed_system_fonts: false,
            ..FontConfig::default()
        };
        let none = BTreeSet::new();
        Fonts {
            regular: register_font(&mut pdf, &config, FontRole::Regular, "F1".into(), &mut alloc, &none),
            bold: register_font(&mut pdf, &config, FontRole::Bold, "F2".into(), &mut alloc, &none),
        }
    }

    fn table(rows: Vec<PresentRow>) -> TableUnit {
        TableUnit {
            section: SectionId::Expenses,
            category: None,
            label_fraction: 0.8,
            rows,
        }
    }

    fn row(value: &str, style: RowStyle, value_align: Align) -> PresentRow {
        PresentRow {
            label: "TOTAL EXPENSES".to_string(),
            value: value.to_string(),
            style,
            value_align,
        }
    }

    #[test]
    fn wide_amounts_stay_on_one_line() {
        let fonts = standard_fonts();
        let huge = "$12,345,678,901,234.00";
        let unit = table(vec![
            row(huge, RowStyle::Total, Align::Right),
            row(huge, RowStyle::Normal, Align::Right),
        ]);
        let layout = layout_table(&unit, &fonts, 10.0, 468.0);
        assert!(fonts.bold.text_width(huge, 10.0) > layout.value_w - 2.0 * CELL_PAD_X);
        for r in &layout.rows {
            assert_eq!(r.value_lines, [huge]);
        }
        assert_eq!(layout.rows[0].height, layout.rows[1].height);
    }

    #[test]
    fn left_aligned_text_still_wraps() {
        let fonts = standard_fonts();
        let text = "Recurring payment to the neighborhood association";
        let unit = table(vec![row(text, RowStyle::Normal, Align::Left)]);
        let layout = layout_table(&unit, &fonts, 10.0, 468.0);
        assert!(layout.rows[0].value_lines.len() > 1);
    }
}
