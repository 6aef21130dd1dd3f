mod cursor;
mod layout;
mod table;

use std::collections::BTreeSet;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::config::RenderConfig;
use crate::error::Error;
use crate::fonts::{FontRole, register_font};
use crate::model::ContentModel;
use crate::present::{TableUnit, Unit, present};

use cursor::PageCursor;
use layout::{Fonts, TextStyle, draw_line, wrap_text};
use table::{TableLayout, layout_table, render_table};

const TITLE_SPACE_AFTER: f32 = 14.0;
const HEADING_SPACE_BEFORE: f32 = 10.0;
const HEADING_SPACE_AFTER: f32 = 4.0;
const TABLE_SPACE_AFTER: f32 = 8.0;

/// Where one table row landed. Coordinates are PDF points from the page
/// bottom; `page` is zero-based.
#[derive(Clone, Debug, PartialEq)]
pub struct RowPlacement {
    /// Index of the presentation unit the row belongs to.
    pub unit: usize,
    pub row: usize,
    pub page: usize,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutReport {
    pub page_count: usize,
    pub margin_bottom: f32,
    pub printable_height: f32,
    pub rows: Vec<RowPlacement>,
}

impl LayoutReport {
    pub fn rows_of(&self, unit: usize) -> impl Iterator<Item = &RowPlacement> {
        self.rows.iter().filter(move |r| r.unit == unit)
    }

    /// Units whose rows were spread over more than one page.
    pub fn split_units(&self) -> Vec<usize> {
        let mut units: Vec<usize> = self.rows.iter().map(|r| r.unit).collect();
        units.dedup();
        units
            .into_iter()
            .filter(|&u| {
                let mut pages = self.rows_of(u).map(|r| r.page);
                let first = pages.next();
                pages.any(|p| Some(p) != first)
            })
            .collect()
    }
}

pub fn render(model: &ContentModel, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    render_with_report(model, config).map(|(bytes, _)| bytes)
}

/// Unit heights needed for keep-with-next decisions.
enum Measured<'a> {
    Title(Vec<String>),
    Heading {
        lines: Vec<String>,
        style: TextStyle,
        page_break_before: bool,
    },
    Table(&'a TableUnit, TableLayout),
}

pub fn render_with_report(
    model: &ContentModel,
    config: &RenderConfig,
) -> Result<(Vec<u8>, LayoutReport), Error> {
    config.validate()?;
    let t0 = std::time::Instant::now();
    let geometry = &config.page;
    let font_cfg = &config.fonts;
    let units = present(model, config);

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: register the two body fonts, subset to the chars in use
    let used_chars = collect_used_chars(&units, model, config);
    let fonts = Fonts {
        regular: register_font(&mut pdf, font_cfg, FontRole::Regular, "F1".into(), &mut alloc, &used_chars),
        bold: register_font(&mut pdf, font_cfg, FontRole::Bold, "F2".into(), &mut alloc, &used_chars),
    };
    let t_fonts = t0.elapsed();

    // Phase 2: measure, then place every unit with the page cursor
    let content_width = geometry.content_width();
    let printable_height = geometry.printable_height();
    let left = geometry.margin_left;

    let measured: Vec<Measured> = units
        .iter()
        .map(|unit| match unit {
            Unit::Title(text) => Measured::Title(wrap_text(
                text,
                fonts.get(true),
                font_cfg.title_size,
                content_width,
            )),
            Unit::Heading {
                text,
                level,
                page_break_before,
            } => {
                let style = heading_style(*level, config);
                Measured::Heading {
                    lines: wrap_text(text, fonts.get(true), style.size, content_width),
                    style,
                    page_break_before: *page_break_before,
                }
            }
            Unit::Table(t) => {
                Measured::Table(t, layout_table(t, &fonts, font_cfg.body_size, content_width))
            }
        })
        .collect();

    let mut cursor = PageCursor::new(geometry, config.max_pages);
    let mut report = LayoutReport {
        margin_bottom: geometry.margin_bottom,
        printable_height,
        ..LayoutReport::default()
    };

    for (i, m) in measured.iter().enumerate() {
        match m {
            Measured::Title(lines) => {
                let style = TextStyle {
                    bold: true,
                    size: font_cfg.title_size,
                };
                let font = fonts.get(true);
                let line_h = font.line_height(style.size);
                for line in lines {
                    let x = left + (content_width - font.text_width(line, style.size)).max(0.0) / 2.0;
                    let baseline = cursor.y() - style.size * font.ascender_ratio;
                    draw_line(cursor.content(), &fonts, style, x, baseline, line);
                    cursor.advance(line_h);
                }
                cursor.advance(TITLE_SPACE_AFTER);
            }
            Measured::Heading {
                lines,
                style,
                page_break_before,
            } => {
                if *page_break_before {
                    cursor.force_page_break()?;
                }
                // keep the heading with whatever follows it
                let needed = lead_height(&measured, i, &fonts, printable_height);
                cursor.check_page_break(needed)?;
                if !cursor.at_page_top() {
                    cursor.advance(HEADING_SPACE_BEFORE);
                }
                let font = fonts.get(true);
                let line_h = font.line_height(style.size);
                for line in lines {
                    let baseline = cursor.y() - style.size * font.ascender_ratio;
                    draw_line(cursor.content(), &fonts, *style, left, baseline, line);
                    cursor.advance(line_h);
                }
                cursor.advance(HEADING_SPACE_AFTER);
            }
            Measured::Table(t, tl) => {
                render_table(
                    &mut cursor,
                    t,
                    tl,
                    &fonts,
                    font_cfg.body_size,
                    left,
                    printable_height,
                    i,
                    &mut report,
                )?;
                cursor.advance(TABLE_SPACE_AFTER);
            }
        }
    }

    let mut all_contents = cursor.finish();
    let total_pages = all_contents.len();
    report.page_count = total_pages;
    let t_layout = t0.elapsed();

    // Phase 2b: running footer on every page
    let footer_style = TextStyle {
        bold: false,
        size: font_cfg.footer_size,
    };
    let footer_font = fonts.get(false);
    let footer_line_h = footer_font.line_height(footer_style.size);
    let right_edge = geometry.width - geometry.margin_right;
    for (i, content) in all_contents.iter_mut().enumerate() {
        let upper = geometry.footer_margin + footer_line_h;
        let page_label = format!("Page {} of {}", i + 1, total_pages);
        let page_label_w = footer_font.text_width(&page_label, footer_style.size);
        draw_line(content, &fonts, footer_style, left, upper, &config.revision_marker);
        draw_line(
            content,
            &fonts,
            footer_style,
            right_edge - page_label_w,
            upper,
            &page_label,
        );
        draw_line(
            content,
            &fonts,
            footer_style,
            left,
            geometry.footer_margin,
            &model.footer_caption,
        );
    }

    // Phase 3: allocate page and content IDs now that page count is known
    let n = all_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);
    pdf.document_info(info_id).title(TextStr(&model.title));

    let font_pairs: Vec<(&str, Ref)> = fonts
        .entries()
        .iter()
        .map(|e| (e.pdf_name.as_str(), e.font_ref))
        .collect();

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (name, font_ref) in &font_pairs {
            font_dict.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    let t_assembly = t0.elapsed();
    log::info!(
        "Render phases: fonts={:.1}ms, layout={:.1}ms, assembly={:.1}ms, pages={}",
        t_fonts.as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        total_pages,
    );

    Ok((pdf.finish(), report))
}

fn heading_style(level: u8, config: &RenderConfig) -> TextStyle {
    TextStyle {
        bold: true,
        size: if level <= 1 {
            config.fonts.heading_size
        } else {
            config.fonts.body_size + 1.0
        },
    }
}

/// Height a heading at `i` needs on its page: itself plus the lead of the
/// unit after it, following chains of headings.
fn lead_height(measured: &[Measured], i: usize, fonts: &Fonts, printable_height: f32) -> f32 {
    let own = match &measured[i] {
        Measured::Heading { lines, style, .. } => {
            HEADING_SPACE_BEFORE
                + lines.len() as f32 * fonts.get(true).line_height(style.size)
                + HEADING_SPACE_AFTER
        }
        Measured::Table(_, tl) => return tl.lead_height(printable_height),
        Measured::Title(_) => return 0.0,
    };
    let next = match measured.get(i + 1) {
        Some(Measured::Heading { .. }) => lead_height(measured, i + 1, fonts, printable_height),
        Some(Measured::Table(_, tl)) => tl.lead_height(printable_height),
        _ => 0.0,
    };
    (own + next).min(printable_height)
}

fn collect_used_chars(units: &[Unit], model: &ContentModel, config: &RenderConfig) -> BTreeSet<char> {
    let mut chars: BTreeSet<char> = BTreeSet::new();
    let mut add = |s: &str| chars.extend(s.chars());
    for unit in units {
        match unit {
            Unit::Title(text) | Unit::Heading { text, .. } => add(text),
            Unit::Table(t) => {
                for row in &t.rows {
                    add(&row.label);
                    add(&row.value);
                }
            }
        }
    }
    add(&model.footer_caption);
    add(&config.revision_marker);
    add("Page of 0123456789?");
    chars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::tree::FormDataTree;

    fn standard_fonts() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.fonts.embed_system_fonts = false;
        config
    }

    #[test]
    fn every_section_starts_a_page() {
        let model = build(&FormDataTree::default());
        let (bytes, report) = render_with_report(&model, &standard_fonts()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(report.page_count >= 8);
        assert!(report.split_units().is_empty());
    }

    #[test]
    fn page_limit_aborts_rendering() {
        let model = build(&FormDataTree::default());
        let mut config = standard_fonts();
        config.max_pages = 3;
        assert!(matches!(render(&model, &config), Err(Error::Pdf(_))));
    }

    #[test]
    fn output_is_deterministic() {
        let model = build(&FormDataTree::default());
        let config = standard_fonts();
        assert_eq!(render(&model, &config).unwrap(), render(&model, &config).unwrap());
    }
}
