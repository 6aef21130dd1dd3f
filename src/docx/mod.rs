//! WordprocessingML package writer.
//!
//! The document body is a sequence of styled paragraphs and two-column
//! tables in presentation order; Word does the pagination. Section headings
//! carry `pageBreakBefore` where the model asks for a new page.

mod styles;

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::config::RenderConfig;
use crate::error::Error;
use crate::model::ContentModel;
use crate::present::{Align, PresentRow, RowStyle, TableUnit, Unit, present};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const TOTAL_FILL: &str = "D9D9D9";
const RULE_COLOR: &str = "999999";
const FOOTER_REL_ID: &str = "rId3";

/// Points to twentieths of a point.
pub(crate) fn twips(pt: f32) -> u32 {
    (pt * 20.0).round().max(0.0) as u32
}

/// Points to half-points, the unit of `w:sz`.
pub(crate) fn half_points(pt: f32) -> u32 {
    (pt * 2.0).round().max(1.0) as u32
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            // not representable in XML 1.0
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

pub fn render(model: &ContentModel, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    config.validate()?;
    let t0 = std::time::Instant::now();
    let units = present(model, config);

    let document = document_xml(&units, config);
    let t_body = t0.elapsed();

    let parts: [(&str, String); 9] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", package_rels_xml()),
        ("docProps/core.xml", styles::core_xml(&model.title)),
        ("docProps/app.xml", styles::app_xml()),
        ("word/document.xml", document),
        ("word/styles.xml", styles::styles_xml(&config.fonts)),
        ("word/settings.xml", styles::settings_xml()),
        (
            "word/footer1.xml",
            styles::footer_xml(config, &model.footer_caption),
        ),
        ("word/_rels/document.xml.rels", document_rels_xml()),
    ];
    let bytes = write_package(&parts)?;

    log::info!(
        "DOCX phases: body={:.1}ms, package={:.1}ms, {} bytes",
        t_body.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_body).as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}

/// Zip the parts in order with a fixed timestamp, so equal input gives
/// equal bytes.
fn write_package(parts: &[(&str, String)]) -> Result<Vec<u8>, Error> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());
    for (name, xml) in parts {
        zip.start_file(*name, options)?;
        zip.write_all(xml.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

fn content_types_xml() -> String {
    const OVERRIDES: [(&str, &str); 6] = [
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/word/settings.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml",
        ),
        (
            "/word/footer1.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ];
    let mut out = String::from(XML_DECL);
    out.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (part, ty) in OVERRIDES {
        out.push_str(&format!(r#"<Override PartName="{part}" ContentType="{ty}"/>"#));
    }
    out.push_str("</Types>");
    out
}

fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(&format!(r#"<Relationships xmlns="{PKG_REL_NS}">"#));
    for (id, ty, target) in rels {
        out.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{ty}" Target="{target}"/>"#
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn package_rels_xml() -> String {
    relationships(&[
        (
            "rId1",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            "word/document.xml",
        ),
        (
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        (
            "rId3",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties",
            "docProps/app.xml",
        ),
    ])
}

fn document_rels_xml() -> String {
    relationships(&[
        (
            "rId1",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
            "styles.xml",
        ),
        (
            "rId2",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings",
            "settings.xml",
        ),
        (
            FOOTER_REL_ID,
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer",
            "footer1.xml",
        ),
    ])
}

/// A run of text. Newlines become `w:br`.
pub(crate) fn run_xml(text: &str, bold: bool) -> String {
    let mut out = String::from("<w:r>");
    if bold {
        out.push_str("<w:rPr><w:b/><w:bCs/></w:rPr>");
    }
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        out.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape_xml(line)
        ));
    }
    out.push_str("</w:r>");
    out
}

fn heading_xml(text: &str, level: u8, page_break_before: bool) -> String {
    let style = if level <= 1 { "Heading1" } else { "Heading2" };
    let mut out = format!(r#"<w:p><w:pPr><w:pStyle w:val="{style}"/><w:keepNext/>"#);
    if page_break_before {
        out.push_str("<w:pageBreakBefore/>");
    }
    out.push_str("</w:pPr>");
    out.push_str(&run_xml(text, false));
    out.push_str("</w:p>");
    out
}

fn cell_xml(text: &str, width: u32, row: &PresentRow, right: bool, keep_next: bool) -> String {
    let total = row.style == RowStyle::Total;
    let mut out = format!(r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/>"#);
    if total {
        out.push_str(
            r#"<w:tcBorders><w:top w:val="single" w:sz="6" w:space="0" w:color="000000"/></w:tcBorders>"#,
        );
        out.push_str(&format!(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="{TOTAL_FILL}"/>"#
        ));
    }
    out.push_str(r#"</w:tcPr><w:p><w:pPr><w:pStyle w:val="TableText"/>"#);
    if keep_next {
        out.push_str("<w:keepNext/>");
    }
    if right {
        out.push_str(r#"<w:jc w:val="right"/>"#);
    }
    out.push_str("</w:pPr>");
    if !text.is_empty() {
        out.push_str(&run_xml(text, total));
    }
    out.push_str("</w:p></w:tc>");
    out
}

fn table_xml(table: &TableUnit, content_width: u32) -> String {
    let label_w = (content_width as f32 * table.label_fraction).round() as u32;
    let value_w = content_width.saturating_sub(label_w);

    let mut out = String::from("<w:tbl><w:tblPr>");
    out.push_str(&format!(
        r#"<w:tblW w:w="{content_width}" w:type="dxa"/><w:tblLayout w:type="fixed"/>"#
    ));
    out.push_str(&format!(
        r#"<w:tblBorders><w:bottom w:val="single" w:sz="2" w:space="0" w:color="{RULE_COLOR}"/><w:insideH w:val="single" w:sz="2" w:space="0" w:color="{RULE_COLOR}"/></w:tblBorders>"#
    ));
    out.push_str(r#"<w:tblCellMar><w:left w:w="80" w:type="dxa"/><w:right w:w="80" w:type="dxa"/></w:tblCellMar>"#);
    out.push_str("</w:tblPr><w:tblGrid>");
    out.push_str(&format!(
        r#"<w:gridCol w:w="{label_w}"/><w:gridCol w:w="{value_w}"/>"#
    ));
    out.push_str("</w:tblGrid>");

    let last = table.rows.len().saturating_sub(1);
    for (i, row) in table.rows.iter().enumerate() {
        // chain rows so Word keeps the unit together when it fits a page
        let keep_next = i < last;
        out.push_str("<w:tr><w:trPr><w:cantSplit/></w:trPr>");
        out.push_str(&cell_xml(&row.label, label_w, row, false, keep_next));
        out.push_str(&cell_xml(
            &row.value,
            value_w,
            row,
            row.value_align == Align::Right,
            keep_next,
        ));
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
    // consecutive tables would merge without a paragraph between them
    out.push_str(r#"<w:p><w:pPr><w:pStyle w:val="TableSpacer"/></w:pPr></w:p>"#);
    out
}

fn section_properties_xml(config: &RenderConfig) -> String {
    let p = &config.page;
    format!(
        concat!(
            r#"<w:sectPr><w:footerReference w:type="default" r:id="{rid}"/>"#,
            r#"<w:pgSz w:w="{w}" w:h="{h}"/>"#,
            r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="720" w:footer="{footer}" w:gutter="0"/>"#,
            "</w:sectPr>"
        ),
        rid = FOOTER_REL_ID,
        w = twips(p.width),
        h = twips(p.height),
        top = twips(p.margin_top),
        right = twips(p.margin_right),
        bottom = twips(p.margin_bottom),
        left = twips(p.margin_left),
        footer = twips(p.footer_margin),
    )
}

fn document_xml(units: &[Unit], config: &RenderConfig) -> String {
    let content_width = twips(config.page.content_width());
    let mut out = String::from(XML_DECL);
    out.push_str(&format!(
        r#"<w:document xmlns:w="{WML_NS}" xmlns:r="{REL_NS}"><w:body>"#
    ));
    for unit in units {
        match unit {
            Unit::Title(text) => {
                out.push_str(r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr>"#);
                out.push_str(&run_xml(text, false));
                out.push_str("</w:p>");
            }
            Unit::Heading {
                text,
                level,
                page_break_before,
            } => out.push_str(&heading_xml(text, *level, *page_break_before)),
            Unit::Table(table) => out.push_str(&table_xml(table, content_width)),
        }
    }
    out.push_str(&section_properties_xml(config));
    out.push_str("</w:body></w:document>");
    out
}
