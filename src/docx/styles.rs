use crate::config::{FontConfig, RenderConfig};

use super::{REL_NS, WML_NS, XML_DECL, escape_xml, half_points, run_xml, twips};

fn paragraph_style(id: &str, name: &str, ppr: &str, rpr: &str) -> String {
    format!(
        concat!(
            r#"<w:style w:type="paragraph" w:styleId="{id}">"#,
            r#"<w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:qFormat/>"#,
            "<w:pPr>{ppr}</w:pPr><w:rPr>{rpr}</w:rPr></w:style>"
        ),
        id = id,
        name = name,
        ppr = ppr,
        rpr = rpr,
    )
}

pub(super) fn styles_xml(fonts: &FontConfig) -> String {
    let family = escape_xml(&fonts.family);
    let body = half_points(fonts.body_size);
    let mut out = String::from(XML_DECL);
    out.push_str(&format!(r#"<w:styles xmlns:w="{WML_NS}">"#));
    out.push_str(&format!(
        concat!(
            "<w:docDefaults><w:rPrDefault><w:rPr>",
            r#"<w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:eastAsia="{f}" w:cs="{f}"/>"#,
            r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/><w:lang w:val="en-US"/>"#,
            "</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr>",
            r#"<w:spacing w:after="0" w:line="240" w:lineRule="auto"/>"#,
            "</w:pPr></w:pPrDefault></w:docDefaults>"
        ),
        f = family,
        sz = body,
    ));
    out.push_str(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    );

    let bold_size = |pt: f32| {
        let hp = half_points(pt);
        format!(r#"<w:b/><w:bCs/><w:sz w:val="{hp}"/><w:szCs w:val="{hp}"/>"#)
    };
    out.push_str(&paragraph_style(
        "Title",
        "Title",
        r#"<w:jc w:val="center"/><w:spacing w:after="280"/>"#,
        &bold_size(fonts.title_size),
    ));
    out.push_str(&paragraph_style(
        "Heading1",
        "heading 1",
        r#"<w:keepNext/><w:spacing w:before="200" w:after="80"/><w:outlineLvl w:val="0"/>"#,
        &bold_size(fonts.heading_size),
    ));
    out.push_str(&paragraph_style(
        "Heading2",
        "heading 2",
        r#"<w:keepNext/><w:spacing w:before="160" w:after="60"/><w:outlineLvl w:val="1"/>"#,
        &bold_size(fonts.body_size + 1.0),
    ));
    out.push_str(&paragraph_style(
        "TableText",
        "Table Text",
        r#"<w:spacing w:before="60" w:after="60"/>"#,
        "",
    ));
    out.push_str(&paragraph_style(
        "TableSpacer",
        "Table Spacer",
        r#"<w:spacing w:after="0" w:line="160" w:lineRule="exact"/>"#,
        r#"<w:sz w:val="8"/>"#,
    ));
    let footer = half_points(fonts.footer_size);
    out.push_str(&paragraph_style(
        "Footer",
        "footer",
        "",
        &format!(r#"<w:sz w:val="{footer}"/><w:szCs w:val="{footer}"/>"#),
    ));
    out.push_str("</w:styles>");
    out
}

pub(super) fn settings_xml() -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(&format!(r#"<w:settings xmlns:w="{WML_NS}">"#));
    out.push_str(r#"<w:zoom w:percent="100"/><w:defaultTabStop w:val="720"/>"#);
    out.push_str(r#"<w:characterSpacingControl w:val="doNotCompress"/>"#);
    out.push_str(r#"<w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>"#);
    out.push_str("</w:settings>");
    out
}

fn field_xml(instr: &str, placeholder: &str) -> String {
    format!(
        concat!(
            r#"<w:r><w:fldChar w:fldCharType="begin"/></w:r>"#,
            r#"<w:r><w:instrText xml:space="preserve"> {instr} </w:instrText></w:r>"#,
            r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r>"#,
            "<w:r><w:t>{placeholder}</w:t></w:r>",
            r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#
        ),
        instr = instr,
        placeholder = placeholder,
    )
}

/// Two footer lines matching the fixed layout: revision marker left and
/// "Page i of N" at a right tab, then the case caption.
pub(super) fn footer_xml(config: &RenderConfig, caption: &str) -> String {
    let right_tab = twips(config.page.content_width());
    let mut out = String::from(XML_DECL);
    out.push_str(&format!(r#"<w:ftr xmlns:w="{WML_NS}" xmlns:r="{REL_NS}">"#));
    out.push_str(&format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Footer"/><w:tabs><w:tab w:val="right" w:pos="{right_tab}"/></w:tabs></w:pPr>"#
    ));
    out.push_str(&run_xml(&config.revision_marker, false));
    out.push_str(r#"<w:r><w:tab/><w:t xml:space="preserve">Page </w:t></w:r>"#);
    out.push_str(&field_xml("PAGE", "1"));
    out.push_str(r#"<w:r><w:t xml:space="preserve"> of </w:t></w:r>"#);
    out.push_str(&field_xml("NUMPAGES", "1"));
    out.push_str("</w:p>");
    out.push_str(r#"<w:p><w:pPr><w:pStyle w:val="Footer"/></w:pPr>"#);
    out.push_str(&run_xml(caption, false));
    out.push_str("</w:p></w:ftr>");
    out
}

/// Title only; no author or timestamps so output is reproducible.
pub(super) fn core_xml(title: &str) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/">"#
    ));
    out.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    out.push_str("</cp:coreProperties>");
    out
}

pub(super) fn app_xml() -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#);
    out.push_str(&format!(
        "<Application>{} {}</Application>",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    out.push_str("</Properties>");
    out
}
