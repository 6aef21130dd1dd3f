mod common;

use common::{docx_paragraphs, docx_part, docx_part_names, load_fixture, test_config};
use statement_render::catalog::SectionId;
use statement_render::{build, export_flow_with, render_flow};

fn complete_docx() -> Vec<u8> {
    export_flow_with(&load_fixture("complete"), &test_config()).expect("docx renders")
}

#[test]
fn package_has_every_part() {
    let _ = env_logger::try_init();
    let docx = complete_docx();
    let mut names = docx_part_names(&docx);
    names.sort();
    let mut expected = vec![
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/app.xml",
        "docProps/core.xml",
        "word/_rels/document.xml.rels",
        "word/document.xml",
        "word/footer1.xml",
        "word/settings.xml",
        "word/styles.xml",
    ];
    expected.sort();
    assert_eq!(names, expected);

    for name in &names {
        let xml = docx_part(&docx, name).unwrap();
        roxmltree::Document::parse(&xml).unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn sections_after_the_first_break_pages() {
    let docx = complete_docx();
    let xml = docx_part(&docx, "word/document.xml").unwrap();
    assert_eq!(
        xml.matches("<w:pageBreakBefore/>").count(),
        SectionId::ORDER.len() - 1
    );

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let breaking: Vec<String> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "p")
        .filter(|p| p.descendants().any(|n| n.tag_name().name() == "pageBreakBefore"))
        .map(|p| {
            p.descendants()
                .filter(|n| n.tag_name().name() == "t")
                .filter_map(|n| n.text())
                .collect()
        })
        .collect();
    let titles: Vec<String> = SectionId::ORDER[1..].iter().map(|s| s.title().to_string()).collect();
    assert_eq!(breaking, titles);
}

#[test]
fn footer_numbers_pages_with_fields() {
    let docx = complete_docx();
    let footer = docx_part(&docx, "word/footer1.xml").unwrap();
    assert!(footer.contains(" PAGE "));
    assert!(footer.contains(" NUMPAGES "));

    let lines = docx_paragraphs(&docx, "word/footer1.xml");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("FS-1 Rev. 06/2021\tPage "));
    assert_eq!(
        lines[1],
        "Docket No. NNH-FA-24-6012345-S    Jordan A. Reyes v. Casey M. Reyes"
    );

    let document = docx_part(&docx, "word/document.xml").unwrap();
    assert!(document.contains(r#"<w:footerReference w:type="default" r:id="rId3"/>"#));
}

#[test]
fn page_setup_matches_fixed_layout() {
    let docx = complete_docx();
    let document = docx_part(&docx, "word/document.xml").unwrap();
    assert!(document.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
    assert!(document.contains(r#"w:top="1440" w:right="1440" w:bottom="1440" w:left="1440""#));

    let styles = docx_part(&docx, "word/styles.xml").unwrap();
    assert!(styles.contains(r#"w:ascii="Times New Roman""#));
}

#[test]
fn rows_do_not_split_across_pages() {
    let docx = complete_docx();
    let document = docx_part(&docx, "word/document.xml").unwrap();
    let rows = document.matches("<w:tr>").count();
    assert!(rows > 0);
    assert_eq!(document.matches("<w:cantSplit/>").count(), rows);
}

#[test]
fn free_text_keeps_its_line_breaks() {
    let docx = complete_docx();
    let paragraphs = docx_paragraphs(&docx, "word/document.xml");
    assert!(paragraphs.iter().any(|p| p
        == "Plaintiff's hours were reduced in March 2024.\nPlaintiff expects to return to full time in 2025."));
}

#[test]
fn jurisdiction_is_canonicalized() {
    let paragraphs = docx_paragraphs(&complete_docx(), "word/document.xml");
    let i = paragraphs
        .iter()
        .position(|p| p == "Judicial District")
        .expect("jurisdiction row");
    assert_eq!(paragraphs[i + 1], "New Haven");
}

#[test]
fn output_is_byte_identical_across_runs() {
    let model = build(&load_fixture("complete"));
    let config = test_config();
    assert_eq!(render_flow(&model, &config).unwrap(), render_flow(&model, &config).unwrap());
}
