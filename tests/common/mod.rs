#![allow(dead_code)]

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use statement_render::{FormDataTree, RenderConfig};

/// Discover JSON fixtures. Filter with STATEMENT_CASE (file stem).
pub fn discover_fixtures() -> io::Result<Vec<PathBuf>> {
    let case_filter = std::env::var("STATEMENT_CASE").ok();
    let mut fixtures: Vec<PathBuf> = fs::read_dir("tests/fixtures")?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|x| x == "json"))
        .filter(|p| match &case_filter {
            Some(filter) => case_name(p) == *filter,
            None => true,
        })
        .collect();
    fixtures.sort();
    Ok(fixtures)
}

pub fn case_name(fixture: &Path) -> String {
    fixture
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn load_fixture(name: &str) -> FormDataTree {
    let path = Path::new("tests/fixtures").join(format!("{name}.json"));
    load_tree(&path)
}

pub fn load_tree(path: &Path) -> FormDataTree {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    FormDataTree::from_json_slice(&bytes).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

/// Default configuration with the standard Times faces, so tests do not
/// depend on installed fonts and PDF text stays WinAnsi-encoded.
pub fn test_config() -> RenderConfig {
    let mut config = RenderConfig::default();
    config.fonts.embed_system_fonts = false;
    config
}

/// Shown strings of every page, in page order. Each inner vec holds one
/// entry per text-showing operator.
pub fn pdf_page_strings(pdf: &[u8]) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    let mut pos = 0;
    while let Some(start) = find(pdf, b"stream", pos) {
        let mut body = start + b"stream".len();
        if pdf.get(body) == Some(&b'\r') {
            body += 1;
        }
        if pdf.get(body) == Some(&b'\n') {
            body += 1;
        }
        let Some(end) = find(pdf, b"endstream", body) else {
            break;
        };
        pos = end + b"endstream".len();
        let mut raw = &pdf[body..end];
        if raw.last() == Some(&b'\n') {
            raw = &raw[..raw.len() - 1];
        }
        if raw.last() == Some(&b'\r') {
            raw = &raw[..raw.len() - 1];
        }
        if let Ok(decoded) = miniz_oxide::inflate::decompress_to_vec_zlib(raw) {
            if decoded.windows(2).any(|w| w == b"Tj") {
                pages.push(shown_strings(&decoded));
            }
        }
    }
    pages
}

pub fn pdf_text(pdf: &[u8]) -> String {
    pdf_page_strings(pdf)
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Literal `(..)` and hex `<..>` strings of a content stream, decoded as
/// Latin-1 (WinAnsi agrees with it on every character the fixtures use).
fn shown_strings(content: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < content.len() {
        match content[i] {
            b'(' => {
                let mut depth = 1;
                let mut bytes = Vec::new();
                i += 1;
                while i < content.len() && depth > 0 {
                    match content[i] {
                        b'\\' if i + 1 < content.len() => {
                            i += 1;
                            match content[i] {
                                b'n' => bytes.push(b'\n'),
                                b'r' => bytes.push(b'\r'),
                                b't' => bytes.push(b'\t'),
                                b'0'..=b'7' => {
                                    let mut v = 0u32;
                                    let mut n = 0;
                                    while n < 3 && i < content.len() && (b'0'..=b'7').contains(&content[i]) {
                                        v = v * 8 + (content[i] - b'0') as u32;
                                        i += 1;
                                        n += 1;
                                    }
                                    bytes.push(v as u8);
                                    continue;
                                }
                                other => bytes.push(other),
                            }
                        }
                        b'(' => {
                            depth += 1;
                            bytes.push(b'(');
                        }
                        b')' => {
                            depth -= 1;
                            if depth > 0 {
                                bytes.push(b')');
                            }
                        }
                        b => bytes.push(b),
                    }
                    i += 1;
                }
                out.push(bytes.iter().map(|&b| b as char).collect());
            }
            b'<' => {
                let close = content[i..].iter().position(|&b| b == b'>').map(|p| p + i);
                let Some(close) = close else { break };
                let hex: Vec<u8> = content[i + 1..close]
                    .iter()
                    .copied()
                    .filter(u8::is_ascii_hexdigit)
                    .collect();
                let bytes: Vec<u8> = hex
                    .chunks(2)
                    .map(|pair| {
                        let s = std::str::from_utf8(pair).unwrap_or("0");
                        let v = u8::from_str_radix(s, 16).unwrap_or(0);
                        if pair.len() == 1 { v << 4 } else { v }
                    })
                    .collect();
                out.push(bytes.iter().map(|&b| b as char).collect());
                i = close + 1;
            }
            _ => i += 1,
        }
    }
    out
}

pub fn docx_part(docx: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(io::Cursor::new(docx)).ok()?;
    let mut file = archive.by_name(name).ok()?;
    let mut xml = String::new();
    file.read_to_string(&mut xml).ok()?;
    Some(xml)
}

pub fn docx_part_names(docx: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(io::Cursor::new(docx)).expect("docx is a zip");
    archive.file_names().map(str::to_string).collect()
}

/// Text of every `w:p` in a part, one string per paragraph. Line breaks
/// inside a paragraph come back as `\n`.
pub fn docx_paragraphs(docx: &[u8], part: &str) -> Vec<String> {
    let xml = docx_part(docx, part).unwrap_or_else(|| panic!("missing part {part}"));
    let doc = roxmltree::Document::parse(&xml).expect("part is well-formed XML");
    doc.descendants()
        .filter(|n| n.tag_name().name() == "p")
        .map(|p| {
            let mut text = String::new();
            for n in p.descendants() {
                match n.tag_name().name() {
                    "t" => text.push_str(n.text().unwrap_or("")),
                    "br" => text.push('\n'),
                    "tab" if n.parent().is_some_and(|r| r.tag_name().name() == "r") => text.push('\t'),
                    _ => {}
                }
            }
            text
        })
        .collect()
}

pub fn docx_text(docx: &[u8]) -> String {
    docx_paragraphs(docx, "word/document.xml").join("\n")
}
