mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{load_fixture, test_config};
use statement_render::catalog::SectionId;
use statement_render::{LayoutReport, RenderConfig, build, render_fixed_with_report};

/// Upright faces likely to be installed on a test machine.
const CANDIDATE_FAMILIES: [&str; 4] = ["DejaVu Serif", "Liberation Serif", "Times New Roman", "Noto Serif"];

fn platform_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![
        "/usr/share/fonts".into(),
        "/usr/local/share/fonts".into(),
        "/Library/Fonts".into(),
        "/System/Library/Fonts".into(),
        "C:\\Windows\\Fonts".into(),
    ];
    if let Ok(home) = std::env::var("HOME") {
        dirs.push(Path::new(&home).join(".local/share/fonts"));
    }
    dirs
}

fn family_of(path: &Path) -> Option<String> {
    let data = fs::read(path).ok()?;
    let face = ttf_parser::Face::parse(&data, 0).ok()?;
    if face.is_italic() || face.is_bold() {
        return None;
    }
    face.names()
        .into_iter()
        .find(|n| n.name_id == ttf_parser::name_id::FAMILY && n.is_unicode())
        .and_then(|n| n.to_string())
}

/// First installed candidate family, with the directory holding it.
fn installed_family() -> Option<(String, PathBuf)> {
    let mut found: Vec<(String, PathBuf)> = Vec::new();
    let mut stack = platform_font_dirs();
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                stack.push(path);
            } else if path
                .extension()
                .is_some_and(|x| x.eq_ignore_ascii_case("ttf"))
                && let Some(family) = family_of(&path)
                && CANDIDATE_FAMILIES.contains(&family.as_str())
            {
                found.push((family, dir.clone()));
            }
        }
    }
    CANDIDATE_FAMILIES
        .iter()
        .find_map(|want| found.iter().find(|(family, _)| family == want).cloned())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn render(config: &RenderConfig) -> (Vec<u8>, LayoutReport) {
    let model = build(&load_fixture("complete"));
    render_fixed_with_report(&model, config).expect("pdf renders")
}

#[test]
fn installed_family_is_embedded_as_cid_font() {
    let _ = env_logger::try_init();
    let Some((family, dir)) = installed_family() else {
        eprintln!("skipping: none of {CANDIDATE_FAMILIES:?} is installed");
        return;
    };
    println!("  embedding {family} from {}", dir.display());

    let mut config = test_config();
    config.fonts.embed_system_fonts = true;
    config.fonts.family = family.clone();
    config.fonts.font_dirs = vec![dir];
    let (pdf, report) = render(&config);

    assert!(contains(&pdf, b"/Type0"), "{family}: no Type0 font");
    assert!(contains(&pdf, b"/CIDFontType2"), "{family}: no CID descendant");
    assert!(contains(&pdf, b"/Identity-H"), "{family}: not GID-encoded");
    assert!(contains(&pdf, b"/ToUnicode"), "{family}: no ToUnicode map");
    assert!(contains(&pdf, b"/FontFile2"), "{family}: font program missing");
    assert!(!contains(&pdf, b"/Times-Roman"), "{family}: fell back to Times");

    // glyph widths change wrapping but never which rows are placed
    let (_, standard) = render(&test_config());
    assert_eq!(report.rows.len(), standard.rows.len());
    assert!(report.page_count >= SectionId::ORDER.len());
    for row in &report.rows {
        assert!(row.bottom >= report.margin_bottom - 0.01, "row {} overflows", row.row);
    }
}

#[test]
fn missing_family_falls_back_to_standard_fonts() {
    let _ = env_logger::try_init();
    let mut config = test_config();
    config.fonts.embed_system_fonts = true;
    config.fonts.family = "No Such Family 0042".to_string();
    let (pdf, report) = render(&config);
    let (_, standard) = render(&test_config());

    assert!(!contains(&pdf, b"/Type0"));
    assert!(contains(&pdf, b"/Times-Roman"));
    assert!(contains(&pdf, b"/Times-Bold"));
    assert_eq!(report.page_count, standard.page_count);
}
