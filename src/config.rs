//! Rendering configuration shared by both renderers.
//!
//! Page geometry, fonts and column proportions are plain data consumed
//! identically by the PDF and DOCX paths, so the two outputs stay
//! structurally alike. Every field has a default; a JSON file may override
//! any subset of them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::SectionId;
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Points (1/72 inch). Default is US Letter.
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Distance from the bottom edge to the last footer baseline.
    pub footer_margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin_top: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
            footer_margin: 36.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn printable_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub body_size: f32,
    pub heading_size: f32,
    pub title_size: f32,
    pub footer_size: f32,
    /// Look the family up in system font directories and embed it. When off,
    /// or when the family is not installed, the standard Times fonts are used.
    pub embed_system_fonts: bool,
    /// Searched before the platform font directories.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Times New Roman".to_string(),
            body_size: 10.0,
            heading_size: 12.0,
            title_size: 16.0,
            footer_size: 8.0,
            embed_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// Width of the label column as a fraction of the content width, keyed by
/// section with optional per-category overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRatios {
    pub default: f32,
    pub sections: BTreeMap<String, f32>,
    pub categories: BTreeMap<String, f32>,
}

impl Default for ColumnRatios {
    fn default() -> Self {
        let sections = [
            (SectionId::FamilyData, 0.65),
            (SectionId::Expenses, 0.80),
            (SectionId::Income, 0.75),
            (SectionId::Assets, 0.75),
            (SectionId::Liabilities, 0.75),
            (SectionId::AssetsTransferred, 0.70),
            (SectionId::Fees, 0.70),
            (SectionId::OtherCircumstances, 0.30),
        ]
        .into_iter()
        .map(|(id, r)| (id.key().to_string(), r))
        .collect();
        Self {
            default: 0.70,
            sections,
            categories: BTreeMap::new(),
        }
    }
}

impl ColumnRatios {
    pub fn label_fraction(&self, section: SectionId, category: Option<&str>) -> f32 {
        category
            .and_then(|c| self.categories.get(c))
            .or_else(|| self.sections.get(section.key()))
            .copied()
            .unwrap_or(self.default)
            .clamp(0.1, 0.95)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub page: PageGeometry,
    pub fonts: FontConfig,
    pub column_ratios: ColumnRatios,
    /// Maximum number of itemized entries per category id. Totals always
    /// cover every entry.
    pub detail_limits: BTreeMap<String, usize>,
    /// Printed at the left of the footer on every page.
    pub revision_marker: String,
    pub max_pages: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            fonts: FontConfig::default(),
            column_ratios: ColumnRatios::default(),
            detail_limits: [("checking_accounts", 2), ("savings_accounts", 2)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            revision_marker: "FS-1 Rev. 06/2021".to_string(),
            max_pages: 500,
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `STATEMENT_FONTS` (extra font directories, `:`-separated, `;`
    /// on Windows) and `STATEMENT_NO_EMBED` (force the standard fonts).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("STATEMENT_FONTS") {
            let sep = if cfg!(windows) { ';' } else { ':' };
            for part in val.split(sep) {
                let trimmed = part.trim();
                if !trimmed.is_empty() {
                    self.fonts.font_dirs.push(PathBuf::from(trimmed));
                }
            }
        }
        if std::env::var_os("STATEMENT_NO_EMBED").is_some() {
            self.fonts.embed_system_fonts = false;
        }
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        let p = &self.page;
        if p.content_width() <= 36.0 || p.printable_height() <= 72.0 {
            return Err(Error::Config(format!(
                "margins leave no room for content on a {}x{} page",
                p.width, p.height
            )));
        }
        if p.footer_margin <= 0.0 || p.footer_margin >= p.margin_bottom {
            return Err(Error::Config(
                "footer_margin must lie between the page edge and the bottom margin".into(),
            ));
        }
        let f = &self.fonts;
        if [f.body_size, f.heading_size, f.title_size, f.footer_size]
            .iter()
            .any(|s| !(4.0..=72.0).contains(s))
        {
            return Err(Error::Config("font sizes must be between 4pt and 72pt".into()));
        }
        if self.max_pages == 0 {
            return Err(Error::Config("max_pages must be at least 1".into()));
        }
        let ratios = &self.column_ratios;
        let bad_ratio = std::iter::once(&ratios.default)
            .chain(ratios.sections.values())
            .chain(ratios.categories.values())
            .any(|r| !(*r > 0.0 && *r < 1.0));
        if bad_ratio {
            return Err(Error::Config("column ratios must be strictly between 0 and 1".into()));
        }
        Ok(())
    }

    pub fn detail_limit(&self, category: &str) -> Option<usize> {
        self.detail_limits.get(category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        config.validate().unwrap();
        assert_eq!(config.page.content_width(), 468.0);
        assert_eq!(config.detail_limit("checking_accounts"), Some(2));
        assert_eq!(config.detail_limit("credit_cards"), None);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let config: RenderConfig = serde_json::from_str(
            r#"{"revision_marker": "X-1", "page": {"width": 595.0, "height": 842.0},
                "column_ratios": {"categories": {"cash": 0.5}}}"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.revision_marker, "X-1");
        assert_eq!(config.page.margin_left, 72.0);
        assert_eq!(config.fonts.family, "Times New Roman");
        assert_eq!(config.column_ratios.label_fraction(SectionId::Assets, Some("cash")), 0.5);
        assert_eq!(config.column_ratios.label_fraction(SectionId::Assets, Some("x")), 0.75);
        assert_eq!(config.column_ratios.label_fraction(SectionId::Expenses, None), 0.80);
    }

    #[test]
    fn rejects_impossible_geometry() {
        let mut config = RenderConfig::default();
        config.page.margin_left = 300.0;
        config.page.margin_right = 300.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = RenderConfig::default();
        config.column_ratios.default = 1.5;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.max_pages = 0;
        assert!(config.validate().is_err());
    }
}
