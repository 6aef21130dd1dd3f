use serde::Serialize;

use crate::catalog::SectionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
    pub kind: ValueKind,
    /// Position of the line-item entry this row was read from; `None` for
    /// scalar fields.
    pub entry: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyValueTable {
    pub category: &'static str,
    pub rows: Vec<Row>,
    /// Number of line-item entries behind the rows (0 for scalar groups).
    pub entry_count: usize,
}

impl KeyValueTable {
    /// Rows to print when at most `limit` entries are itemized, plus the
    /// number of entries left out. Scalar rows are always kept.
    pub fn visible_rows(&self, limit: Option<usize>) -> (Vec<&Row>, usize) {
        let Some(limit) = limit else {
            return (self.rows.iter().collect(), 0);
        };
        let rows = self
            .rows
            .iter()
            .filter(|r| r.entry.is_none_or(|e| e < limit))
            .collect();
        (rows, self.entry_count.saturating_sub(limit))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        text: String,
        level: u8,
    },
    KeyValueTable(KeyValueTable),
    CategoryTotal {
        category: &'static str,
        label: String,
        amount: f64,
    },
    GrandTotal {
        label: String,
        amount: f64,
    },
    NetWorth {
        total_assets: f64,
        total_liabilities: f64,
        net_worth: f64,
    },
    /// Income before and after mandatory deductions. Derived once from the
    /// category totals; the section grand total stays their plain sum.
    NetIncome {
        gross_income: f64,
        deductions: f64,
        net_income: f64,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    pub id: SectionId,
    /// Start this section on a new page. Both renderers honour it, so they
    /// agree on section-to-page mapping.
    pub page_break_before: bool,
    pub blocks: Vec<ContentBlock>,
}

/// Renderer-agnostic statement: every heading, row and figure, in order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModel {
    pub title: String,
    /// Second footer line on every page.
    pub footer_caption: String,
    pub sections: Vec<Section>,
}

impl ContentModel {
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    pub fn category_total(&self, id: &str) -> Option<f64> {
        self.blocks().find_map(|b| match b {
            ContentBlock::CategoryTotal { category, amount, .. } if *category == id => Some(*amount),
            _ => None,
        })
    }

    pub fn section_total(&self, id: SectionId) -> Option<f64> {
        self.section(id)?.blocks.iter().find_map(|b| match b {
            ContentBlock::GrandTotal { amount, .. } => Some(*amount),
            _ => None,
        })
    }

    pub fn net_worth(&self) -> Option<f64> {
        self.blocks().find_map(|b| match b {
            ContentBlock::NetWorth { net_worth, .. } => Some(*net_worth),
            _ => None,
        })
    }

    pub fn net_income(&self) -> Option<f64> {
        self.blocks().find_map(|b| match b {
            ContentBlock::NetIncome { net_income, .. } => Some(*net_income),
            _ => None,
        })
    }

    /// Every labelled figure in document order: category totals, grand
    /// totals, net income and net worth.
    pub fn totals(&self) -> Vec<(String, f64)> {
        let mut out = Vec::new();
        for block in self.blocks() {
            match block {
                ContentBlock::CategoryTotal { label, amount, .. }
                | ContentBlock::GrandTotal { label, amount } => out.push((label.clone(), *amount)),
                ContentBlock::NetWorth { net_worth, .. } => {
                    out.push((NET_WORTH_LABEL.to_string(), *net_worth))
                }
                ContentBlock::NetIncome { net_income, .. } => {
                    out.push((NET_INCOME_LABEL.to_string(), *net_income))
                }
                _ => {}
            }
        }
        out
    }
}

pub const NET_WORTH_LABEL: &str = "NET WORTH";
pub const NET_INCOME_LABEL: &str = "NET INCOME";
pub const GROSS_INCOME_LABEL: &str = "GROSS INCOME";
pub const DEDUCTIONS_LABEL: &str = "LESS MANDATORY DEDUCTIONS";

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entry: Option<usize>) -> Row {
        Row {
            label: "x".into(),
            value: "y".into(),
            kind: ValueKind::Text,
            entry,
        }
    }

    #[test]
    fn visible_rows_slices_by_entry() {
        let table = KeyValueTable {
            category: "checking_accounts",
            rows: (0..5).flat_map(|e| [row(Some(e)), row(Some(e))]).collect(),
            entry_count: 5,
        };
        let (rows, hidden) = table.visible_rows(Some(2));
        assert_eq!(rows.len(), 4);
        assert_eq!(hidden, 3);

        let (rows, hidden) = table.visible_rows(None);
        assert_eq!(rows.len(), 10);
        assert_eq!(hidden, 0);

        let (rows, hidden) = table.visible_rows(Some(9));
        assert_eq!(rows.len(), 10);
        assert_eq!(hidden, 0);
    }

    #[test]
    fn scalar_rows_survive_truncation() {
        let table = KeyValueTable {
            category: "cash",
            rows: vec![row(None)],
            entry_count: 0,
        };
        let (rows, hidden) = table.visible_rows(Some(0));
        assert_eq!(rows.len(), 1);
        assert_eq!(hidden, 0);
    }
}
