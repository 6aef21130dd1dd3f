//! Presentation pass shared by both renderers.
//!
//! Turns the [`ContentModel`] into a flat list of [`Unit`]s: headings and
//! two-column tables whose rows already carry their final text and style.
//! A category's rows and its total form one table, so "keep the total with
//! its table" is a property of the unit rather than something each renderer
//! must remember. Nothing is computed here; amounts are only formatted.

use crate::catalog::{SectionId, TOTAL_ASSETS_LABEL, TOTAL_LIABILITIES_LABEL};
use crate::config::RenderConfig;
use crate::model::{
    ContentBlock, ContentModel, DEDUCTIONS_LABEL, GROSS_INCOME_LABEL, KeyValueTable,
    NET_INCOME_LABEL, NET_WORTH_LABEL, ValueKind,
};
use crate::money::format_currency;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowStyle {
    Normal,
    /// Bold, shaded, ruled above.
    Total,
    /// Truncation notice; plain text spanning the label column.
    Note,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresentRow {
    pub label: String,
    pub value: String,
    pub style: RowStyle,
    pub value_align: Align,
}

impl PresentRow {
    fn total(label: &str, amount: f64) -> Self {
        Self {
            label: label.to_string(),
            value: format_currency(amount),
            style: RowStyle::Total,
            value_align: Align::Right,
        }
    }

    fn figure(label: &str, amount: f64) -> Self {
        Self {
            label: label.to_string(),
            value: format_currency(amount),
            style: RowStyle::Normal,
            value_align: Align::Right,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableUnit {
    pub section: SectionId,
    /// `None` for section-level figures (grand totals, net income, net worth).
    pub category: Option<&'static str>,
    /// Label column width as a fraction of the content width.
    pub label_fraction: f32,
    pub rows: Vec<PresentRow>,
}

impl TableUnit {
    pub fn total_row(&self) -> Option<&PresentRow> {
        self.rows.last().filter(|r| r.style == RowStyle::Total)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Unit {
    Title(String),
    Heading {
        text: String,
        level: u8,
        page_break_before: bool,
    },
    Table(TableUnit),
}

pub fn truncation_note(hidden: usize) -> String {
    let noun = if hidden == 1 { "entry" } else { "entries" };
    format!("{hidden} additional {noun} not itemized (included in total)")
}

/// Flatten the model into presentation units, in document order.
pub fn present(model: &ContentModel, config: &RenderConfig) -> Vec<Unit> {
    let ratios = &config.column_ratios;
    let mut units = vec![Unit::Title(model.title.clone())];

    for section in &model.sections {
        let mut pending: Option<TableUnit> = None;
        let flush = |pending: &mut Option<TableUnit>, units: &mut Vec<Unit>| {
            if let Some(table) = pending.take() {
                units.push(Unit::Table(table));
            }
        };

        for (idx, block) in section.blocks.iter().enumerate() {
            match block {
                ContentBlock::Heading { text, level } => {
                    flush(&mut pending, &mut units);
                    units.push(Unit::Heading {
                        text: text.clone(),
                        level: *level,
                        page_break_before: idx == 0 && section.page_break_before,
                    });
                }
                ContentBlock::KeyValueTable(table) => {
                    flush(&mut pending, &mut units);
                    let limit = config.detail_limit(table.category);
                    pending = Some(TableUnit {
                        section: section.id,
                        category: Some(table.category),
                        label_fraction: ratios.label_fraction(section.id, Some(table.category)),
                        rows: table_rows(table, limit),
                    });
                }
                ContentBlock::CategoryTotal {
                    category,
                    label,
                    amount,
                } => {
                    let row = PresentRow::total(label, *amount);
                    match pending.as_mut() {
                        Some(table) if table.category == Some(*category) => table.rows.push(row),
                        _ => {
                            flush(&mut pending, &mut units);
                            pending = Some(TableUnit {
                                section: section.id,
                                category: Some(*category),
                                label_fraction: ratios.label_fraction(section.id, Some(*category)),
                                rows: vec![row],
                            });
                        }
                    }
                }
                ContentBlock::GrandTotal { label, amount } => {
                    flush(&mut pending, &mut units);
                    units.push(Unit::Table(TableUnit {
                        section: section.id,
                        category: None,
                        label_fraction: ratios.label_fraction(section.id, None),
                        rows: vec![PresentRow::total(label, *amount)],
                    }));
                }
                ContentBlock::NetWorth {
                    total_assets,
                    total_liabilities,
                    net_worth,
                } => {
                    flush(&mut pending, &mut units);
                    units.push(Unit::Table(TableUnit {
                        section: section.id,
                        category: None,
                        label_fraction: ratios.label_fraction(section.id, None),
                        rows: vec![
                            PresentRow::figure(TOTAL_ASSETS_LABEL, *total_assets),
                            PresentRow::figure(TOTAL_LIABILITIES_LABEL, *total_liabilities),
                            PresentRow::total(NET_WORTH_LABEL, *net_worth),
                        ],
                    }));
                }
                ContentBlock::NetIncome {
                    gross_income,
                    deductions,
                    net_income,
                } => {
                    flush(&mut pending, &mut units);
                    units.push(Unit::Table(TableUnit {
                        section: section.id,
                        category: None,
                        label_fraction: ratios.label_fraction(section.id, None),
                        rows: vec![
                            PresentRow::figure(GROSS_INCOME_LABEL, *gross_income),
                            PresentRow::figure(DEDUCTIONS_LABEL, *deductions),
                            PresentRow::total(NET_INCOME_LABEL, *net_income),
                        ],
                    }));
                }
            }
        }
        flush(&mut pending, &mut units);
    }
    units
}

fn table_rows(table: &KeyValueTable, limit: Option<usize>) -> Vec<PresentRow> {
    let (visible, hidden) = table.visible_rows(limit);
    let mut rows: Vec<PresentRow> = visible
        .into_iter()
        .map(|row| PresentRow {
            label: row.label.clone(),
            value: row.value.clone(),
            style: RowStyle::Normal,
            value_align: match row.kind {
                ValueKind::Money => Align::Right,
                ValueKind::Text => Align::Left,
            },
        })
        .collect();
    if hidden > 0 {
        log::debug!(
            "{}: itemizing {} of {} entries",
            table.category,
            table.entry_count - hidden,
            table.entry_count
        );
        rows.push(PresentRow {
            label: truncation_note(hidden),
            value: String::new(),
            style: RowStyle::Note,
            value_align: Align::Left,
        });
    }
    rows
}
