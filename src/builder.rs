//! Builds the [`ContentModel`] from a [`FormDataTree`] in one pass.

use std::collections::HashMap;

use serde_json::Value;

use crate::aggregate::{category_total, resolve_entries};
use crate::catalog::{
    CategoryDef, FieldDef, FieldKind, JURISDICTIONS, SECTIONS, SectionId, Source,
};
use crate::model::{ContentBlock, ContentModel, KeyValueTable, Row, Section, ValueKind};
use crate::money::{PLACEHOLDER, format_date, safe_text, to_currency_text};
use crate::tree::{FieldMap, FormDataTree, SubTree};

pub const DOCUMENT_TITLE: &str = "FINANCIAL STATEMENT";
pub const NONE_REPORTED: &str = "None reported";

/// Build the statement. Pure and deterministic: the same tree always yields
/// an equal model.
pub fn build(tree: &FormDataTree) -> ContentModel {
    for which in tree.malformed_subtrees() {
        log::warn!(
            "sub-tree '{}' is not an object, its sections render empty",
            which.json_key()
        );
    }

    let mut grand_totals: HashMap<SectionId, f64> = HashMap::new();
    let mut sections = Vec::with_capacity(SECTIONS.len());

    for (idx, def) in SECTIONS.iter().enumerate() {
        let mut blocks = vec![ContentBlock::Heading {
            text: def.id.title().to_string(),
            level: 1,
        }];
        let mut section_sum = 0.0;
        let mut deductions = None;

        for cat in def.categories {
            let subtree = tree.subtree(cat.subtree);
            blocks.push(ContentBlock::Heading {
                text: cat.label.to_string(),
                level: 2,
            });
            blocks.push(ContentBlock::KeyValueTable(build_table(cat, subtree)));

            if cat.is_totaled() {
                let amount = category_total(cat, subtree);
                section_sum += amount;
                if cat.is_deduction() {
                    *deductions.get_or_insert(0.0) += amount;
                }
                blocks.push(ContentBlock::CategoryTotal {
                    category: cat.id,
                    label: format!("TOTAL: {}", cat.label),
                    amount,
                });
            }
        }

        if let Some(label) = def.grand_total {
            blocks.push(ContentBlock::GrandTotal {
                label: label.to_string(),
                amount: section_sum,
            });
            grand_totals.insert(def.id, section_sum);
        }

        if let Some(deductions) = deductions {
            let gross_income = section_sum - deductions;
            blocks.push(ContentBlock::NetIncome {
                gross_income,
                deductions,
                net_income: gross_income - deductions,
            });
        }

        if def.id == SectionId::Liabilities {
            let total_assets = grand_totals.get(&SectionId::Assets).copied().unwrap_or(0.0);
            blocks.push(ContentBlock::NetWorth {
                total_assets,
                total_liabilities: section_sum,
                net_worth: total_assets - section_sum,
            });
        }

        sections.push(Section {
            id: def.id,
            page_break_before: idx > 0,
            blocks,
        });
    }

    ContentModel {
        title: DOCUMENT_TITLE.to_string(),
        footer_caption: footer_caption(tree.subtree(SubTree::FamilyData)),
        sections,
    }
}

fn build_table(cat: &CategoryDef, subtree: Option<&FieldMap>) -> KeyValueTable {
    match cat.source {
        Source::Scalars { fields } => KeyValueTable {
            category: cat.id,
            rows: fields
                .iter()
                .map(|f| Row {
                    label: f.label.to_string(),
                    value: field_value(f, subtree.and_then(|m| m.get(f.key))),
                    kind: value_kind(f),
                    entry: None,
                })
                .collect(),
            entry_count: 0,
        },
        Source::Entries { key, fields } => {
            let items = resolve_entries(subtree, key);
            let rows = if items.is_empty() {
                vec![Row {
                    label: NONE_REPORTED.to_string(),
                    value: String::new(),
                    kind: ValueKind::Text,
                    entry: None,
                }]
            } else {
                items
                    .iter()
                    .enumerate()
                    .flat_map(|(i, entry)| {
                        fields.iter().map(move |f| Row {
                            label: format!("#{} {}", i + 1, f.label),
                            value: field_value(f, entry.get(f.key)),
                            kind: value_kind(f),
                            entry: Some(i),
                        })
                    })
                    .collect()
            };
            KeyValueTable {
                category: cat.id,
                rows,
                entry_count: items.len(),
            }
        }
    }
}

fn value_kind(f: &FieldDef) -> ValueKind {
    match f.kind {
        FieldKind::Money(_) => ValueKind::Money,
        _ => ValueKind::Text,
    }
}

fn field_value(f: &FieldDef, value: Option<&Value>) -> String {
    match f.kind {
        FieldKind::Text => safe_text(value, PLACEHOLDER),
        FieldKind::Date => format_date(value, PLACEHOLDER),
        FieldKind::Jurisdiction => normalize_jurisdiction(value),
        FieldKind::Money(policy) => to_currency_text(value, policy),
    }
}

fn footer_caption(family: Option<&FieldMap>) -> String {
    let get = |key: &str| safe_text(family.and_then(|m| m.get(key)), PLACEHOLDER);
    format!(
        "Docket No. {}    {} v. {}",
        get("docketNumber"),
        get("plaintiff"),
        get("defendant")
    )
}

/// Canonicalize a free-text court location to its official name. Unknown
/// names are title-cased; an absent one prints the placeholder.
pub fn normalize_jurisdiction(value: Option<&Value>) -> String {
    let raw = safe_text(value, "");
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    let core = strip_affixes(&raw);
    let key = match_key(core);
    if key.is_empty() {
        return PLACEHOLDER.to_string();
    }

    JURISDICTIONS
        .iter()
        .find(|official| match_key(official) == key)
        .or_else(|| {
            // "Bridgeport" names the seat of "Fairfield at Bridgeport"
            JURISDICTIONS
                .iter()
                .find(|official| official.split(" at ").any(|part| match_key(part) == key))
        })
        .map(|official| official.to_string())
        .unwrap_or_else(|| title_case(core))
}

fn strip_affixes(raw: &str) -> &str {
    const PREFIXES: [&str; 3] = ["judicial district of ", "j.d. of ", "jd of "];
    const SUFFIXES: [&str; 3] = [" judicial district", " county", " j.d."];

    let mut s = raw.trim();
    // ASCII lowercasing keeps byte offsets aligned with `s`
    let lower = s.to_ascii_lowercase();
    if let Some(p) = PREFIXES.iter().find(|p| lower.starts_with(*p)) {
        s = s[p.len()..].trim_start();
    }
    let lower = s.to_ascii_lowercase();
    if let Some(x) = SUFFIXES.iter().find(|x| lower.ends_with(*x)) {
        s = s[..s.len() - x.len()].trim_end();
    }
    s
}

fn match_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn title_case(s: &str) -> String {
    const SMALL: [&str; 4] = ["at", "of", "and", "the"];
    s.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && SMALL.contains(&lower.as_str()) {
                return lower;
            }
            lower
                .split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
