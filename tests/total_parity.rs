mod common;

use std::path::Path;

use rayon::prelude::*;
use serde_json::json;

use common::{
    case_name, discover_fixtures, docx_paragraphs, load_fixture, load_tree, pdf_page_strings,
    test_config,
};
use statement_render::money::format_currency;
use statement_render::present::truncation_note;
use statement_render::{ContentModel, FormDataTree, build, render_fixed, render_flow};

/// Text runs of both documents: PDF shown strings (page content and
/// footers) and DOCX body paragraphs.
fn both_texts(model: &ContentModel) -> (Vec<String>, Vec<String>) {
    let config = test_config();
    let pdf = render_fixed(model, &config).expect("pdf renders");
    let docx = render_flow(model, &config).expect("docx renders");
    let pdf_strings = pdf_page_strings(&pdf).into_iter().flatten().collect();
    (pdf_strings, docx_paragraphs(&docx, "word/document.xml"))
}

/// Every occurrence of `label` is directly followed by `value`, and there
/// is at least one.
fn check_pair(strings: &[String], label: &str, value: &str) -> Result<(), String> {
    let hits: Vec<usize> = strings
        .iter()
        .enumerate()
        .filter(|(_, s)| s.as_str() == label)
        .map(|(i, _)| i)
        .collect();
    if hits.is_empty() {
        return Err(format!("'{label}' not found"));
    }
    for i in hits {
        let next = strings.get(i + 1).map(String::as_str).unwrap_or("<end>");
        if next != value {
            return Err(format!("'{label}' printed with '{next}', model says '{value}'"));
        }
    }
    Ok(())
}

fn check_fixture(path: &Path) -> Result<usize, String> {
    let model = build(&load_tree(path));
    let (pdf, docx) = both_texts(&model);
    let totals = model.totals();
    for (label, amount) in &totals {
        let value = format_currency(*amount);
        check_pair(&pdf, label, &value).map_err(|e| format!("pdf: {e}"))?;
        check_pair(&docx, label, &value).map_err(|e| format!("docx: {e}"))?;
    }
    Ok(totals.len())
}

#[test]
fn totals_match_across_formats() {
    let _ = env_logger::try_init();
    let fixtures = discover_fixtures().expect("fixtures directory");
    assert!(!fixtures.is_empty(), "no fixtures found");

    let results: Vec<(String, Result<usize, String>)> = fixtures
        .par_iter()
        .map(|path| (case_name(path), check_fixture(path)))
        .collect();

    let mut failures = Vec::new();
    for (name, result) in &results {
        match result {
            Ok(n) => println!("  {name:<16} {n} totals agree"),
            Err(e) => failures.push(format!("{name}: {e}")),
        }
    }
    assert!(failures.is_empty(), "total mismatches:\n{}", failures.join("\n"));
}

#[test]
fn single_credit_card_flows_to_liabilities() {
    let model = build(&load_fixture("credit_card"));
    assert_eq!(model.category_total("credit_cards"), Some(2500.0));

    let (pdf, docx) = both_texts(&model);
    for strings in [&pdf, &docx] {
        check_pair(strings, "TOTAL: Credit Card Debt", "$2,500.00").unwrap();
        check_pair(strings, "TOTAL LIABILITIES", "$2,500.00").unwrap();
        check_pair(strings, "NET WORTH", "-$2,500.00").unwrap();
    }
}

#[test]
fn net_worth_is_assets_minus_liabilities() {
    let model = build(&load_fixture("net_worth"));
    assert_eq!(model.net_worth(), Some(5500.0));

    let (pdf, docx) = both_texts(&model);
    for strings in [&pdf, &docx] {
        check_pair(strings, "TOTAL ASSETS", "$10,000.00").unwrap();
        check_pair(strings, "TOTAL LIABILITIES", "$4,500.00").unwrap();
        check_pair(strings, "NET WORTH", "$5,500.00").unwrap();
    }
}

#[test]
fn net_income_is_derived_from_total_income() {
    let tree = FormDataTree::from_value(json!({
        "income": {"employers": [{"grossAmount": "1000"}], "federalIncomeTax": "200"}
    }))
    .unwrap();
    let model = build(&tree);

    let (pdf, docx) = both_texts(&model);
    for strings in [&pdf, &docx] {
        check_pair(strings, "TOTAL INCOME", "$1,200.00").unwrap();
        check_pair(strings, "GROSS INCOME", "$1,000.00").unwrap();
        check_pair(strings, "LESS MANDATORY DEDUCTIONS", "$200.00").unwrap();
        check_pair(strings, "NET INCOME", "$800.00").unwrap();
    }
}

#[test]
fn huge_total_prints_as_one_string() {
    let tree = FormDataTree::from_value(json!({
        "expenses": {"otherExpenses": [{"description": "Estate upkeep", "amount": "12345678901234"}]}
    }))
    .unwrap();
    let model = build(&tree);

    let (pdf, docx) = both_texts(&model);
    for strings in [&pdf, &docx] {
        check_pair(strings, "TOTAL EXPENSES", "$12,345,678,901,234.00").unwrap();
        assert!(!strings.iter().any(|s| s == ".00"), "amount was split");
    }
}

#[test]
fn truncated_accounts_still_count_in_total() {
    let model = build(&load_fixture("complete"));
    let checking = model.category_total("checking_accounts").expect("checking total");
    assert!((checking - 2543.35).abs() < 1e-6, "checking total {checking}");

    let (pdf, docx) = both_texts(&model);
    let note = truncation_note(1);
    for strings in [&pdf, &docx] {
        check_pair(strings, "TOTAL: Checking Accounts", "$2,543.35").unwrap();
        assert!(strings.iter().any(|s| *s == note), "missing '{note}'");
        assert!(!strings.iter().any(|s| s.contains("Credit Union")));
    }
}

#[test]
fn malformed_input_degrades_to_zero() {
    let model = build(&load_fixture("malformed"));
    assert_eq!(model.category_total("checking_accounts"), Some(0.0));
    assert_eq!(model.category_total("housing"), Some(0.0));
    assert_eq!(model.category_total("taxes_owed"), Some(1250.75));

    let net_worth = model.net_worth().expect("net worth block");
    assert!((net_worth + 1247.75).abs() < 1e-9, "net worth {net_worth}");

    let (pdf, docx) = both_texts(&model);
    for strings in [&pdf, &docx] {
        check_pair(strings, "NET WORTH", "-$1,247.75").unwrap();
    }
}
