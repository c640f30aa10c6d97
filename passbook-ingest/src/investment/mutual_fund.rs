//! Mutual fund units held.
//!
//! Consolidated statements print one folio per record, with the scheme name
//! wrapping above the fund identifier and the numbers sometimes spilling onto
//! the next line:
//!
//! ```text
//! Axis Bluechip Fund - Direct Growth
//! INF846K01DP8 9104567 DIRECT 100.000 10.00 900.00 1005.00
//! ```
//!
//! Two passes: the "mutual fund units held" section first, and if that yields
//! nothing, a scan of the whole document for `INF` identifiers that steers
//! clear of the transaction ledger.

use anyhow::Result;
use passbook_core::{is_coherent, MutualFundHolding};
use regex::Regex;
use tracing::debug;

use crate::assembler::{raw_lines, AssemblerRules, Boundary, RawLine, RecordAssembler, Verdict};

const SECTION_TITLE: &str = r"(?i)mutual fund units held";
const SECTION_END: &str = r"(?i)grand total";

const SECTION_ANCHOR: &str = r"([A-Z]{2}[A-Z0-9]{9}[0-9])";
const FUND_ANCHOR: &str = r"\b(INF[A-Z0-9]{8}[0-9])\b";

/// Look-ahead window for numbers spilling past the identifier line
const LOOKAHEAD_LINES: usize = 2;

/// Distributor column spellings; the folio number sits just before it
const DISTRIBUTOR_MARKERS: &[&str] = &["DIRECT", "ARNDIRECT", r"ARN-?DIRECT", r"ARN\d+"];

/// Transaction-ledger lines skipped by the whole-document scan
const LEDGER_PHRASES: &[&str] = &[
    "transaction description",
    "opening balance",
    "closing balance",
    "systematic investment",
    "sip purchase",
    "instalment no",
    "purchase",
    "redemption",
    "dividend",
    "nav (`)",
    "price (`)",
    "amount (`)",
    "units",
    "income capital stamp",
    "date transaction",
    "folio no :",
    "mode of holding",
    "kyc of investor",
    "nominee :",
];

/// Look-ahead lines consumed without contributing tokens
const LEDGER_CONTINUATION_PHRASES: &[&str] = &[
    "transaction description",
    "opening balance",
    "closing balance",
    "systematic investment",
    "sip purchase",
    "instalment no",
    "purchase",
    "redemption",
    "dividend",
    "folio no :",
    "mode of holding",
    "kyc of investor",
    "nominee :",
];

/// A scheme name containing any of these is a summary row, not a fund
const SUMMARY_PHRASES: &[&str] = &[
    "transaction description",
    "opening balance",
    "closing balance",
    "systematic investment",
    "sip purchase",
    "instalment no",
    "income capital stamp",
    "date transaction",
    "summary of investments",
];

fn contains_any(line: &str, phrases: &[&str]) -> bool {
    let lower = line.to_lowercase();
    phrases.iter().any(|p| lower.contains(p))
}

fn is_ledger_line(line: &str) -> bool {
    contains_any(line, LEDGER_PHRASES)
}

fn is_ledger_continuation(line: &str) -> bool {
    contains_any(line, LEDGER_CONTINUATION_PHRASES)
}

fn is_column_header(line: &str) -> bool {
    line.to_lowercase().contains("scheme name")
}

/// Why a candidate folio was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoDistributorMarker,
    TooFewNumbers,
    Incoherent,
    SummaryRow,
}

fn marker_regex() -> Result<Regex> {
    Ok(Regex::new(&format!("(?i)^(?:{})$", DISTRIBUTOR_MARKERS.join("|")))?)
}

/// Map the tokens after the identifier onto folio, units, NAV, amount invested
/// and valuation.
pub fn holding_from_tokens(
    marker_re: &Regex,
    isin: &str,
    scheme_name: &str,
    tokens: &[&str],
) -> std::result::Result<MutualFundHolding, Rejection> {
    let marker = tokens
        .iter()
        .position(|t| marker_re.is_match(t))
        .ok_or(Rejection::NoDistributorMarker)?;
    let folio_no = if marker > 0 { tokens[marker - 1] } else { "" };

    let numeric: Vec<&str> = tokens[marker + 1..]
        .iter()
        .copied()
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .collect();
    if numeric.len() < 4 {
        return Err(Rejection::TooFewNumbers);
    }

    let units = numeric[0];
    // A NAV ending in '-' was split across two tokens
    let (nav, rest) = if numeric[1].ends_with('-') {
        (format!("{}{}", numeric[1].trim_end_matches('-'), numeric[2]), 3)
    } else {
        (numeric[1].to_string(), 2)
    };
    if numeric.len() < rest + 2 {
        return Err(Rejection::TooFewNumbers);
    }
    let invested = numeric[rest];
    let valuation = numeric[rest + 1];

    if !is_coherent(units, &nav, valuation) {
        return Err(Rejection::Incoherent);
    }

    Ok(MutualFundHolding {
        isin: isin.to_string(),
        scheme_name: scheme_name.to_string(),
        folio_no: folio_no.to_string(),
        closing_balance_units: units.to_string(),
        nav,
        cumulative_amount_invested: invested.to_string(),
        valuation: valuation.to_string(),
        period_start_date: None,
        period_end_date: None,
    })
}

fn run_pass(lines: &[RawLine<'_>], rules: AssemblerRules<'_>, marker_re: &Regex, reject_summaries: bool) -> Vec<MutualFundHolding> {
    let mut out = Vec::new();

    let stats = RecordAssembler::new(lines, rules).run(|span| {
        let scheme_name = span.leading_text();
        let candidate = if reject_summaries && contains_any(&scheme_name, SUMMARY_PHRASES) {
            Err(Rejection::SummaryRow)
        } else {
            holding_from_tokens(marker_re, &span.anchor_value, &scheme_name, &span.tokens_after_anchor())
        };

        match candidate {
            Ok(holding) => {
                out.push(holding);
                Verdict::Emit
            }
            Err(reason) => {
                debug!(isin = %span.anchor_value, line = span.anchor.index, ?reason, "mutual fund candidate dropped");
                Verdict::Discard
            }
        }
    });
    debug!(emitted = stats.emitted, discarded = stats.discarded, "mutual fund pass finished");

    out
}

/// Records between the section title and the grand total
pub fn scan_units_held_section(text: &str) -> Result<Vec<MutualFundHolding>> {
    let title_re = Regex::new(SECTION_TITLE)?;
    let end_re = Regex::new(SECTION_END)?;
    let anchor_re = Regex::new(SECTION_ANCHOR)?;
    let marker_re = marker_regex()?;

    let lines = raw_lines(text);
    let Some(title) = lines.iter().position(|l| title_re.is_match(l.text)) else {
        return Ok(Vec::new());
    };

    let rules = AssemblerRules::new(&anchor_re)
        .lookahead(LOOKAHEAD_LINES)
        .boundary(Boundary::DifferentAnchor)
        .terminator(&end_re)
        .exclude_from_prefix(is_column_header);

    Ok(run_pass(&lines[title + 1..], rules, &marker_re, false))
}

/// Whole-document scan for fund identifiers, skipping ledger lines
pub fn scan_fund_identifiers(text: &str) -> Result<Vec<MutualFundHolding>> {
    let anchor_re = Regex::new(FUND_ANCHOR)?;
    let marker_re = marker_regex()?;

    let lines = raw_lines(text);
    let rules = AssemblerRules::new(&anchor_re)
        .lookahead(LOOKAHEAD_LINES)
        .boundary(Boundary::DifferentAnchor)
        .skip_line(is_ledger_line)
        .skip_continuation(is_ledger_continuation)
        .exclude_from_prefix(is_column_header);

    Ok(run_pass(&lines, rules, &marker_re, true))
}

pub fn parse_mutual_funds(text: &str) -> Result<Vec<MutualFundHolding>> {
    let primary = scan_units_held_section(text)?;
    if !primary.is_empty() {
        return Ok(primary);
    }
    debug!("units held section yielded nothing, scanning whole document for fund identifiers");
    scan_fund_identifiers(text)
}
