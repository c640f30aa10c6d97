//! HDFC savings/current account statement parser (text)
//!
//! Expected extracted-text rows:
//!   Date     Narration                 Chq./Ref.No.      Value Dt  Withdrawal Amt. Deposit Amt. Closing Balance
//!   01/04/24 UPI-SWIGGY-SWIGGY8@YBL-   0000409123456789  01/04/24  250.00                       9,750.00
//!            YESB0YBLUPI-PAYMENT
//!
//! Narrations wrap onto following lines, and the text layer drops whichever of
//! the withdrawal/deposit columns is blank. Rows are grouped by their leading
//! date, and direction is recovered from the running balance.

use anyhow::Result;
use passbook_core::{format_cents, parse_cents};
use regex::{Regex, RegexSet};
use std::cmp::Ordering;
use tracing::debug;

use crate::assembler::{raw_lines, AssemblerRules, Boundary, RawLine, RecordAssembler, RecordSpan, Verdict};
use crate::registry::StatementParser;
use crate::types::StatementTransaction;

/// Page furniture repeated through the statement; matched per trimmed line
const BOILERPLATE_PATTERNS: &[&str] = &[
    r"(?i)^page\s*(no)?\s*\.?\s*:?\s*\d+",
    r"(?i)^hdfc bank (ltd|limited)\b",
    r"(?i)^statement of accounts?\b",
    r"(?i)^(account branch|address|city|state|phone no|email|od limit|currency|cust id|account no|a/c open date|account status|account type|rtgs/neft ifsc|micr|branch code|product code|joint holders|nomination)\b",
    r"(?i)^from\s*:.*\bto\s*:",
    r"(?i)^date\s+narration\b",
    r"(?i)closing balance includes funds earmarked",
    r"(?i)contents of this statement will be considered correct",
    r"(?i)computer generated statement",
    r"(?i)^registered office address",
    r"(?i)^(state account branch )?gstn?\b",
    r"(?i)^hdfc bank gstin",
    r"^\*+$",
];

const ROW_ANCHOR: &str = r"^(\d{2}/\d{2}/\d{2})\b";

const SUMMARY_TERMINATOR: &str = r"(?i)^statement\s+summary";

/// Statement summary header line followed by its first figure
const OPENING_BALANCE: &str = r"(?im)^\s*opening\s+balance\b[^\n]*\n\s*([\d,]+\.\d{2})\b";

/// Fields of one concatenated record span. Amount columns may be printed as
/// `-` when blank, or left out of the text entirely.
const ROW_PATTERN: &str = concat!(
    r"^(?P<date>\d{2}/\d{2}/\d{2})\s+",
    r"(?P<narration>.*?)\s*",
    r"(?:(?P<reference>\S+)\s+)?",
    r"(?P<value_date>\d{2}/\d{2}/\d{2})\s+",
    r"(?P<amounts>(?:(?:[\d,]+\.\d{2}|-)\s+){0,2}[\d,]+\.\d{2})\b",
    r"(?P<tail>.*)$"
);

/// One ledger row before direction reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerRow {
    pub date: String,
    pub narration: String,
    pub reference: Option<String>,
    pub value_date: String,
    pub withdrawal: Option<String>,
    pub deposit: Option<String>,
    /// Single amount whose column was lost in extraction
    pub undetermined: Option<String>,
    pub balance: Option<String>,
}

fn non_blank(token: &str) -> Option<String> {
    if token == "-" || parse_cents(token) == Some(0) {
        None
    } else {
        Some(token.to_string())
    }
}

fn row_from_span(row_re: &Regex, span: &RecordSpan<'_>) -> Option<LedgerRow> {
    let joined = span.joined();
    let caps = row_re.captures(&joined)?;

    let amounts: Vec<&str> = caps["amounts"].split_whitespace().collect();
    let mut row = LedgerRow {
        date: caps["date"].to_string(),
        narration: [caps["narration"].trim(), caps["tail"].trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" "),
        reference: caps.name("reference").map(|m| m.as_str().to_string()),
        value_date: caps["value_date"].to_string(),
        ..LedgerRow::default()
    };

    match amounts.as_slice() {
        [balance] => {
            row.balance = Some(balance.to_string());
        }
        [amount, balance] => {
            row.undetermined = non_blank(amount);
            row.balance = Some(balance.to_string());
        }
        [withdrawal, deposit, balance] => {
            row.withdrawal = non_blank(withdrawal);
            row.deposit = non_blank(deposit);
            row.balance = Some(balance.to_string());
        }
        _ => return None,
    }

    Some(row)
}

/// Group the ledger section into rows, dropping page furniture first.
pub fn parse_ledger_rows(text: &str) -> Result<Vec<LedgerRow>> {
    let boilerplate = RegexSet::new(BOILERPLATE_PATTERNS)?;
    let anchor = Regex::new(ROW_ANCHOR)?;
    let summary = Regex::new(SUMMARY_TERMINATOR)?;
    let row_re = Regex::new(ROW_PATTERN)?;

    let lines: Vec<RawLine<'_>> = raw_lines(text)
        .into_iter()
        .filter(|line| !boilerplate.is_match(line.text))
        .collect();

    let rules = AssemblerRules::new(&anchor)
        .boundary(Boundary::AnyAnchor)
        .terminator(&summary);

    let mut rows = Vec::new();
    let stats = RecordAssembler::new(&lines, rules).run(|span| match row_from_span(&row_re, span) {
        Some(row) => {
            rows.push(row);
            Verdict::Emit
        }
        None => {
            debug!(line = span.anchor.index, text = span.anchor.text, "ledger row without amount columns");
            Verdict::Discard
        }
    });
    debug!(rows = stats.emitted, dropped = stats.discarded, "hdfc ledger rows assembled");

    Ok(rows)
}

/// Opening balance from the statement summary, when the text carries one
pub fn parse_opening_balance(text: &str) -> Result<Option<i64>> {
    let re = Regex::new(OPENING_BALANCE)?;
    Ok(re.captures(text).and_then(|caps| parse_cents(&caps[1])))
}

/// Column-based direction, used when no previous balance exists
fn explicit_column(row: &LedgerRow) -> Option<(&'static str, String)> {
    if let Some(w) = &row.withdrawal {
        return Some(("debit", w.clone()));
    }
    if let Some(d) = &row.deposit {
        return Some(("credit", d.clone()));
    }
    // The blank column vanished from the text; direction is undecidable, so
    // the row counts as a withdrawal.
    row.undetermined.clone().map(|a| ("debit", a))
}

/// Derive type and amount from the running balance, starting from `opening`.
///
/// Once a previous balance exists the delta wins over any explicit column.
pub fn reconcile_balances(rows: Vec<LedgerRow>, opening: Option<i64>) -> Vec<StatementTransaction> {
    let mut previous = opening;
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let balance = row.balance.as_deref().and_then(parse_cents);

        let (kind, amount) = match (previous, balance) {
            (Some(prev), Some(current)) => {
                let delta = current - prev;
                let derived = match delta.cmp(&0) {
                    Ordering::Greater => ("credit", format_cents(delta.abs())),
                    Ordering::Less => ("debit", format_cents(delta.abs())),
                    Ordering::Equal => ("unknown", String::new()),
                };
                if row.withdrawal.is_some() || row.deposit.is_some() {
                    if let Some((col_kind, col_amount)) = explicit_column(&row) {
                        if col_kind != derived.0 || parse_cents(&col_amount) != Some(delta.abs()) {
                            debug!(
                                date = %row.date,
                                column_kind = col_kind,
                                column_amount = %col_amount,
                                delta_kind = derived.0,
                                delta_amount = %derived.1,
                                "balance delta disagrees with amount column"
                            );
                        }
                    }
                }
                derived
            }
            _ => explicit_column(&row).unwrap_or(("unknown", String::new())),
        };

        if balance.is_some() {
            previous = balance;
        }

        let mut txn = StatementTransaction::new(row.date, row.narration, amount).with_kind(kind);
        txn.balance = row.balance;
        out.push(txn);
    }

    out
}

/// Parse extracted HDFC account statement text into transactions.
pub fn parse_hdfc_account_text(text: &str) -> Result<Vec<StatementTransaction>> {
    let rows = parse_ledger_rows(text)?;
    let opening = parse_opening_balance(text)?;
    if opening.is_none() {
        debug!("no opening balance in statement summary, first row uses its amount column");
    }
    Ok(reconcile_balances(rows, opening))
}

pub struct HdfcAccountParser;

impl StatementParser for HdfcAccountParser {
    fn name(&self) -> &'static str {
        "hdfc_account"
    }

    fn parse(&self, text: &str) -> Result<Vec<StatementTransaction>> {
        parse_hdfc_account_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(balance: &str, undetermined: Option<&str>) -> LedgerRow {
        LedgerRow {
            date: "01/04/24".to_string(),
            balance: Some(balance.to_string()),
            undetermined: undetermined.map(str::to_string),
            ..LedgerRow::default()
        }
    }

    #[test]
    fn test_balance_delta_reconciliation() {
        let rows = vec![
            LedgerRow {
                deposit: Some("1,000.00".to_string()),
                ..row("1,000.00", None)
            },
            row("1,500.00", Some("500.00")),
            row("1,200.00", Some("300.00")),
        ];

        let txns = reconcile_balances(rows, None);
        assert_eq!(txns[0].kind.as_deref(), Some("credit"));
        assert_eq!(txns[0].amount, "1,000.00");
        assert_eq!(txns[1].kind.as_deref(), Some("credit"));
        assert_eq!(txns[1].amount, "500.00");
        assert_eq!(txns[2].kind.as_deref(), Some("debit"));
        assert_eq!(txns[2].amount, "300.00");
    }

    #[test]
    fn test_equal_balance_is_unknown() {
        let txns = reconcile_balances(vec![row("100.00", Some("5.00")), row("100.00", Some("5.00"))], None);
        assert_eq!(txns[1].kind.as_deref(), Some("unknown"));
        assert_eq!(txns[1].amount, "");
    }

    #[test]
    fn test_delta_wins_over_disagreeing_column() {
        let rows = vec![
            row("1,000.00", Some("10.00")),
            LedgerRow {
                withdrawal: Some("50.00".to_string()),
                ..row("1,200.00", None)
            },
        ];
        let txns = reconcile_balances(rows, None);
        assert_eq!(txns[1].kind.as_deref(), Some("credit"));
        assert_eq!(txns[1].amount, "200.00");
    }

    #[test]
    fn test_multi_line_rows_and_boilerplate() {
        let text = r#"
HDFC BANK Ltd
Page No .: 1
Statement of accounts
Account Branch : KORAMANGALA
Date Narration Chq./Ref.No. Value Dt Withdrawal Amt. Deposit Amt. Closing Balance
01/04/24 UPI-SWIGGY-SWIGGY8@YBL- 0000409123456789 01/04/24 250.00 9,750.00
YESB0YBLUPI-PAYMENT
02/04/24 NEFT CR-ACME PAYROLL 0000N240402123 02/04/24 50,000.00 59,750.00
Page No .: 2
02/04/24 ATM WDL-MG ROAD 0000000000004821 02/04/24 2,000.00 57,750.00
STATEMENT SUMMARY :-
Opening Balance Dr Count Cr Count Debits Credits Closing Bal
10,000.00 2 1 2,250.00 50,000.00 57,750.00
"#;

        let rows = parse_ledger_rows(text).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].narration, "UPI-SWIGGY-SWIGGY8@YBL- YESB0YBLUPI-PAYMENT");
        assert_eq!(rows[0].reference.as_deref(), Some("0000409123456789"));
        assert_eq!(rows[0].undetermined.as_deref(), Some("250.00"));
        assert_eq!(rows[2].narration, "ATM WDL-MG ROAD");

        assert_eq!(parse_opening_balance(text).unwrap(), Some(1_000_000));
        let txns = reconcile_balances(rows, Some(1_000_000));
        assert_eq!(txns[0].kind.as_deref(), Some("debit"));
        assert_eq!(txns[0].amount, "250.00");
        assert_eq!(txns[1].kind.as_deref(), Some("credit"));
        assert_eq!(txns[1].amount, "50000.00");
        assert_eq!(txns[2].kind.as_deref(), Some("debit"));
        assert_eq!(txns[2].amount, "2000.00");
    }

    #[test]
    fn test_three_column_row_with_dash_placeholder() {
        let text = "05/04/24 IMPS-RENT 0000000000000001 05/04/24 - 12,000.00 69,750.00";
        let rows = parse_ledger_rows(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].withdrawal, None);
        assert_eq!(rows[0].deposit.as_deref(), Some("12,000.00"));
        assert_eq!(rows[0].balance.as_deref(), Some("69,750.00"));

        let txns = reconcile_balances(rows, None);
        assert_eq!(txns[0].kind.as_deref(), Some("credit"));
    }

    #[test]
    fn test_opening_balance_decides_first_row() {
        let ledger = "\
01/04/24 NEFT CR-ACME PAYROLL 0000N240401123 01/04/24 50,000.00 55,000.00
03/04/24 ATM WDL-MG ROAD 0000000000004821 03/04/24 2,000.00 53,000.00
";
        // Without a summary the lone amount on the first row counts as a withdrawal
        let txns = parse_hdfc_account_text(ledger).unwrap();
        assert_eq!(txns[0].kind.as_deref(), Some("debit"));

        let with_summary = format!(
            "{ledger}STATEMENT SUMMARY :-\nOpening Balance Dr Count Cr Count Debits Credits Closing Bal\n5,000.00 1 1 2,000.00 50,000.00 53,000.00\n"
        );
        let txns = parse_hdfc_account_text(&with_summary).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].kind.as_deref(), Some("credit"));
        assert_eq!(txns[0].amount, "50000.00");
        assert_eq!(txns[1].kind.as_deref(), Some("debit"));
        assert_eq!(txns[1].amount, "2000.00");
    }
}
