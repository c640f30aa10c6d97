//! Axis Bank statement parser (text)
//!
//! Expected extracted-text rows:
//!   2024-04-02   NEFT SALARY ACME LTD          +₹85,000.00   ₹1,02,500.00
//!   2024-04-03   UPI ZOMATO                    -₹420.00      ₹1,02,080.00
//!
//! The header also names the account holder and number.

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::registry::StatementParser;
use crate::types::{StatementHeader, StatementTransaction};

/// Pull the account holder and number out of the statement header
pub fn parse_axis_header(text: &str) -> Result<StatementHeader> {
    let holder_re = Regex::new(r"Account Holder\s*:\s*(.+)")?;
    let number_re = Regex::new(r"Account Number\s*:\s*([Xx\d-]+)")?;

    Ok(StatementHeader {
        account_holder: holder_re
            .captures(text)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default(),
        account_number: number_re
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default(),
    })
}

/// Parse extracted statement text into Axis transactions.
///
/// A leading `+` on the amount marks a credit; the stored amount is unsigned.
pub fn parse_axis_text(text: &str) -> Result<Vec<StatementTransaction>> {
    // DATE DESCRIPTION AMOUNT BALANCE
    let txn_re = Regex::new(concat!(
        r"(?P<date>\d{2,4}-\d{2}-\d{2})\s+",
        r"(?P<desc>[A-Z0-9 .,&'-]+)\s+",
        r"(?P<sign>[+-])?(?P<amount>₹[\d,]+\.\d{2})\s+",
        r"(?P<balance>₹[\d,]+\.\d{2})"
    ))?;

    let mut out = Vec::new();

    for line in text.lines() {
        for caps in txn_re.captures_iter(line) {
            let kind = match caps.name("sign").map(|m| m.as_str()) {
                Some("+") => "credit",
                _ => "debit",
            };

            out.push(
                StatementTransaction::new(&caps["date"], caps["desc"].trim(), &caps["amount"])
                    .with_kind(kind)
                    .with_balance(&caps["balance"]),
            );
        }
    }

    Ok(out)
}

pub struct AxisParser;

impl StatementParser for AxisParser {
    fn name(&self) -> &'static str {
        "axis"
    }

    fn parse(&self, text: &str) -> Result<Vec<StatementTransaction>> {
        let header = parse_axis_header(text)?;
        debug!(
            account_holder = %header.account_holder,
            account_number = %header.account_number,
            "axis statement header"
        );
        parse_axis_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
AXIS BANK
Account Holder : RAHUL SHARMA
Account Number : XXXX-XXXX-4821
Date         Description                   Amount        Balance
2024-04-02   NEFT SALARY ACME LTD          +₹85,000.00   ₹1,02,500.00
2024-04-03   UPI ZOMATO                    -₹420.00      ₹1,02,080.00
2024-04-05   ATM WDL MG ROAD               ₹2,000.00     ₹1,00,080.00
"#;

    #[test]
    fn test_parse_axis_basic() {
        let txns = parse_axis_text(SAMPLE).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].description, "NEFT SALARY ACME LTD");
        assert_eq!(txns[0].amount, "₹85,000.00");
        assert_eq!(txns[0].kind.as_deref(), Some("credit"));
        assert_eq!(txns[0].balance.as_deref(), Some("₹1,02,500.00"));
        assert_eq!(txns[1].kind.as_deref(), Some("debit"));
        assert_eq!(txns[2].kind.as_deref(), Some("debit"));
        assert_eq!(txns[2].amount, "₹2,000.00");
    }

    #[test]
    fn test_parse_axis_header() {
        let header = parse_axis_header(SAMPLE).unwrap();
        assert_eq!(header.account_holder, "RAHUL SHARMA");
        assert_eq!(header.account_number, "XXXX-XXXX-4821");
    }

    #[test]
    fn test_missing_header_is_empty() {
        let header = parse_axis_header("no header here").unwrap();
        assert_eq!(header, StatementHeader::default());
    }
}
