//! HDFC credit card statement parser (text)
//!
//! Expected text rows after PDF-to-text:
//!   12/03/2024 10:15:30   SWIGGY BANGALORE                     250.00
//!   14/03/2024 09:02:11   PAYMENT RECEIVED - THANK YOU       5,000.00 Cr
//!
//! A trailing `Cr` marks a credit; every other row is a debit.

use anyhow::Result;
use regex::Regex;

use crate::registry::StatementParser;
use crate::types::StatementTransaction;

/// Parse extracted statement text into HDFC card transactions.
pub fn parse_hdfc_card_text(text: &str) -> Result<Vec<StatementTransaction>> {
    let txn_re = Regex::new(concat!(
        r"^(?P<date>\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2})\s+",
        r"(?P<desc>.+?)\s+",
        r"(?P<amount>[\d,]+\.\d{2})",
        r"(?:\s*(?P<cr>Cr))?\s*$"
    ))?;

    let mut out = Vec::new();

    for line in text.lines() {
        let Some(caps) = txn_re.captures(line.trim()) else {
            continue;
        };

        let kind = if caps.name("cr").is_some() { "credit" } else { "debit" };

        out.push(
            StatementTransaction::new(&caps["date"], caps["desc"].trim(), &caps["amount"])
                .with_kind(kind),
        );
    }

    Ok(out)
}

pub struct HdfcCardParser;

impl StatementParser for HdfcCardParser {
    fn name(&self) -> &'static str {
        "hdfc_card"
    }

    fn parse(&self, text: &str) -> Result<Vec<StatementTransaction>> {
        parse_hdfc_card_text(text)
    }
}
