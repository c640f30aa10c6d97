//! Holding statement (equity) blocks.
//!
//! ```text
//! INE002A01018 RELIANCE INDUSTRIES
//! LIMITED EQUITY SHARES
//! 10.000 -- -- -- 10.000 2,950.00 29,500.00
//! ```
//!
//! A block runs from one 12-character code to the next. The security name may
//! wrap, so everything between the code and the number row is joined.

use anyhow::Result;
use passbook_core::EquityHolding;
use regex::{Captures, Regex};
use tracing::trace;

const CODE_PATTERN: &str = r"\b[A-Z0-9]{12}\b";

/// CURRENT -- -- -- FREE PRICE VALUE
const NUMBER_ROW_PATTERN: &str = r"([\d,.]+)\s+--\s+--\s+--\s+([\d,.]+)\s+([\d,.]+)\s+([\d,.]+)";

fn plain_number(token: &str) -> Option<f64> {
    token.replace(',', "").parse().ok()
}

fn holding_from_block(block: &str, number_re: &Regex) -> Option<EquityHolding> {
    let lines: Vec<&str> = block.lines().map(str::trim).collect();
    let first = *lines.first()?;
    let isin = first.get(..12)?;
    let last_idx = lines.len() - 1;

    // Number row on the last line; otherwise anywhere in the block
    let (caps, row_line, row_start): (Captures<'_>, usize, usize) = match number_re.captures(lines[last_idx]) {
        Some(caps) => {
            let start = caps.get(0)?.start();
            (caps, last_idx, start)
        }
        None => {
            let caps = number_re.captures(block)?;
            let start = caps.get(0)?.start();
            let before = &block[..start];
            let line = before.matches('\n').count();
            let col = start - before.rfind('\n').map(|p| p + 1).unwrap_or(0);
            (caps, line, col)
        }
    };

    let head = if row_line == 0 {
        first.get(12..row_start.max(12)).unwrap_or("")
    } else {
        first.get(12..).unwrap_or("")
    };
    let mut name_parts = vec![head.trim()];
    name_parts.extend(lines.get(1..row_line).unwrap_or(&[]).iter().copied());
    let security = name_parts
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(EquityHolding {
        isin: isin.to_string(),
        security,
        current_balance: plain_number(&caps[1])?,
        free_balance: plain_number(&caps[2])?,
        market_price: plain_number(&caps[3])?,
        value: plain_number(&caps[4])?,
        period_start_date: None,
        period_end_date: None,
    })
}

pub fn parse_equity_blocks(text: &str) -> Result<Vec<EquityHolding>> {
    let code_re = Regex::new(CODE_PATTERN)?;
    let number_re = Regex::new(NUMBER_ROW_PATTERN)?;

    let starts: Vec<usize> = code_re.find_iter(text).map(|m| m.start()).collect();
    let mut out = Vec::new();

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let block = text[start..end].trim();

        match holding_from_block(block, &number_re) {
            Some(holding) => out.push(holding),
            None => trace!(code = block.get(..12).unwrap_or(block), "block without equity number row"),
        }
    }

    Ok(out)
}
