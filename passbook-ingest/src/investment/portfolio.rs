//! Single-line investment tables: holdings, monthly portfolio value and the
//! asset allocation summary.

use anyhow::Result;
use passbook_core::{clean_number, parse_signed, Holding, PortfolioAllocationEntry, PortfolioValuationPoint};
use regex::Regex;
use std::collections::HashSet;
use tracing::trace;

/// ISIN NAME QTY ₹PRICE ₹VALUE
const HOLDING_PATTERN: &str = concat!(
    r"(?m)^[ \t]*(?P<isin>[A-Z]{2}[0-9A-Z]{9}[0-9])\s+",
    r"(?P<name>[A-Z &\-\.\(\)]+?)\s+",
    r"(?P<qty>[0-9,]+)\s+",
    r"₹\s*(?P<price>[0-9,]+\.[0-9]{2})\s+",
    r"₹\s*(?P<value>[0-9,]+\.[0-9]{2})"
);

/// Mon YYYY  VALUE  CHANGE  CHANGE%
const VALUATION_PATTERN: &str = r"([A-Za-z]{3} \d{4})\s+([\d,]+\.\d{2})\s+([\-\d,]+\.\d{2})\s+([\-\d\.]+)";

/// ASSET CLASS  VALUE  PERCENT
const ALLOCATION_PATTERN: &str = r"([A-Za-z ]+)\s+([\d,]+\.?\d*)\s+(\d+\.\d{2})";

/// Asset classes reported in the allocation summary
const ALLOCATION_CLASSES: &[&str] = &["equity", "mutual fund folios"];

pub fn parse_holdings(text: &str) -> Result<Vec<Holding>> {
    let holding_re = Regex::new(HOLDING_PATTERN)?;

    Ok(holding_re
        .captures_iter(text)
        .map(|caps| Holding {
            isin: caps["isin"].trim().to_string(),
            name: caps["name"].trim().to_string(),
            quantity: clean_number(&caps["qty"]),
            market_price: clean_number(&caps["price"]),
            market_value: clean_number(&caps["value"]),
        })
        .collect())
}

/// Month-by-month portfolio value. Rows whose numbers do not parse are skipped.
pub fn parse_portfolio_valuation(text: &str) -> Result<Vec<PortfolioValuationPoint>> {
    let valuation_re = Regex::new(VALUATION_PATTERN)?;
    let mut out = Vec::new();

    for caps in valuation_re.captures_iter(text) {
        let parsed = (
            parse_signed(&caps[2]),
            parse_signed(&caps[3]),
            parse_signed(&caps[4]),
        );
        let (Some(value), Some(change), Some(percent)) = parsed else {
            trace!(row = &caps[0], "valuation row with unparseable numbers");
            continue;
        };

        out.push(PortfolioValuationPoint {
            month_year: caps[1].to_string(),
            portfolio_value: value,
            change_amount: change,
            change_percent: percent,
            period_start_date: None,
            period_end_date: None,
        });
    }

    Ok(out)
}

/// Asset allocation rows for the allowed classes, each (class, value, percent)
/// triple reported once. Scanning stops at the `Total ... 100.00` row.
pub fn parse_portfolio_allocation(text: &str) -> Result<Vec<PortfolioAllocationEntry>> {
    let allocation_re = Regex::new(ALLOCATION_PATTERN)?;
    let mut seen: HashSet<(String, u64, u64)> = HashSet::new();
    let mut out = Vec::new();

    for caps in allocation_re.captures_iter(text) {
        let asset_class = caps[1].trim();
        let class_key = asset_class.to_lowercase();
        let (Some(value), Some(percentage)) = (parse_signed(&caps[2]), parse_signed(&caps[3])) else {
            continue;
        };

        if ALLOCATION_CLASSES.contains(&class_key.as_str())
            && seen.insert((class_key.clone(), value.to_bits(), percentage.to_bits()))
        {
            out.push(PortfolioAllocationEntry {
                asset_class: asset_class.to_string(),
                value,
                percentage,
                period_start_date: None,
                period_end_date: None,
            });
        }

        if class_key == "total" && percentage == 100.0 {
            break;
        }
    }

    Ok(out)
}
