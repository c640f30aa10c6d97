//! Investment (demat / consolidated account) statement parsing.
//!
//! Every sub-parser runs over the full text independently; an empty section
//! is a valid result.

pub mod equity;
pub mod mutual_fund;
pub mod period;
pub mod portfolio;

use anyhow::Result;
use passbook_core::{InvestmentData, PeriodStamped, StatementPeriod};
use tracing::info;

pub use equity::parse_equity_blocks;
pub use mutual_fund::{parse_mutual_funds, scan_fund_identifiers, scan_units_held_section, Rejection};
pub use period::parse_statement_period;
pub use portfolio::{parse_holdings, parse_portfolio_allocation, parse_portfolio_valuation};

fn stamped<T: PeriodStamped>(mut records: Vec<T>, period: &StatementPeriod) -> Vec<T> {
    for record in &mut records {
        record.stamp(period);
    }
    records
}

/// Run every investment sub-parser and stamp the statement period on the
/// sections that carry it.
pub fn parse_investment(text: &str) -> Result<InvestmentData> {
    let period = parse_statement_period(text)?;

    let data = InvestmentData {
        portfolio_valuation_year: stamped(parse_portfolio_valuation(text)?, &period),
        portfolio_accounts_month: stamped(parse_portfolio_allocation(text)?, &period),
        holding_statement_equity: stamped(parse_equity_blocks(text)?, &period),
        mutual_fund_units_held: stamped(parse_mutual_funds(text)?, &period),
        holdings: parse_holdings(text)?,
    };

    info!(
        period_start = period.start.as_deref().unwrap_or("-"),
        period_end = period.end.as_deref().unwrap_or("-"),
        valuation_points = data.portfolio_valuation_year.len(),
        allocation_entries = data.portfolio_accounts_month.len(),
        equity_holdings = data.holding_statement_equity.len(),
        mutual_funds = data.mutual_fund_units_held.len(),
        holdings = data.holdings.len(),
        "investment statement parsed"
    );

    Ok(data)
}
