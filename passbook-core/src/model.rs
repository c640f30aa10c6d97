//! Canonical record types produced by one extraction pass.
//!
//! Every type here is a derived, read-only output: parsers build them once and
//! hand the owning `Vec` to the next stage.

use serde::{Deserialize, Serialize};

/// Canonical transaction direction after normalization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expenses")]
    Expenses,
    #[serde(rename = "savings")]
    Savings,
}

impl TransactionType {
    /// Map a parser's native type vocabulary onto the canonical set.
    ///
    /// The mapping is lossy: anything that is not `credit` or `savings` counts
    /// as an expense.
    pub fn from_source(kind: Option<&str>) -> Self {
        match kind.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("credit") => TransactionType::Income,
            Some("savings") => TransactionType::Savings,
            _ => TransactionType::Expenses,
        }
    }

    /// Category used when the source record carries none
    pub fn default_category(&self) -> &'static str {
        match self {
            TransactionType::Savings => "others",
            _ => "other",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expenses => "expenses",
            TransactionType::Savings => "savings",
        }
    }
}

/// A bank or card transaction in the canonical schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// ISO-8601 timestamp, or the source string when it could not be parsed
    pub timestamp: String,
    pub description: String,
    /// Decimal string with at most two fraction digits (truncated, never rounded)
    pub amount: String,
    #[serde(rename = "type")]
    pub txn_type: TransactionType,
    pub category: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.txn_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.txn_type == TransactionType::Expenses
    }
}

/// Start and end of the statement period, shared by every investment section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatementPeriod {
    /// ISO date, or the raw `DD-Mon-YYYY` text if it did not parse
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Equity holding from a single-line holdings table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    pub isin: String,
    pub name: String,
    pub quantity: f64,
    pub market_price: f64,
    pub market_value: f64,
}

/// One month of the portfolio value history table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioValuationPoint {
    pub month_year: String,
    pub portfolio_value: f64,
    pub change_amount: f64,
    pub change_percent: f64,
    pub period_start_date: Option<String>,
    pub period_end_date: Option<String>,
}

/// One row of the asset allocation summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioAllocationEntry {
    pub asset_class: String,
    pub value: f64,
    pub percentage: f64,
    pub period_start_date: Option<String>,
    pub period_end_date: Option<String>,
}

/// Equity position from the holding statement, where the security name may
/// wrap over several lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquityHolding {
    pub isin: String,
    pub security: String,
    pub current_balance: f64,
    pub free_balance: f64,
    pub market_price: f64,
    pub value: f64,
    pub period_start_date: Option<String>,
    pub period_end_date: Option<String>,
}

/// Mutual fund folio position.
///
/// Numeric fields keep the statement's own tokens; they have already passed
/// the NAV/valuation coherence check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MutualFundHolding {
    pub isin: String,
    pub scheme_name: String,
    pub folio_no: String,
    pub closing_balance_units: String,
    pub nav: String,
    pub cumulative_amount_invested: String,
    pub valuation: String,
    pub period_start_date: Option<String>,
    pub period_end_date: Option<String>,
}

/// Stamp the statement period onto records that carry one
pub trait PeriodStamped {
    fn stamp(&mut self, period: &StatementPeriod);
}

macro_rules! impl_period_stamped {
    ($($ty:ty),*) => {
        $(impl PeriodStamped for $ty {
            fn stamp(&mut self, period: &StatementPeriod) {
                self.period_start_date = period.start.clone();
                self.period_end_date = period.end.clone();
            }
        })*
    };
}

impl_period_stamped!(
    PortfolioValuationPoint,
    PortfolioAllocationEntry,
    EquityHolding,
    MutualFundHolding
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mapping_is_lossy() {
        assert_eq!(TransactionType::from_source(Some("credit")), TransactionType::Income);
        assert_eq!(TransactionType::from_source(Some("DEBIT")), TransactionType::Expenses);
        assert_eq!(TransactionType::from_source(Some("savings")), TransactionType::Savings);
        assert_eq!(TransactionType::from_source(Some("refund")), TransactionType::Expenses);
        assert_eq!(TransactionType::from_source(None), TransactionType::Expenses);
    }

    #[test]
    fn test_default_categories() {
        assert_eq!(TransactionType::Savings.default_category(), "others");
        assert_eq!(TransactionType::Income.default_category(), "other");
        assert_eq!(TransactionType::Expenses.default_category(), "other");
    }

    #[test]
    fn test_transaction_serializes_type_field() {
        let txn = Transaction {
            timestamp: "2024-04-01T10:15:30".to_string(),
            description: "SWIGGY".to_string(),
            amount: "250.00".to_string(),
            txn_type: TransactionType::Expenses,
            category: "other".to_string(),
        };
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expenses");
        assert_eq!(json["amount"], "250.00");
    }

    #[test]
    fn test_stamp_period() {
        let period = StatementPeriod {
            start: Some("2024-04-01".to_string()),
            end: Some("2024-04-30".to_string()),
        };
        let mut point = PortfolioValuationPoint {
            month_year: "Apr 2024".to_string(),
            portfolio_value: 1000.0,
            change_amount: 10.0,
            change_percent: 1.0,
            period_start_date: None,
            period_end_date: None,
        };
        point.stamp(&period);
        assert_eq!(point.period_start_date.as_deref(), Some("2024-04-01"));
        assert_eq!(point.period_end_date.as_deref(), Some("2024-04-30"));
    }
}
