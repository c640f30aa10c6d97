//! Tagged success/error envelope returned by every entry point

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::model::{
    EquityHolding, Holding, MutualFundHolding, PortfolioAllocationEntry, PortfolioValuationPoint,
    Transaction,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractResponse<T> {
    Success { data: T },
    Error { kind: String, message: String },
}

impl<T> ExtractResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractResponse::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ExtractResponse::Success { data } => Some(data),
            ExtractResponse::Error { .. } => None,
        }
    }

    /// True for errors caused by the request rather than the document
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractResponse::Error { kind, .. } if kind == ExtractError::MissingInstitution.kind())
    }

    /// `(kind, message)` of an error response
    pub fn error(&self) -> Option<(&str, &str)> {
        match self {
            ExtractResponse::Error { kind, message } => Some((kind, message)),
            ExtractResponse::Success { .. } => None,
        }
    }
}

impl<T> From<Result<T, ExtractError>> for ExtractResponse<T> {
    fn from(result: Result<T, ExtractError>) -> Self {
        match result {
            Ok(data) => ExtractResponse::Success { data },
            Err(err) => ExtractResponse::Error {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// Payload of a bank or card statement extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BankData {
    pub transactions: Vec<Transaction>,
}

/// Payload of an investment statement extraction; each section may be empty
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InvestmentData {
    pub portfolio_valuation_year: Vec<PortfolioValuationPoint>,
    pub portfolio_accounts_month: Vec<PortfolioAllocationEntry>,
    pub holding_statement_equity: Vec<EquityHolding>,
    pub mutual_fund_units_held: Vec<MutualFundHolding>,
    pub holdings: Vec<Holding>,
}
