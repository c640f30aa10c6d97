//! passbook-core: canonical statement records, numeric reconciliation and the
//! error taxonomy shared by the extraction pipeline

pub mod error;
pub mod model;
pub mod numeric;
pub mod response;
pub mod tags;

pub use error::{DocumentError, ExtractError};
pub use model::{
    EquityHolding, Holding, MutualFundHolding, PeriodStamped, PortfolioAllocationEntry,
    PortfolioValuationPoint, StatementPeriod, Transaction, TransactionType,
};
pub use numeric::{clean_number, format_cents, is_coherent, parse_cents, parse_signed, truncate_amount};
pub use response::{BankData, ExtractResponse, InvestmentData};
pub use tags::{DocumentType, Institution, StatementType};
