//! passbook-ingest: statement text to canonical records.
//!
//! Classification, layout dispatch, record assembly over raw lines, the bank
//! and investment parsers, normalization and the extraction entry points.

pub mod assembler;
pub mod classifier;
pub mod document;
pub mod extract;
pub mod investment;
pub mod normalize;
pub mod parsers;
pub mod registry;
pub mod types;

pub use classifier::{normalize_text, Classifier, ClassifierRule};
#[cfg(feature = "pdf")]
pub use document::PdfTextExtractor;
pub use document::{PlainTextExtractor, TextExtractor};
pub use extract::{extract, extract_investment, Extractor, InvestmentRequest};
pub use investment::parse_investment;
pub use normalize::normalize;
pub use registry::{ParserRegistry, StatementParser};
pub use types::{StatementHeader, StatementTransaction};
