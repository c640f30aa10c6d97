//! Strategy table mapping (institution, document type) to a statement parser.

use anyhow::Result;
use passbook_core::{DocumentType, ExtractError, Institution};
use std::collections::HashMap;

use crate::parsers::{AxisParser, HdfcAccountParser, HdfcCardParser};
use crate::types::StatementTransaction;

/// A bank/card layout parser
pub trait StatementParser: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Parse the full linear text into native records, in document order
    fn parse(&self, text: &str) -> Result<Vec<StatementTransaction>>;
}

pub struct ParserRegistry {
    strategies: HashMap<(Institution, DocumentType), Box<dyn StatementParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ParserRegistry {
    /// Registry with no strategies
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Registry with every built-in layout
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Institution::Hdfc, DocumentType::CreditCard, HdfcCardParser)
            .register(Institution::Hdfc, DocumentType::BankStatement, HdfcCardParser)
            .register(Institution::HdfcAccount, DocumentType::BankStatement, HdfcAccountParser)
            .register(Institution::Axis, DocumentType::BankStatement, AxisParser)
            .register(Institution::Axis, DocumentType::CreditCard, AxisParser);
        registry
    }

    /// Add or replace a strategy
    pub fn register(
        &mut self,
        institution: Institution,
        document_type: DocumentType,
        parser: impl StatementParser + 'static,
    ) -> &mut Self {
        self.strategies
            .insert((institution, document_type), Box::new(parser));
        self
    }

    pub fn get(&self, institution: Institution, document_type: DocumentType) -> Option<&dyn StatementParser> {
        self.strategies
            .get(&(institution, document_type))
            .map(|p| p.as_ref())
    }

    /// Look up a strategy, retrying a ledger variant as its parent institution
    /// once before giving up.
    pub fn dispatch(
        &self,
        institution: Institution,
        document_type: DocumentType,
    ) -> Result<&dyn StatementParser, ExtractError> {
        if let Some(parser) = self.get(institution, document_type) {
            return Ok(parser);
        }
        institution
            .parent()
            .and_then(|parent| self.get(parent, document_type))
            .ok_or_else(|| ExtractError::unsupported(institution.as_str(), document_type.as_str()))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
