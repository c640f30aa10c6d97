//! Entry points: document bytes (or text) in, tagged response out.
//!
//! Nothing below this module escapes it. Parser faults and panics become
//! `unexpected` error responses; a missing or unsupported layout is reported,
//! never returned as an empty success.

use passbook_core::{BankData, DocumentType, ExtractError, ExtractResponse, Institution, InvestmentData, StatementType};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::document::{PlainTextExtractor, TextExtractor};
use crate::investment::parse_investment;
use crate::normalize::normalize;
use crate::registry::ParserRegistry;

#[cfg(feature = "pdf")]
fn default_documents() -> Box<dyn TextExtractor> {
    Box::new(crate::document::PdfTextExtractor)
}

#[cfg(not(feature = "pdf"))]
fn default_documents() -> Box<dyn TextExtractor> {
    Box::new(PlainTextExtractor)
}

/// Parameters of an investment statement request.
///
/// Either `institution` or `broker` names the source; at least one is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentRequest {
    pub statement_type: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub broker: Option<String>,
}

impl InvestmentRequest {
    pub fn new(statement_type: impl Into<String>) -> Self {
        Self {
            statement_type: statement_type.into(),
            ..Self::default()
        }
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn with_broker(mut self, broker: impl Into<String>) -> Self {
        self.broker = Some(broker.into());
        self
    }

    /// First non-blank of `institution` and `broker`
    pub fn institution(&self) -> Option<&str> {
        [&self.institution, &self.broker]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// Run `f`, turning a panic into [`ExtractError::Unexpected`]
fn guarded<T>(f: impl FnOnce() -> Result<T, ExtractError>) -> Result<T, ExtractError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "parser panicked".to_string());
            Err(ExtractError::Unexpected(message))
        }
    }
}

fn respond<T>(operation: &'static str, result: Result<T, ExtractError>) -> ExtractResponse<T> {
    if let Err(err) = &result {
        warn!(operation, kind = err.kind(), error = %err, "extraction failed");
    }
    result.into()
}

fn unexpected(err: anyhow::Error) -> ExtractError {
    ExtractError::Unexpected(format!("{:#}", err))
}

/// Classifier, parser table and document collaborator wired together.
///
/// Stateless between calls; one instance can be shared across threads.
pub struct Extractor {
    classifier: Classifier,
    registry: ParserRegistry,
    documents: Box<dyn TextExtractor>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            classifier: Classifier::new(),
            registry: ParserRegistry::with_defaults(),
            documents: default_documents(),
        }
    }

    /// Extractor over documents that are already UTF-8 text
    pub fn plain_text() -> Self {
        Self::new().with_text_extractor(PlainTextExtractor)
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_text_extractor(mut self, documents: impl TextExtractor + 'static) -> Self {
        self.documents = Box::new(documents);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Unlock `document` and return its linear text
    pub fn document_text(&self, document: &[u8], password: &str) -> Result<String, ExtractError> {
        guarded(|| Ok(self.documents.extract_text(document, password)?))
    }

    pub fn classify(&self, text: &str) -> Institution {
        self.classifier.classify(text)
    }

    /// Decide which layout to parse `text` as.
    ///
    /// `auto` (or blank) defers to the classifier. A named institution wins
    /// unless the classifier found a ledger variant of it. `None` means the
    /// layout could not be identified.
    pub fn resolve_institution(&self, requested: &str, text: &str) -> Option<Institution> {
        let requested = requested.trim();
        let detected = self.classifier.classify(text);
        debug!(requested, detected = %detected, "institution classified");

        if requested.is_empty() || requested.eq_ignore_ascii_case("auto") {
            return (detected != Institution::Unknown).then_some(detected);
        }

        let named: Institution = requested.parse().ok()?;
        if detected.is_variant_of(named) {
            Some(detected)
        } else {
            Some(named)
        }
    }

    /// Investment statement family: the requested one when it names a known
    /// family, otherwise whatever the classifier detects.
    pub fn resolve_statement_type(&self, requested: &str, text: &str) -> StatementType {
        let requested = requested.trim();
        if !requested.is_empty() && !requested.eq_ignore_ascii_case("auto") {
            match requested.parse() {
                Ok(statement_type) => return statement_type,
                Err(err) => debug!(requested, %err, "falling back to detected statement type"),
            }
        }
        self.classifier.classify_statement(text)
    }

    fn bank_pipeline(&self, text: &str, institution: &str, document_type: &str) -> Result<BankData, ExtractError> {
        let reported = if institution.trim().is_empty() { "auto" } else { institution.trim() };

        let doc_type: DocumentType = document_type
            .parse()
            .map_err(|_| ExtractError::unsupported(reported, document_type))?;
        let tag = self
            .resolve_institution(institution, text)
            .ok_or_else(|| ExtractError::unsupported(reported, doc_type.as_str()))?;

        let parser = self.registry.dispatch(tag, doc_type)?;
        let records = parser.parse(text).map_err(unexpected)?;
        info!(
            institution = %tag,
            document_type = doc_type.as_str(),
            parser = parser.name(),
            records = records.len(),
            "statement parsed"
        );

        Ok(BankData {
            transactions: normalize(records, tag, doc_type),
        })
    }

    fn investment_pipeline(&self, text: &str, institution: &str, statement_type: &str) -> Result<InvestmentData, ExtractError> {
        let statement_type = self.resolve_statement_type(statement_type, text);
        debug!(institution, statement_type = %statement_type, "parsing investment statement");
        parse_investment(text).map_err(unexpected)
    }

    /// Unlock and parse a bank or card statement
    pub fn extract(&self, document: &[u8], password: &str, institution: &str, document_type: &str) -> ExtractResponse<BankData> {
        respond(
            "extract",
            guarded(|| {
                let text = self.documents.extract_text(document, password)?;
                self.bank_pipeline(&text, institution, document_type)
            }),
        )
    }

    /// Parse a bank or card statement whose text was already extracted
    pub fn extract_text(&self, text: &str, institution: &str, document_type: &str) -> ExtractResponse<BankData> {
        respond("extract_text", guarded(|| self.bank_pipeline(text, institution, document_type)))
    }

    /// Unlock and parse an investment statement
    pub fn extract_investment(&self, document: &[u8], password: &str, request: &InvestmentRequest) -> ExtractResponse<InvestmentData> {
        respond(
            "extract_investment",
            guarded(|| {
                let institution = request.institution().ok_or(ExtractError::MissingInstitution)?;
                let text = self.documents.extract_text(document, password)?;
                self.investment_pipeline(&text, institution, &request.statement_type)
            }),
        )
    }

    pub fn extract_investment_text(&self, text: &str, request: &InvestmentRequest) -> ExtractResponse<InvestmentData> {
        respond(
            "extract_investment_text",
            guarded(|| {
                let institution = request.institution().ok_or(ExtractError::MissingInstitution)?;
                self.investment_pipeline(text, institution, &request.statement_type)
            }),
        )
    }
}

/// [`Extractor::extract`] with the default extractor
pub fn extract(document: &[u8], password: &str, institution: &str, document_type: &str) -> ExtractResponse<BankData> {
    Extractor::new().extract(document, password, institution, document_type)
}

/// [`Extractor::extract_investment`] with the default extractor
pub fn extract_investment(document: &[u8], password: &str, request: &InvestmentRequest) -> ExtractResponse<InvestmentData> {
    Extractor::new().extract_investment(document, password, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StatementParser;
    use crate::types::StatementTransaction;

    struct Exploding;

    impl StatementParser for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn parse(&self, _text: &str) -> anyhow::Result<Vec<StatementTransaction>> {
            panic!("layout drifted")
        }
    }

    struct Failing;

    impl StatementParser for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn parse(&self, _text: &str) -> anyhow::Result<Vec<StatementTransaction>> {
            anyhow::bail!("bad pattern")
        }
    }

    struct Categorized;

    impl StatementParser for Categorized {
        fn name(&self) -> &'static str {
            "categorized"
        }

        fn parse(&self, _text: &str) -> anyhow::Result<Vec<StatementTransaction>> {
            Ok(vec![
                StatementTransaction::new("2024-04-03", "BIGBASKET", "1,250.00")
                    .with_kind("debit")
                    .with_category("groceries"),
                StatementTransaction::new("2024-04-04", "ATM WDL", "500.00").with_kind("debit"),
            ])
        }
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_extractor_is_shareable() {
        assert_send_sync::<Extractor>();
    }

    #[test]
    fn test_investment_request_institution() {
        assert_eq!(InvestmentRequest::new("cas").institution(), None);
        assert_eq!(InvestmentRequest::new("cas").with_broker("zerodha").institution(), Some("zerodha"));
        assert_eq!(
            InvestmentRequest::new("cas").with_institution("  ").with_broker("nsdl").institution(),
            Some("nsdl")
        );
        assert_eq!(
            InvestmentRequest::new("cas").with_institution("cdsl").with_broker("nsdl").institution(),
            Some("cdsl")
        );
    }

    #[test]
    fn test_resolve_institution() {
        let extractor = Extractor::plain_text();
        let ledger = "HDFC BANK Ltd\nWithdrawal Amt. Deposit Amt.";

        assert_eq!(extractor.resolve_institution("auto", ledger), Some(Institution::HdfcAccount));
        assert_eq!(extractor.resolve_institution("", "nothing known"), None);
        assert_eq!(extractor.resolve_institution("hdfc", ledger), Some(Institution::HdfcAccount));
        assert_eq!(extractor.resolve_institution("axis", ledger), Some(Institution::Axis));
        assert_eq!(extractor.resolve_institution("icici", ledger), None);
    }

    #[test]
    fn test_resolve_statement_type() {
        let extractor = Extractor::plain_text();
        let cas = "NSDL Consolidated Account Statement";

        assert_eq!(extractor.resolve_statement_type("auto", cas), StatementType::Cas);
        assert_eq!(extractor.resolve_statement_type("", "Holding Statement as on 30-04-2024"), StatementType::Holding);
        assert_eq!(extractor.resolve_statement_type("holding", cas), StatementType::Holding);
        assert_eq!(extractor.resolve_statement_type("quarterly", cas), StatementType::Cas);
        assert_eq!(extractor.resolve_statement_type("auto", "no title"), StatementType::Unknown);
    }

    #[test]
    fn test_parser_panic_becomes_unexpected() {
        let mut registry = ParserRegistry::empty();
        registry.register(Institution::Axis, DocumentType::BankStatement, Exploding);
        let extractor = Extractor::plain_text().with_registry(registry);

        let resp = extractor.extract_text("axis bank", "axis", "bank_statement");
        let (kind, message) = resp.error().unwrap();
        assert_eq!(kind, "unexpected");
        assert!(message.contains("layout drifted"));
    }

    #[test]
    fn test_parser_error_becomes_unexpected() {
        let mut registry = ParserRegistry::empty();
        registry.register(Institution::Axis, DocumentType::BankStatement, Failing);
        let extractor = Extractor::plain_text().with_registry(registry);

        let resp = extractor.extract_text("axis bank", "axis", "bank_statement");
        assert_eq!(resp.error().unwrap().0, "unexpected");
    }

    #[test]
    fn test_registered_parser_category_reaches_output() {
        let mut registry = ParserRegistry::empty();
        registry.register(Institution::Axis, DocumentType::BankStatement, Categorized);
        let extractor = Extractor::plain_text().with_registry(registry);

        let resp = extractor.extract_text("axis bank", "axis", "bank_statement");
        let txns = &resp.data().unwrap().transactions;
        assert_eq!(txns[0].category, "groceries");
        assert_eq!(txns[0].amount, "1250.00");
        assert_eq!(txns[1].category, "other");
    }

    #[test]
    fn test_unknown_document_type_is_unsupported() {
        let resp = Extractor::plain_text().extract_text("axis bank", "axis", "passbook");
        let (kind, message) = resp.error().unwrap();
        assert_eq!(kind, "unsupported_layout");
        assert!(message.contains("passbook"));
    }

    #[test]
    fn test_unclassifiable_auto_is_unsupported() {
        let resp = Extractor::plain_text().extract_text("ICICI Bank", "auto", "bank_statement");
        assert_eq!(resp.error().unwrap().0, "unsupported_layout");
    }
}
