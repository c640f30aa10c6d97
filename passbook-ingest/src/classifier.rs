//! Institution detection over normalized statement text.
//!
//! First match wins over an ordered rule table; there is no scoring. Ledger
//! variants must be listed before their parent institution.

use passbook_core::{Institution, StatementType};
use serde::{Deserialize, Serialize};

/// Built-in signatures, in priority order
const BUILTIN_RULES: &[(Institution, &[&str])] = &[
    // Account ledger: withdrawal/deposit columns select it over the card layout
    (Institution::HdfcAccount, &["hdfc bank", "withdrawal amt", "deposit amt"]),
    (Institution::HdfcAccount, &["hdfc bank", "withdrawal amount", "deposit amount"]),
    (Institution::Hdfc, &["hdfc bank"]),
    (Institution::Hdfc, &["hdfc credit card"]),
    (Institution::Axis, &["axis bank"]),
];

/// Investment statement titles, in priority order
const STATEMENT_RULES: &[(StatementType, &[&str])] = &[
    (StatementType::Cas, &["consolidated account statement"]),
    (StatementType::Holding, &["holding statement"]),
    (StatementType::Holding, &["statement of holding"]),
];

/// One signature: every phrase must occur in the normalized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub tag: Institution,
    pub all_of: Vec<String>,
}

impl ClassifierRule {
    pub fn new(tag: Institution, phrases: &[&str]) -> Self {
        Self {
            tag,
            all_of: phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    fn matches(&self, normalized: &str) -> bool {
        !self.all_of.is_empty() && self.all_of.iter().all(|p| normalized.contains(p.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassifierRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(tag, phrases)| ClassifierRule::new(*tag, phrases))
                .collect(),
        }
    }

    /// Built-in table with `extra` rules tried first
    pub fn with_rules(extra: impl IntoIterator<Item = ClassifierRule>) -> Self {
        let mut rules: Vec<ClassifierRule> = extra
            .into_iter()
            .map(|r| ClassifierRule {
                tag: r.tag,
                all_of: r.all_of.iter().map(|p| normalize_text(p)).collect(),
            })
            .collect();
        rules.extend(Self::new().rules);
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Classify raw document text
    pub fn classify(&self, text: &str) -> Institution {
        self.classify_normalized(&normalize_text(text))
    }

    /// Classify text already passed through [`normalize_text`]
    pub fn classify_normalized(&self, normalized: &str) -> Institution {
        self.rules
            .iter()
            .find(|rule| rule.matches(normalized))
            .map(|rule| rule.tag)
            .unwrap_or(Institution::Unknown)
    }

    /// Family of an investment statement, from its title
    pub fn classify_statement(&self, text: &str) -> StatementType {
        let normalized = normalize_text(text);
        STATEMENT_RULES
            .iter()
            .find(|(_, phrases)| phrases.iter().all(|p| normalized.contains(p)))
            .map(|(tag, _)| *tag)
            .unwrap_or(StatementType::Unknown)
    }
}

/// Collapse whitespace runs to single spaces and lower-case
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  HDFC   Bank\n\tLtd "), "hdfc bank ltd");
    }

    #[test]
    fn test_ledger_headers_select_account_variant() {
        let text = "HDFC BANK Ltd\nDate Narration Chq./Ref.No. Value Dt Withdrawal Amt. Deposit Amt. Closing Balance";
        assert_eq!(Classifier::new().classify(text), Institution::HdfcAccount);
    }

    #[test]
    fn test_card_statement_is_plain_hdfc() {
        let text = "HDFC Bank Credit Cards\nDomestic Transactions\n12/03/2024 10:15:30 SWIGGY 250.00";
        assert_eq!(Classifier::new().classify(text), Institution::Hdfc);
    }

    #[test]
    fn test_axis_and_unknown() {
        let classifier = Classifier::new();
        assert_eq!(classifier.classify("Axis Bank statement of account"), Institution::Axis);
        assert_eq!(classifier.classify("ICICI Bank statement"), Institution::Unknown);
        assert_eq!(classifier.classify(""), Institution::Unknown);
    }

    #[test]
    fn test_extra_rules_take_priority() {
        let extra = vec![ClassifierRule {
            tag: Institution::Axis,
            all_of: vec!["Flipkart  Axis".to_string()],
        }];
        let classifier = Classifier::with_rules(extra);
        assert_eq!(classifier.rules()[0].all_of, vec!["flipkart axis"]);
        assert_eq!(classifier.classify("Flipkart Axis Bank credit card"), Institution::Axis);
        // built-ins still present
        assert_eq!(classifier.classify("hdfc bank"), Institution::Hdfc);
    }

    #[test]
    fn test_statement_families() {
        let classifier = Classifier::new();
        assert_eq!(
            classifier.classify_statement("NSDL Consolidated Account Statement\nStatement for the period"),
            StatementType::Cas
        );
        // A CAS also prints a holding statement section; the title wins
        assert_eq!(
            classifier.classify_statement("CONSOLIDATED ACCOUNT STATEMENT\nHOLDING STATEMENT AS ON 30-04-2024"),
            StatementType::Cas
        );
        assert_eq!(classifier.classify_statement("Statement of Holding in Demat Account"), StatementType::Holding);
        assert_eq!(classifier.classify_statement("HDFC Bank Credit Cards"), StatementType::Unknown);
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let classifier = Classifier::with_rules(vec![ClassifierRule {
            tag: Institution::Axis,
            all_of: vec![],
        }]);
        assert_eq!(classifier.classify("hdfc bank"), Institution::Hdfc);
    }
}
