use serde::{Deserialize, Serialize};

/// Native output of the bank/card statement parsers (layout-agnostic, not yet
/// normalized). Every field is the statement's own token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTransaction {
    /// Date (and time, for card layouts) exactly as printed
    pub date: String,
    pub description: String,
    /// Unsigned amount; may still carry currency symbols and grouping commas.
    /// Empty when the direction could not be decided.
    pub amount: String,
    /// Source direction vocabulary: "credit", "debit", "unknown"
    pub kind: Option<String>,
    /// Running balance after this transaction, when the layout prints one
    pub balance: Option<String>,
    /// Category printed by the source. None of the built-in layouts print one;
    /// parsers registered through [`ParserRegistry::register`] may set it.
    ///
    /// [`ParserRegistry::register`]: crate::registry::ParserRegistry::register
    pub raw_category: Option<String>,
}

impl StatementTransaction {
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_balance(mut self, balance: impl Into<String>) -> Self {
        self.balance = Some(balance.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.raw_category = Some(category.into());
        self
    }
}

/// Account details printed in a statement header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementHeader {
    pub account_holder: String,
    pub account_number: String,
}
