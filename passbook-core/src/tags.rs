//! Closed-set labels used to pick a parsing strategy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout family a document belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Institution {
    /// HDFC card statement (one transaction per line)
    #[serde(rename = "hdfc")]
    Hdfc,
    /// HDFC savings/current account ledger with withdrawal and deposit columns
    #[serde(rename = "hdfc_account")]
    HdfcAccount,
    #[serde(rename = "axis")]
    Axis,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Institution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Institution::Hdfc => "hdfc",
            Institution::HdfcAccount => "hdfc_account",
            Institution::Axis => "axis",
            Institution::Unknown => "unknown",
        }
    }

    /// Parent institution of a ledger variant
    pub fn parent(&self) -> Option<Institution> {
        match self {
            Institution::HdfcAccount => Some(Institution::Hdfc),
            _ => None,
        }
    }

    /// True if `self` is a layout variant of `other`
    pub fn is_variant_of(&self, other: Institution) -> bool {
        self.parent() == Some(other)
    }
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Institution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "hdfc" | "hdfc_card" => Ok(Institution::Hdfc),
            "hdfc_account" | "hdfc_bank" => Ok(Institution::HdfcAccount),
            "axis" | "axis_bank" => Ok(Institution::Axis),
            "unknown" => Ok(Institution::Unknown),
            other => Err(format!("unrecognized institution '{}'", other)),
        }
    }
}

/// Kind of bank document the caller uploaded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DocumentType {
    #[serde(rename = "bank_statement")]
    BankStatement,
    #[serde(rename = "credit_card")]
    CreditCard,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::BankStatement => "bank_statement",
            DocumentType::CreditCard => "credit_card",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "bank_statement" | "bank" | "account" | "statement" => Ok(DocumentType::BankStatement),
            "credit_card" | "card" | "cc" => Ok(DocumentType::CreditCard),
            other => Err(format!("unrecognized document type '{}'", other)),
        }
    }
}

/// Family of an investment statement. Every family shares the same section
/// parsers; the tag is reported with the results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatementType {
    /// Consolidated account statement (demat and mutual fund folios)
    #[serde(rename = "cas")]
    Cas,
    /// Depository holding statement
    #[serde(rename = "holding")]
    Holding,
    #[serde(rename = "unknown")]
    Unknown,
}

impl StatementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Cas => "cas",
            StatementType::Holding => "holding",
            StatementType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cas" | "consolidated" | "consolidated_account_statement" => Ok(StatementType::Cas),
            "holding" | "holdings" | "holding_statement" => Ok(StatementType::Holding),
            "unknown" => Ok(StatementType::Unknown),
            other => Err(format!("unrecognized statement type '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institution_round_trip_names() {
        for inst in [Institution::Hdfc, Institution::HdfcAccount, Institution::Axis] {
            assert_eq!(inst.as_str().parse::<Institution>(), Ok(inst));
        }
        assert_eq!("HDFC-Account".parse::<Institution>(), Ok(Institution::HdfcAccount));
        assert!("icici".parse::<Institution>().is_err());
    }

    #[test]
    fn test_ledger_variant_parent() {
        assert_eq!(Institution::HdfcAccount.parent(), Some(Institution::Hdfc));
        assert!(Institution::HdfcAccount.is_variant_of(Institution::Hdfc));
        assert_eq!(Institution::Axis.parent(), None);
    }

    #[test]
    fn test_document_type_aliases() {
        assert_eq!("cc".parse::<DocumentType>(), Ok(DocumentType::CreditCard));
        assert_eq!("Bank".parse::<DocumentType>(), Ok(DocumentType::BankStatement));
        assert!("demat".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_statement_type_aliases() {
        assert_eq!("CAS".parse::<StatementType>(), Ok(StatementType::Cas));
        assert_eq!("holding-statement".parse::<StatementType>(), Ok(StatementType::Holding));
        assert!("ledger".parse::<StatementType>().is_err());
    }
}
