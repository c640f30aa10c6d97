//! Convert native parser records into canonical transactions.

use chrono::NaiveDateTime;
use passbook_core::{truncate_amount, DocumentType, Institution, Transaction, TransactionType};
use tracing::debug_span;

use crate::types::StatementTransaction;

/// The only timestamp layout recognized in source records
const SOURCE_TIMESTAMP: &str = "%d/%m/%Y %H:%M:%S";
const CANONICAL_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// ISO-8601 when the source matches the card layout's timestamp, otherwise the
/// source string unchanged
pub fn normalize_timestamp(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw.trim(), SOURCE_TIMESTAMP) {
        Ok(ts) => ts.format(CANONICAL_TIMESTAMP).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn category_for(raw: Option<&str>, txn_type: TransactionType) -> String {
    match raw.map(str::trim) {
        Some(c) if !c.is_empty() && !c.eq_ignore_ascii_case("unknown") => c.to_string(),
        _ => txn_type.default_category().to_string(),
    }
}

pub fn normalize_record(record: StatementTransaction) -> Transaction {
    let txn_type = TransactionType::from_source(record.kind.as_deref());
    Transaction {
        timestamp: normalize_timestamp(&record.date),
        description: record.description,
        amount: truncate_amount(&record.amount),
        txn_type,
        category: category_for(record.raw_category.as_deref(), txn_type),
    }
}

/// Normalize every record, preserving order
pub fn normalize(
    records: Vec<StatementTransaction>,
    institution: Institution,
    document_type: DocumentType,
) -> Vec<Transaction> {
    let span = debug_span!("normalize", %institution, document_type = document_type.as_str(), records = records.len());
    let _guard = span.enter();

    records.into_iter().map(normalize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_timestamp_to_iso() {
        assert_eq!(normalize_timestamp("12/03/2024 10:15:30"), "2024-03-12T10:15:30");
    }

    #[test]
    fn test_other_dates_pass_through() {
        assert_eq!(normalize_timestamp("01/04/24"), "01/04/24");
        assert_eq!(normalize_timestamp("2024-04-02"), "2024-04-02");
        assert_eq!(normalize_timestamp("31/02/2024 10:00:00"), "31/02/2024 10:00:00");
    }

    #[test]
    fn test_normalize_record() {
        let record = StatementTransaction::new("14/03/2024 09:02:11", "PAYMENT RECEIVED", "5,000.00").with_kind("credit");
        let txn = normalize_record(record);
        assert_eq!(txn.timestamp, "2024-03-14T09:02:11");
        assert_eq!(txn.amount, "5000.00");
        assert_eq!(txn.txn_type, TransactionType::Income);
        assert_eq!(txn.category, "other");
    }

    #[test]
    fn test_category_defaults() {
        let mut record = StatementTransaction::new("x", "RD INSTALMENT", "₹1,000.999").with_kind("savings");
        record.raw_category = Some("unknown".to_string());
        let txn = normalize_record(record);
        assert_eq!(txn.category, "others");
        assert_eq!(txn.amount, "1000.99");

        let record = StatementTransaction::new("x", "SWIGGY", "250").with_kind("debit").with_category("food");
        assert_eq!(normalize_record(record).category, "food");
    }

    #[test]
    fn test_unknown_direction_is_expense_with_empty_amount() {
        let record = StatementTransaction::new("01/04/24", "REVERSAL", "").with_kind("unknown");
        let txn = normalize_record(record);
        assert_eq!(txn.txn_type, TransactionType::Expenses);
        assert_eq!(txn.amount, "");
    }

    #[test]
    fn test_normalize_preserves_order() {
        let records = vec![
            StatementTransaction::new("a", "first", "1.00"),
            StatementTransaction::new("b", "second", "2.00"),
        ];
        let txns = normalize(records, Institution::Axis, DocumentType::BankStatement);
        assert_eq!(txns[0].description, "first");
        assert_eq!(txns[1].description, "second");
    }
}
