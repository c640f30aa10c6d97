pub mod axis;
pub mod hdfc_account;
pub mod hdfc_card;

pub use axis::{parse_axis_header, parse_axis_text, AxisParser};
pub use hdfc_account::{parse_hdfc_account_text, reconcile_balances, HdfcAccountParser, LedgerRow};
pub use hdfc_card::{parse_hdfc_card_text, HdfcCardParser};
