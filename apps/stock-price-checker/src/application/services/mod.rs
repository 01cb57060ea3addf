//! Application Services

mod like_ledger;

pub use like_ledger::{LedgerError, LikeLedger, MAX_CREATE_ATTEMPTS};
