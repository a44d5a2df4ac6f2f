//! Posting ledger: the authority on which matches have already been announced.

mod service;

pub use service::PostingLedger;
