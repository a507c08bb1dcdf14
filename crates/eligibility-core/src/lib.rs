//! ============================================================================
//! ELIGIBILITY-CORE: Wallet reward eligibility engine
//! ============================================================================
//! This crate holds all backend logic for the reward eligibility checker:
//! - Wallet derivation from seed phrases / base58 keys via solana-sdk
//! - Paginated transaction-history counting against Solana RPC
//! - Pure tier classification over the transaction count
//! - Append-only check history in an embedded redb database
//! ============================================================================

pub mod checker;
pub mod db;
pub mod history;
pub mod ledger;
pub mod tiers;
pub mod wallet;

// Re-export main types for convenience
pub use checker::{CheckError, EligibilityChecker};
pub use db::{CheckRecord, DbStats, EligibilityDb};
pub use history::{HistoryFetcher, SIGNATURE_PAGE_LIMIT};
pub use ledger::{LedgerError, LedgerHistory, SignatureRecord, SolanaLedger};
pub use tiers::{classify, EligibilityResult, Tier, ELIGIBLE_TX_DIVISOR, MIN_ELIGIBLE_TX};
pub use wallet::{derive_keypair, derive_pubkey, SecretError};
