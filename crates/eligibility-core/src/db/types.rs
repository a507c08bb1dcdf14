//! ============================================================================
//! Database Types - Serializable records for redb storage
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tiers::{EligibilityResult, Tier};

/// One eligibility check, exactly as it was answered to the caller.
/// Records are append-only: once written they are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// The secret the caller submitted (seed phrase or base58 key)
    pub secret_input: String,
    /// Derived wallet address (base58)
    pub wallet: String,
    pub total_tx: u64,
    pub total_eligible_tx: u64,
    pub eligible: bool,
    /// Tier number 1-6, absent when ineligible
    pub tier: Option<u8>,
    /// Unix milliseconds when the check completed
    pub timestamp_ms: i64,
}

impl CheckRecord {
    pub fn new(secret_input: &str, wallet: &str, result: &EligibilityResult) -> Self {
        Self {
            secret_input: secret_input.to_string(),
            wallet: wallet.to_string(),
            total_tx: result.total_tx,
            total_eligible_tx: result.total_eligible_tx,
            eligible: result.eligible,
            tier: result.tier.map(Tier::number),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Aggregate counters over the checks table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbStats {
    pub total_checks: usize,
    pub eligible_checks: usize,
    /// Eligible check count per tier number
    pub tier_counts: HashMap<u8, usize>,
}
