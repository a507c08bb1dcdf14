//! ============================================================================
//! Eligibility Checker - Full check pipeline
//! ============================================================================
//! Orchestrates one classification request: derive the wallet address from
//! the caller's secret, count its on-chain transactions, classify, persist.
//! ============================================================================

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::db::{CheckRecord, EligibilityDb};
use crate::history::HistoryFetcher;
use crate::ledger::LedgerHistory;
use crate::tiers::{self, EligibilityResult};
use crate::wallet::{self, SecretError};

/// Errors a check can surface to the caller.
///
/// Ledger failures are deliberately absent: the history fetcher absorbs them
/// into a zero count, so classification always produces a result. An invalid
/// secret is the caller's problem; a persistence failure means the (valid)
/// result may not have been recorded.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    InvalidSecret(#[from] SecretError),

    #[error("failed to save check result: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// Runs eligibility checks against the ledger and records every outcome.
pub struct EligibilityChecker {
    fetcher: HistoryFetcher,
    db: Arc<EligibilityDb>,
}

impl EligibilityChecker {
    pub fn new(ledger: Arc<dyn LedgerHistory>, db: Arc<EligibilityDb>) -> Self {
        Self {
            fetcher: HistoryFetcher::new(ledger),
            db,
        }
    }

    /// Check the wallet behind a secret (seed phrase or base58 private key).
    pub async fn check_secret(&self, secret: &str) -> Result<EligibilityResult, CheckError> {
        let wallet = wallet::derive_pubkey(secret)?;
        info!("Checking wallet on-chain: {}", wallet);

        let total_tx = self.fetcher.total_transaction_count(&wallet).await;
        let result = tiers::classify(total_tx);
        info!(
            "Wallet {}: {} transactions, eligible: {}, tier: {:?}",
            wallet,
            total_tx,
            result.eligible,
            result.tier.map(|t| t.number())
        );

        let record = CheckRecord::new(secret, &wallet.to_string(), &result);
        self.db
            .append_check(&record)
            .map_err(CheckError::Persistence)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerError, SignatureRecord};
    use crate::tiers::Tier;
    use async_trait::async_trait;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Keypair;
    use solana_sdk::signer::Signer;
    use std::path::PathBuf;

    struct FixedLedger {
        history_len: usize,
    }

    #[async_trait]
    impl LedgerHistory for FixedLedger {
        async fn signatures_for_address(
            &self,
            _address: &Pubkey,
            before: Option<&str>,
            limit: usize,
        ) -> Result<Vec<SignatureRecord>, LedgerError> {
            let start = match before {
                Some(cursor) => cursor.parse::<usize>().unwrap() + 1,
                None => 0,
            };
            Ok((start..self.history_len.min(start + limit))
                .map(|i| SignatureRecord {
                    signature: i.to_string(),
                    slot: 0,
                    block_time: None,
                })
                .collect())
        }
    }

    fn temp_db(name: &str) -> (Arc<EligibilityDb>, PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "eligibility-checker-test-{}-{}.redb",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        let db = EligibilityDb::open(Some(path.to_str().unwrap())).unwrap();
        (Arc::new(db), path)
    }

    #[tokio::test]
    async fn test_check_secret_classifies_and_persists() {
        let (db, path) = temp_db("persists");
        let checker = EligibilityChecker::new(Arc::new(FixedLedger { history_len: 612 }), db.clone());

        let keypair = Keypair::new();
        let secret = bs58::encode(keypair.to_bytes()).into_string();

        let result = checker.check_secret(&secret).await.unwrap();
        assert_eq!(result.total_tx, 612);
        assert_eq!(result.total_eligible_tx, 102);
        assert!(result.eligible);
        assert_eq!(result.tier, Some(Tier::Tier1));

        let checks = db.list_checks(None).unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].wallet, keypair.pubkey().to_string());
        assert_eq!(checks[0].tier, Some(1));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_invalid_secret_is_not_persisted() {
        let (db, path) = temp_db("invalid");
        let checker = EligibilityChecker::new(Arc::new(FixedLedger { history_len: 0 }), db.clone());

        let err = checker.check_secret("not a secret at all !!").await.unwrap_err();
        assert!(matches!(err, CheckError::InvalidSecret(_)));
        assert!(db.list_checks(None).unwrap().is_empty());

        let _ = std::fs::remove_file(path);
    }
}
