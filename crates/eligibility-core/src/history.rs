//! ============================================================================
//! History Fetcher - Paginated transaction counting
//! ============================================================================
//! Walks a wallet's signature history backwards, one page at a time, keeping
//! only a running total and the current cursor so memory stays bounded no
//! matter how active the wallet is.
//! ============================================================================

use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ledger::LedgerHistory;

/// Maximum signatures per page accepted by the RPC getSignaturesForAddress call
pub const SIGNATURE_PAGE_LIMIT: usize = 1000;

/// Counts a wallet's total on-chain transactions by paging through its
/// signature history.
pub struct HistoryFetcher {
    ledger: Arc<dyn LedgerHistory>,
    page_limit: usize,
}

impl HistoryFetcher {
    pub fn new(ledger: Arc<dyn LedgerHistory>) -> Self {
        Self::with_page_limit(ledger, SIGNATURE_PAGE_LIMIT)
    }

    pub fn with_page_limit(ledger: Arc<dyn LedgerHistory>, page_limit: usize) -> Self {
        Self { ledger, page_limit }
    }

    /// Total number of transactions recorded for `address`.
    ///
    /// Each non-empty page advances the cursor to its oldest signature; an
    /// empty page is the sole exit condition, so the loop terminates once
    /// the finite history is exhausted. Any ledger error aborts the scan and
    /// yields 0 (fail-soft): the wallet classifies as ineligible instead of
    /// the request failing. The error is logged for operators.
    pub async fn total_transaction_count(&self, address: &Pubkey) -> u64 {
        let mut total: u64 = 0;
        let mut cursor: Option<String> = None;

        loop {
            let page = match self
                .ledger
                .signatures_for_address(address, cursor.as_deref(), self.page_limit)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!("Error fetching transactions for {}: {}", address, e);
                    return 0;
                }
            };

            let Some(oldest) = page.last() else { break };
            cursor = Some(oldest.signature.clone());
            total += page.len() as u64;
        }

        debug!("Wallet {} has {} total transactions", address, total);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerError, SignatureRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Deterministic in-memory ledger: serves pages out of a fixed signature
    /// list (newest first) and records the cursor of every call.
    struct MockLedger {
        signatures: Vec<String>,
        calls: Mutex<Vec<Option<String>>>,
        fail_on_call: Option<usize>,
    }

    impl MockLedger {
        fn with_history(len: usize) -> Self {
            Self {
                signatures: (0..len).map(|i| format!("sig-{:05}", i)).collect(),
                calls: Mutex::new(Vec::new()),
                fail_on_call: None,
            }
        }

        fn failing_on_call(len: usize, call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::with_history(len)
            }
        }

        fn calls(&self) -> Vec<Option<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LedgerHistory for MockLedger {
        async fn signatures_for_address(
            &self,
            _address: &Pubkey,
            before: Option<&str>,
            limit: usize,
        ) -> Result<Vec<SignatureRecord>, LedgerError> {
            let call_index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(before.map(str::to_string));
                calls.len()
            };
            if self.fail_on_call == Some(call_index) {
                return Err(LedgerError::Rpc("connection refused".to_string()));
            }

            let start = match before {
                Some(cursor) => {
                    self.signatures
                        .iter()
                        .position(|s| s == cursor)
                        .expect("cursor must be a previously returned signature")
                        + 1
                }
                None => 0,
            };

            Ok(self
                .signatures
                .iter()
                .skip(start)
                .take(limit)
                .map(|s| SignatureRecord {
                    signature: s.clone(),
                    slot: 0,
                    block_time: None,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_pagination_chains_cursors() {
        let ledger = Arc::new(MockLedger::with_history(2037));
        let fetcher = HistoryFetcher::new(ledger.clone());
        let address = Pubkey::new_unique();

        let total = fetcher.total_transaction_count(&address).await;
        assert_eq!(total, 2037);

        // Pages of 1000, 1000, 37, then the empty page that terminates
        let calls = ledger.calls();
        assert_eq!(
            calls,
            vec![
                None,
                Some("sig-00999".to_string()),
                Some("sig-01999".to_string()),
                Some("sig-02036".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_history_is_zero() {
        let ledger = Arc::new(MockLedger::with_history(0));
        let fetcher = HistoryFetcher::new(ledger.clone());

        let total = fetcher.total_transaction_count(&Pubkey::new_unique()).await;
        assert_eq!(total, 0);
        assert_eq!(ledger.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_scans_are_idempotent() {
        let ledger = Arc::new(MockLedger::with_history(2500));
        let fetcher = HistoryFetcher::new(ledger);
        let address = Pubkey::new_unique();

        let first = fetcher.total_transaction_count(&address).await;
        let second = fetcher.total_transaction_count(&address).await;
        assert_eq!(first, 2500);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_error_fails_soft_to_zero() {
        let ledger = Arc::new(MockLedger::failing_on_call(2037, 1));
        let fetcher = HistoryFetcher::new(ledger);

        let total = fetcher.total_transaction_count(&Pubkey::new_unique()).await;
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_mid_scan_error_discards_partial_total() {
        // Failure on page 2 must not surface the 1000 already counted
        let ledger = Arc::new(MockLedger::failing_on_call(2037, 2));
        let fetcher = HistoryFetcher::new(ledger.clone());

        let total = fetcher.total_transaction_count(&Pubkey::new_unique()).await;
        assert_eq!(total, 0);
        assert_eq!(ledger.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_custom_page_limit() {
        let ledger = Arc::new(MockLedger::with_history(25));
        let fetcher = HistoryFetcher::with_page_limit(ledger.clone(), 10);

        let total = fetcher.total_transaction_count(&Pubkey::new_unique()).await;
        assert_eq!(total, 25);
        // 10 + 10 + 5 + empty
        assert_eq!(ledger.calls().len(), 4);
    }
}
