//! ============================================================================
//! Ledger Client - Transaction signature history from Solana RPC
//! ============================================================================
//! The `LedgerHistory` trait is the seam between the history fetcher and the
//! network; `SolanaLedger` is the production implementation over the
//! nonblocking RPC client.
//! ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors from the ledger history service.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// RPC connection or request failed
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Pagination cursor was not a parseable transaction signature
    #[error("invalid pagination cursor '{0}'")]
    InvalidCursor(String),
}

/// One transaction signature entry as returned by the ledger.
/// `signature` doubles as the pagination cursor for the next page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
}

/// Paginated access to a wallet's transaction signature history.
#[async_trait]
pub trait LedgerHistory: Send + Sync {
    /// Fetch one page of signatures for `address`, newest first, containing
    /// only entries strictly older than `before` when a cursor is given.
    /// At most `limit` entries are returned; an empty page means the history
    /// is exhausted.
    async fn signatures_for_address(
        &self,
        address: &Pubkey,
        before: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, LedgerError>;
}

/// Ledger history backed by a Solana JSON-RPC endpoint.
pub struct SolanaLedger {
    rpc_client: RpcClient,
    rpc_url: String,
}

impl SolanaLedger {
    pub fn new(rpc_url: &str) -> Self {
        info!("Initializing Solana ledger client for {}", rpc_url);

        Self {
            rpc_client: RpcClient::new_with_commitment(
                rpc_url.to_string(),
                CommitmentConfig::confirmed(),
            ),
            rpc_url: rpc_url.to_string(),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl LedgerHistory for SolanaLedger {
    async fn signatures_for_address(
        &self,
        address: &Pubkey,
        before: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, LedgerError> {
        let before = before
            .map(|s| Signature::from_str(s).map_err(|_| LedgerError::InvalidCursor(s.to_string())))
            .transpose()?;

        let config = GetConfirmedSignaturesForAddress2Config {
            before,
            until: None,
            limit: Some(limit),
            commitment: Some(CommitmentConfig::confirmed()),
        };

        let statuses = self
            .rpc_client
            .get_signatures_for_address_with_config(address, config)
            .await
            .map_err(|e| LedgerError::Rpc(e.to_string()))?;

        Ok(statuses
            .into_iter()
            .map(|s| SignatureRecord {
                signature: s.signature,
                slot: s.slot,
                block_time: s.block_time,
            })
            .collect())
    }
}

impl std::fmt::Debug for SolanaLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaLedger")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}
