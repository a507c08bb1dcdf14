// ============================================================================
// EligibilityDb — Embedded Database (redb)
// ============================================================================
// Append-only store for eligibility check results.
// Default path: ~/.eligibility/checks.redb (override via ELIGIBILITY_DB_PATH)
// ============================================================================

pub mod types;

pub use types::{CheckRecord, DbStats};

use anyhow::{anyhow, Result};
use redb::{Database, TableDefinition};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

// Keys are "{timestamp_ms:020}:{seq:020}:{wallet}" so a range scan is
// chronological. The process-scoped sequence keeps keys unique when the same
// wallet is checked twice within one millisecond; redb insert would
// otherwise replace the earlier record.
const CHECKS: TableDefinition<&str, &[u8]> = TableDefinition::new("checks");

static CHECK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Embedded database for eligibility check history
pub struct EligibilityDb {
    db: Database,
    path: PathBuf,
}

impl EligibilityDb {
    /// Open (or create) the database at the given path.
    /// If `path` is None, uses ELIGIBILITY_DB_PATH env var or
    /// ~/.eligibility/checks.redb
    pub fn open(path: Option<&str>) -> Result<Self> {
        let db_path = if let Some(p) = path {
            PathBuf::from(p)
        } else if let Ok(env_path) = std::env::var("ELIGIBILITY_DB_PATH") {
            PathBuf::from(env_path)
        } else {
            let home =
                dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
            let data_dir = home.join(".eligibility");
            std::fs::create_dir_all(&data_dir)
                .map_err(|e| anyhow!("Failed to create .eligibility directory: {}", e))?;
            data_dir.join("checks.redb")
        };

        info!("Opening database at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        // Ensure the table exists by doing a write transaction
        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(CHECKS)
                .map_err(|e| anyhow!("Failed to create checks table: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        info!("Database ready");

        Ok(Self { db, path: db_path })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one check record. Existing records are never touched.
    pub fn append_check(&self, record: &CheckRecord) -> Result<()> {
        let seq = CHECK_SEQ.fetch_add(1, Ordering::Relaxed);
        let key = format!("{:020}:{:020}:{}", record.timestamp_ms, seq, record.wallet);
        let value = bincode::serialize(record)
            .map_err(|e| anyhow!("Failed to serialize check: {}", e))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn
                .open_table(CHECKS)
                .map_err(|e| anyhow!("Failed to open checks table: {}", e))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(|e| anyhow!("Failed to insert check: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit: {}", e))?;

        debug!("Stored check for wallet: {}", record.wallet);
        Ok(())
    }

    /// List checks oldest-first, optionally filtered to one wallet.
    pub fn list_checks(&self, wallet: Option<&str>) -> Result<Vec<CheckRecord>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn
            .open_table(CHECKS)
            .map_err(|e| anyhow!("Failed to open checks table: {}", e))?;

        let mut results = Vec::new();
        let iter = table
            .range::<&str>(..)
            .map_err(|e| anyhow!("Failed to iterate checks: {}", e))?;
        for entry in iter {
            let (_key, value) = entry.map_err(|e| anyhow!("Failed to read entry: {}", e))?;
            let record: CheckRecord = bincode::deserialize(value.value())
                .map_err(|e| anyhow!("Failed to deserialize check: {}", e))?;

            if let Some(filter) = wallet {
                if record.wallet == filter {
                    results.push(record);
                }
            } else {
                results.push(record);
            }
        }
        Ok(results)
    }

    /// Aggregate counters across all stored checks.
    pub fn stats(&self) -> Result<DbStats> {
        let checks = self.list_checks(None)?;

        let mut tier_counts = std::collections::HashMap::new();
        let mut eligible_checks = 0usize;
        for check in &checks {
            if check.eligible {
                eligible_checks += 1;
            }
            if let Some(tier) = check.tier {
                *tier_counts.entry(tier).or_insert(0usize) += 1;
            }
        }

        Ok(DbStats {
            total_checks: checks.len(),
            eligible_checks,
            tier_counts,
        })
    }
}
