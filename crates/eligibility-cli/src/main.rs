// ============================================================================
// eligibility-db — CLI inspection tool for the eligibility check history
// ============================================================================
// Usage:
//   eligibility-db stats                          Show check statistics
//   eligibility-db list-checks [--wallet PUBKEY]  List recorded checks
//   eligibility-db export --format json           Export full history as JSON
// ============================================================================

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use eligibility_core::EligibilityDb;

/// Eligibility check history inspection tool
#[derive(Parser)]
#[command(name = "eligibility-db", version, about = "Inspect the wallet eligibility check history")]
struct Cli {
    /// Path to the database file (default: ~/.eligibility/checks.redb)
    #[arg(long, global = true)]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show check statistics (totals and per-tier counts)
    Stats,

    /// List recorded checks, oldest first
    ListChecks {
        /// Only show checks for this wallet address
        #[arg(long)]
        wallet: Option<String>,

        /// Only show checks that qualified for a tier
        #[arg(long)]
        eligible_only: bool,
    },

    /// Export full check history as JSON
    Export {
        /// Output format (currently only json is supported)
        #[arg(long, default_value = "json")]
        format: String,
    },
}

fn format_timestamp(ts_ms: i64) -> String {
    Utc.timestamp_millis_opt(ts_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("(invalid: {})", ts_ms))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let db = EligibilityDb::open(cli.db_path.as_deref())?;

    match cli.command {
        Commands::Stats => cmd_stats(&db),
        Commands::ListChecks {
            wallet,
            eligible_only,
        } => cmd_list_checks(&db, wallet, eligible_only),
        Commands::Export { format } => cmd_export(&db, &format),
    }
}

fn cmd_stats(db: &EligibilityDb) -> Result<()> {
    let stats = db.stats()?;

    println!("=== Eligibility Check Stats ===");
    println!("Database: {}", db.path().display());
    println!();
    println!("Checks:   {} total", stats.total_checks);
    println!("Eligible: {}", stats.eligible_checks);
    let mut tiers: Vec<_> = stats.tier_counts.iter().collect();
    tiers.sort();
    for (tier, count) in tiers {
        println!("  tier {}   {}", tier, count);
    }

    Ok(())
}

fn cmd_list_checks(db: &EligibilityDb, wallet: Option<String>, eligible_only: bool) -> Result<()> {
    let mut checks = db.list_checks(wallet.as_deref())?;
    if eligible_only {
        checks.retain(|c| c.eligible);
    }

    if checks.is_empty() {
        println!("No checks found.");
        return Ok(());
    }

    println!(
        "{:<23}  {:<44}  {:>8}  {:>8}  {}",
        "TIMESTAMP", "WALLET", "TOTAL TX", "ELIGIBLE", "TIER"
    );
    println!("{}", "-".repeat(96));

    for check in &checks {
        println!(
            "{:<23}  {:<44}  {:>8}  {:>8}  {}",
            format_timestamp(check.timestamp_ms),
            check.wallet,
            check.total_tx,
            check.total_eligible_tx,
            check
                .tier
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".into()),
        );
    }

    println!("\nTotal: {} checks", checks.len());
    Ok(())
}

fn cmd_export(db: &EligibilityDb, format: &str) -> Result<()> {
    if format != "json" {
        anyhow::bail!("Unsupported format '{}'. Only 'json' is supported.", format);
    }

    let checks = db.list_checks(None)?;
    let stats = db.stats()?;

    let export = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "stats": stats,
        "checks": checks,
    });

    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}
