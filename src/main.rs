//! Contract Sentry - Multi-chain smart contract audit engine
//!
//! Usage:
//!   contract_sentry <address> [network] [format]
//!
//! network defaults to mainnet; format is one of raw|audit|quick|deep.

use contract_sentry::{AuditOutput, ContractAuditor, OutputFormat};

use eyre::{eyre, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    println!("🛡️  Contract Sentry v0.1.0 - Multi-chain Contract Audit Engine\n");

    if std::env::var("ETHERSCAN_API_KEY").is_err() {
        eprintln!("⚠️  WARNING: ETHERSCAN_API_KEY not set!");
        eprintln!("   Verification lookups will be rejected by the registry.");
        eprintln!();
    }

    let mut args = std::env::args().skip(1);
    let address = args
        .next()
        .ok_or_else(|| eyre!("Usage: contract_sentry <address> [network] [format]"))?;
    let network = args.next();
    let format = match args.next() {
        Some(raw) => OutputFormat::from_str(&raw).map_err(|e| eyre!(e))?,
        None => OutputFormat::Raw,
    };

    let auditor = ContractAuditor::with_default_config()?;
    let output = auditor.audit(&address, network.as_deref(), format).await;

    match &output {
        AuditOutput::Raw(result) => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        AuditOutput::Prompt(projection) => {
            println!("{}", serde_json::to_string_pretty(projection)?);
        }
    }

    Ok(())
}
