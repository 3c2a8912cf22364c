//! Configuration module for Contract Sentry
//! Immutable per-network tables: RPC endpoints, chain identifiers and
//! registry capability. Built once at startup and injected everywhere.

use std::collections::HashMap;
use std::time::Duration;

/// Etherscan V2 multichain endpoint
const ETHERSCAN_V2_URL: &str = "https://api.etherscan.io/v2/api";

/// Timeout for registry HTTP calls
const REGISTRY_TIMEOUT_SECS: u64 = 10;

/// Timeout for chain RPC calls
const RPC_TIMEOUT_SECS: u64 = 10;

/// Networks that carry a chain identifier for ecosystem compatibility but
/// have no real Etherscan-family registry behind it.
const REGISTRY_EXCLUDED: [&str; 2] = ["solana", "plasma"];

/// Immutable configuration for the auditor
#[derive(Debug, Clone)]
pub struct AuditorConfig {
    /// Per-network RPC endpoint table
    pub rpc_urls: HashMap<String, String>,
    /// Per-network chain identifier table
    pub chain_ids: HashMap<String, u64>,
    /// Etherscan V2 API base URL
    pub etherscan_url: String,
    /// Etherscan API key (from ETHERSCAN_API_KEY)
    pub etherscan_api_key: String,
    /// Default network when the caller does not specify one
    pub default_network: String,
    /// Timeout applied to registry HTTP calls
    pub registry_timeout: Duration,
    /// Timeout applied to chain RPC calls
    pub rpc_timeout: Duration,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        let alchemy_key =
            std::env::var("ALCHEMY_API_KEY").unwrap_or_else(|_| "YOUR_API_KEY".to_string());

        let alchemy =
            |subdomain: &str| format!("https://{}.g.alchemy.com/v2/{}", subdomain, alchemy_key);

        let rpc_urls = HashMap::from([
            ("mainnet".to_string(), alchemy("eth-mainnet")),
            ("sepolia".to_string(), alchemy("eth-sepolia")),
            ("polygon".to_string(), alchemy("polygon-mainnet")),
            ("arbitrum".to_string(), alchemy("arb-mainnet")),
            ("optimism".to_string(), alchemy("opt-mainnet")),
            (
                "bsc".to_string(),
                "https://bsc-dataseed.binance.org".to_string(),
            ),
            (
                "avalanche".to_string(),
                "https://api.avax.network/ext/bc/C/rpc".to_string(),
            ),
            ("base".to_string(), alchemy("base-mainnet")),
            ("scroll".to_string(), alchemy("scroll-mainnet")),
            ("blast".to_string(), alchemy("blast-mainnet")),
            ("hyperliquid".to_string(), alchemy("hyperliquid-mainnet")),
            ("solana".to_string(), alchemy("solana-mainnet")),
            ("plasma".to_string(), alchemy("plasma-mainnet")),
        ]);

        let chain_ids = HashMap::from([
            ("mainnet".to_string(), 1),
            ("sepolia".to_string(), 11155111),
            ("polygon".to_string(), 137),
            ("arbitrum".to_string(), 42161),
            ("optimism".to_string(), 10),
            ("bsc".to_string(), 56),
            ("avalanche".to_string(), 43114),
            ("base".to_string(), 8453),
            ("scroll".to_string(), 534352),
            ("blast".to_string(), 81457),
            // Hyperliquid uses an Arbitrum-compatible chain ID
            ("hyperliquid".to_string(), 999),
            ("solana".to_string(), 101),
            ("plasma".to_string(), 9745),
        ]);

        Self {
            rpc_urls,
            chain_ids,
            etherscan_url: ETHERSCAN_V2_URL.to_string(),
            etherscan_api_key: std::env::var("ETHERSCAN_API_KEY").unwrap_or_default(),
            default_network: "mainnet".to_string(),
            registry_timeout: Duration::from_secs(REGISTRY_TIMEOUT_SECS),
            rpc_timeout: Duration::from_secs(RPC_TIMEOUT_SECS),
        }
    }
}

impl AuditorConfig {
    /// RPC endpoint for a network, if configured
    pub fn rpc_url(&self, network: &str) -> Option<&str> {
        self.rpc_urls.get(network).map(|s| s.as_str())
    }

    /// Chain identifier for a network, if configured
    pub fn chain_id(&self, network: &str) -> Option<u64> {
        self.chain_ids.get(network).copied()
    }

    /// Sorted list of configured network names (for error messages)
    pub fn supported_networks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rpc_urls.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// A network is fully analyzable only if it has a chain identifier AND
    /// is not one of the identifier-only chains without real registry support.
    pub fn is_registry_supported(&self, network: &str) -> bool {
        self.chain_id(network).is_some() && !REGISTRY_EXCLUDED.contains(&network)
    }
}
