//! Proxy Resolver Module
//!
//! Detects delegation/upgrade patterns from bytecode markers, then recovers
//! the implementation address from the well-known storage slots.
//!
//! Marker scanning is first-match: once one proxy family is identified,
//! scanning stops. This differs from enhanced bytecode analysis (all-match)
//! on purpose; the two strategies live side by side on the shared matcher.

use alloy_primitives::{Address, B256, U256};
use serde::Serialize;
use tracing::debug;

use crate::gateway::ChainGateway;
use crate::matcher::{scan, MatchStrategy, PatternRule};

/// Fixed confidence attached to any marker hit
const MARKER_CONFIDENCE: f64 = 0.8;

/// Ordered proxy marker table, first match wins.
/// The EIP-1967 implementation-slot hash leads: it is the strongest and most
/// specific signal, so it must not be shadowed by broader markers below it.
const PROXY_MARKERS: [PatternRule; 6] = [
    PatternRule {
        // keccak256("eip1967.proxy.implementation") - 1
        patterns: &["360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc"],
        label: "EIP-1967 Proxy",
        confidence_delta: MARKER_CONFIDENCE,
    },
    PatternRule {
        // keccak256("eip1967.proxy.admin") - 1
        patterns: &["b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103"],
        label: "OpenZeppelin Transparent Proxy",
        confidence_delta: MARKER_CONFIDENCE,
    },
    PatternRule {
        // implementation() selector
        patterns: &["5c60da1b"],
        label: "EIP-1967 Proxy",
        confidence_delta: MARKER_CONFIDENCE,
    },
    PatternRule {
        // admin() selector
        patterns: &["f851a440"],
        label: "EIP-1822 Universal Proxy",
        confidence_delta: MARKER_CONFIDENCE,
    },
    PatternRule {
        patterns: &["4e487b71"],
        label: "OpenZeppelin Upgradeable",
        confidence_delta: MARKER_CONFIDENCE,
    },
    PatternRule {
        patterns: &["a3f0ad74e8653cd"],
        label: "Beacon Proxy",
        confidence_delta: MARKER_CONFIDENCE,
    },
];

/// Storage slots checked for the implementation address, in order.
/// The first slot whose stored word is non-zero wins.
const IMPLEMENTATION_SLOTS: [&str; 2] = [
    // EIP-1967 implementation slot
    "360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc",
    // Alternative slot used by some older upgradeable deployments
    "7050c9e0f4ca769c69bd3a8ef740bc37934f8e2c036e5a4fd6e3cd362f230da",
];

/// Proxy detection and resolution output
#[derive(Debug, Clone, Serialize)]
pub struct ProxyAnalysis {
    pub is_proxy: bool,
    pub proxy_type: String,
    pub implementation_address: Option<String>,
    pub admin_address: Option<String>,
    pub patterns_detected: Vec<String>,
    /// Heuristic certainty in [0, 1]; not a probability
    pub confidence: f64,
}

impl Default for ProxyAnalysis {
    fn default() -> Self {
        Self {
            is_proxy: false,
            proxy_type: "Unknown".to_string(),
            implementation_address: None,
            admin_address: None,
            patterns_detected: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Scan bytecode for proxy markers. Pure; no chain access.
pub fn detect_proxy_markers(bytecode: &str) -> ProxyAnalysis {
    let mut analysis = ProxyAnalysis::default();
    if bytecode.is_empty() {
        return analysis;
    }

    if let Some(rule) = scan(bytecode, &PROXY_MARKERS, MatchStrategy::FirstMatch).first() {
        analysis.is_proxy = true;
        analysis.proxy_type = rule.label.to_string();
        analysis
            .patterns_detected
            .push(format!("Proxy pattern: {}", rule.label));
        analysis.confidence = rule.confidence_delta;
    }

    analysis
}

/// Detect proxy markers and, if any fired, resolve the implementation
/// address from the known storage slots. Slot reads that fail are skipped,
/// not retried; no marker hit means no reads at all.
pub async fn analyze_proxy(
    gateway: &ChainGateway,
    address: &Address,
    bytecode: &str,
) -> ProxyAnalysis {
    let mut analysis = detect_proxy_markers(bytecode);
    if !analysis.is_proxy {
        return analysis;
    }

    for slot_hex in IMPLEMENTATION_SLOTS {
        let slot = match U256::from_str_radix(slot_hex, 16) {
            Ok(slot) => slot,
            Err(_) => continue,
        };

        match gateway.get_storage_at(address, slot).await {
            Ok(word) if word != U256::ZERO => {
                // Implementation address is the low 20 bytes of the word
                let implementation = Address::from_word(B256::from(word));
                analysis.implementation_address = Some(implementation.to_checksum(None));
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!("Implementation slot read failed: {}", e);
            }
        }
    }

    analysis
}
