//! Bytecode Heuristics Module
//!
//! Selector-substring classification of raw deployed bytecode. Two modes:
//!
//! - **Basic**: ordered rule table, first match wins, yields one coarse
//!   `probable_type` label. Runs on every contract.
//! - **Enhanced**: collects every selector hit, then applies ordered
//!   classification rules where later rules may override earlier ones and
//!   confidence accumulates (capped at 1.0). Only runs on networks without
//!   registry support, where bytecode is the best evidence available.

use serde::Serialize;

use crate::matcher::{rule_matches, scan, MatchStrategy, PatternRule};

/// EIP-1967 implementation slot hash, keccak256("eip1967.proxy.implementation") - 1
pub const EIP1967_IMPL_SLOT_HEX: &str =
    "360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// Solidity dispatcher prologue, present in virtually all 0.4.x+ contracts
const SOLIDITY_PROLOGUE: &str = "6080604052";

/// Ordered basic-mode rules; first match wins
const BASIC_RULES: [PatternRule; 4] = [
    PatternRule {
        // name() + symbol() + totalSupply()
        patterns: &["06fdde03", "95d89b41", "18160ddd"],
        label: "Likely Token (ERC20/ERC721)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["01ffc9a7"],
        label: "Supports ERC165 Interface Detection",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["e8a3d485"],
        label: "Possible Uniswap-related contract",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &[SOLIDITY_PROLOGUE],
        label: "Solidity 0.4.x+ Contract",
        confidence_delta: 0.0,
    },
];

/// Known function selectors and event topics scanned in enhanced mode
const SELECTOR_RULES: [PatternRule; 13] = [
    PatternRule {
        patterns: &["06fdde03"],
        label: "name()",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["95d89b41"],
        label: "symbol()",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["18160ddd"],
        label: "totalSupply()",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["70a08231"],
        label: "balanceOf(address)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["a9059cbb"],
        label: "transfer(address,uint256)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["23b872dd"],
        label: "transferFrom(address,address,uint256)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["095ea7b3"],
        label: "approve(address,uint256)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925"],
        label: "Approval(address,address,uint256)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
        label: "Transfer(address,address,uint256)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["01ffc9a7"],
        label: "supportsInterface(bytes4)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["6352211e"],
        label: "ownerOf(uint256)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["42842e0e"],
        label: "safeTransferFrom(address,address,uint256)",
        confidence_delta: 0.0,
    },
    PatternRule {
        patterns: &["b88d4fde"],
        label: "safeTransferFrom(address,address,uint256,bytes)",
        confidence_delta: 0.0,
    },
];

/// Uniswap V2 router signature
const DEX_ROUTER_RULE: PatternRule = PatternRule {
    patterns: &["e8a3d485"],
    label: "Likely DEX Router (Uniswap V2)",
    confidence_delta: 0.9,
};

/// Proxy shape: dispatcher prologue plus the EIP-1967 implementation slot hash
const PROXY_SHAPE_RULE: PatternRule = PatternRule {
    patterns: &[SOLIDITY_PROLOGUE, EIP1967_IMPL_SLOT_HEX],
    label: "Likely Proxy Contract",
    confidence_delta: 0.7,
};

/// OpenZeppelin upgradeable panic-handler marker
const UPGRADEABLE_RULE: PatternRule = PatternRule {
    patterns: &["4e487b71"],
    label: "Upgradeable contract pattern",
    confidence_delta: 0.2,
};

/// Enhanced bytecode analysis output
#[derive(Debug, Clone, Default, Serialize)]
pub struct BytecodeReport {
    pub bytecode_length: usize,
    pub patterns_detected: Vec<String>,
    pub likely_contract_type: String,
    /// Heuristic certainty in [0, 1]; not a probability
    pub confidence: f64,
    pub analysis: String,
    pub detected_functions: Vec<String>,
    pub function_count: usize,
}

/// Basic mode: one coarse label, first matching rule wins.
pub fn detect_contract_type(bytecode: &str) -> String {
    if bytecode.is_empty() {
        return "Unknown".to_string();
    }

    scan(bytecode, &BASIC_RULES, MatchStrategy::FirstMatch)
        .first()
        .map(|rule| rule.label.to_string())
        .unwrap_or_else(|| "Unknown Contract Type".to_string())
}

/// Enhanced mode: collect all selector hits, then classify.
///
/// Rule order matters: later rules override the type chosen by earlier ones
/// (a router hit beats a token hit), while the upgradeable marker only adds
/// confidence on top of whatever type stands.
pub fn enhanced_analysis(bytecode: &str) -> BytecodeReport {
    if bytecode.is_empty() {
        return BytecodeReport {
            analysis: "No bytecode available".to_string(),
            likely_contract_type: "Unknown".to_string(),
            ..Default::default()
        };
    }

    let mut report = BytecodeReport {
        bytecode_length: bytecode.len(),
        likely_contract_type: "Unknown".to_string(),
        analysis: "Basic bytecode analysis".to_string(),
        ..Default::default()
    };

    for rule in scan(bytecode, &SELECTOR_RULES, MatchStrategy::AllMatches) {
        report.detected_functions.push(rule.label.to_string());
        report
            .patterns_detected
            .push(format!("Function: {}", rule.label));
    }

    let detected = |name: &str| report.detected_functions.iter().any(|f| f == name);

    // Token-shaped: any metadata/balance selector present
    let token_shaped = ["name()", "symbol()", "totalSupply()", "balanceOf(address)"]
        .iter()
        .any(|f| detected(f));

    if token_shaped {
        if detected("ownerOf(uint256)") {
            report.likely_contract_type = "Likely NFT (ERC721)".to_string();
            report.confidence = 0.8;
        } else if detected("transfer(address,uint256)") {
            report.likely_contract_type = "Likely Token (ERC20)".to_string();
            report.confidence = 0.8;
        } else {
            report.likely_contract_type = "Likely Token Contract".to_string();
            report.confidence = 0.6;
        }
    }

    if rule_matches(bytecode, &DEX_ROUTER_RULE) {
        report.likely_contract_type = DEX_ROUTER_RULE.label.to_string();
        report.confidence = DEX_ROUTER_RULE.confidence_delta;
        report
            .patterns_detected
            .push("Uniswap V2 Router pattern".to_string());
    }

    if rule_matches(bytecode, &PROXY_SHAPE_RULE) {
        report.likely_contract_type = PROXY_SHAPE_RULE.label.to_string();
        report.confidence = PROXY_SHAPE_RULE.confidence_delta;
        report
            .patterns_detected
            .push("Proxy pattern detected".to_string());
    }

    if rule_matches(bytecode, &UPGRADEABLE_RULE) {
        report
            .patterns_detected
            .push(UPGRADEABLE_RULE.label.to_string());
        report.confidence = (report.confidence + UPGRADEABLE_RULE.confidence_delta).min(1.0);
    }

    report.function_count = report.detected_functions.len();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_token_first_match() {
        // All three token selectors plus the ERC165 selector; first rule wins
        let bytecode = "0x6080604052_06fdde03_95d89b41_18160ddd_01ffc9a7";
        assert_eq!(detect_contract_type(bytecode), "Likely Token (ERC20/ERC721)");
    }

    #[test]
    fn test_basic_requires_all_token_selectors() {
        // Only two of three token selectors; falls through to ERC165
        let bytecode = "0x06fdde03_95d89b41_01ffc9a7";
        assert_eq!(
            detect_contract_type(bytecode),
            "Supports ERC165 Interface Detection"
        );
    }

    #[test]
    fn test_basic_fallthrough_to_prologue() {
        assert_eq!(detect_contract_type("0x6080604052deadbeef"), "Solidity 0.4.x+ Contract");
        assert_eq!(detect_contract_type("0xdeadbeef"), "Unknown Contract Type");
        assert_eq!(detect_contract_type(""), "Unknown");
    }

    #[test]
    fn test_enhanced_detects_only_present_selectors() {
        let bytecode = "0x06fdde03a9059cbb";
        let report = enhanced_analysis(bytecode);
        assert!(report
            .detected_functions
            .iter()
            .any(|f| f == "name()"));
        assert!(report
            .detected_functions
            .iter()
            .any(|f| f == "transfer(address,uint256)"));
        assert_eq!(report.function_count, 2);
        // Every listed selector is literally present in the input
        assert!(!report
            .detected_functions
            .iter()
            .any(|f| f == "symbol()"));
    }

    #[test]
    fn test_enhanced_erc20_classification() {
        let bytecode = "0x06fdde03_95d89b41_18160ddd_70a08231_a9059cbb";
        let report = enhanced_analysis(bytecode);
        assert_eq!(report.likely_contract_type, "Likely Token (ERC20)");
        assert_eq!(report.confidence, 0.8);
    }

    #[test]
    fn test_enhanced_nft_beats_erc20() {
        // ownerOf takes precedence over transfer
        let bytecode = "0x06fdde03_a9059cbb_6352211e";
        let report = enhanced_analysis(bytecode);
        assert_eq!(report.likely_contract_type, "Likely NFT (ERC721)");
    }

    #[test]
    fn test_enhanced_router_overrides_token() {
        let bytecode = "0x06fdde03_a9059cbb_e8a3d485";
        let report = enhanced_analysis(bytecode);
        assert_eq!(report.likely_contract_type, "Likely DEX Router (Uniswap V2)");
        assert_eq!(report.confidence, 0.9);
    }

    #[test]
    fn test_enhanced_upgradeable_accumulates_and_caps() {
        let bytecode = "0x06fdde03_a9059cbb_e8a3d485_4e487b71";
        let report = enhanced_analysis(bytecode);
        // 0.9 router + 0.2 upgradeable, capped
        assert_eq!(report.confidence, 1.0);
        assert!(report
            .patterns_detected
            .iter()
            .any(|p| p == "Upgradeable contract pattern"));
    }

    #[test]
    fn test_enhanced_confidence_in_unit_interval() {
        for bytecode in ["", "0x", "0x6080604052", "0x4e487b71", "0xe8a3d4854e487b71"] {
            let report = enhanced_analysis(bytecode);
            assert!((0.0..=1.0).contains(&report.confidence));
        }
    }

    #[test]
    fn test_enhanced_proxy_shape() {
        let bytecode = format!("0x6080604052{}", EIP1967_IMPL_SLOT_HEX);
        let report = enhanced_analysis(&bytecode);
        assert_eq!(report.likely_contract_type, "Likely Proxy Contract");
        assert!(report
            .patterns_detected
            .iter()
            .any(|p| p == "Proxy pattern detected"));
    }

    #[test]
    fn test_enhanced_empty_bytecode() {
        let report = enhanced_analysis("");
        assert_eq!(report.analysis, "No bytecode available");
        assert_eq!(report.confidence, 0.0);
    }
}
