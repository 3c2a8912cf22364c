//! Standards Detection Module
//!
//! Classifies a verified ABI against the known interface shapes (ERC20,
//! ERC721, ERC1155) and extracts human-readable function/event signature
//! lists.
//!
//! Matching is name-only: argument types are not checked. That trades some
//! precision for recall - a contract that renames nothing but changes types
//! still flags, which is the behavior we want for a heuristic profile.

use serde::{Deserialize, Serialize};

/// Required function names per standard. A contract satisfies a standard iff
/// every name appears among the ABI's function entries. Flags are computed
/// independently; overlapping ABIs may set several flags true.
const ERC20_FUNCTIONS: [&str; 6] = [
    "totalSupply",
    "balanceOf",
    "transfer",
    "transferFrom",
    "approve",
    "allowance",
];

const ERC721_FUNCTIONS: [&str; 8] = [
    "balanceOf",
    "ownerOf",
    "safeTransferFrom",
    "transferFrom",
    "approve",
    "getApproved",
    "setApprovalForAll",
    "isApprovedForAll",
];

const ERC1155_FUNCTIONS: [&str; 6] = [
    "balanceOf",
    "balanceOfBatch",
    "setApprovalForAll",
    "isApprovedForAll",
    "safeTransferFrom",
    "safeBatchTransferFrom",
];

/// One parameter of an ABI function/event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: String,
}

/// One entry of a contract ABI (function, event, constructor, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub entry_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability", default)]
    pub state_mutability: Option<String>,
}

/// Independent standard-compliance flags
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Standards {
    pub is_erc20: bool,
    pub is_erc721: bool,
    pub is_erc1155: bool,
}

/// Human-readable function descriptor extracted from an ABI
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub signature: String,
    pub state_mutability: String,
}

/// Human-readable event descriptor extracted from an ABI
#[derive(Debug, Clone, Serialize)]
pub struct EventSignature {
    pub name: String,
    pub signature: String,
}

/// Detect standard compliance from a verified ABI.
/// No ABI or an empty ABI yields all-false flags.
pub fn detect_standards(abi: &[AbiEntry]) -> Standards {
    let function_names: Vec<&str> = abi
        .iter()
        .filter(|entry| entry.entry_type == "function")
        .filter_map(|entry| entry.name.as_deref())
        .collect();

    let has_all = |required: &[&str]| required.iter().all(|f| function_names.contains(f));

    Standards {
        is_erc20: has_all(&ERC20_FUNCTIONS),
        is_erc721: has_all(&ERC721_FUNCTIONS),
        is_erc1155: has_all(&ERC1155_FUNCTIONS),
    }
}

/// Extract function signatures ("name(type,..) returns (type,..)")
pub fn extract_function_signatures(abi: &[AbiEntry]) -> Vec<FunctionSignature> {
    abi.iter()
        .filter(|entry| entry.entry_type == "function")
        .map(|entry| {
            let name = entry.name.clone().unwrap_or_default();
            let inputs: Vec<&str> = entry.inputs.iter().map(|p| p.param_type.as_str()).collect();
            let outputs: Vec<&str> = entry.outputs.iter().map(|p| p.param_type.as_str()).collect();

            let mut signature = format!("{}({})", name, inputs.join(","));
            if !outputs.is_empty() {
                signature.push_str(&format!(" returns ({})", outputs.join(",")));
            }

            FunctionSignature {
                name,
                signature,
                state_mutability: entry.state_mutability.clone().unwrap_or_default(),
            }
        })
        .collect()
}

/// Extract event signatures ("name(type,..)")
pub fn extract_event_signatures(abi: &[AbiEntry]) -> Vec<EventSignature> {
    abi.iter()
        .filter(|entry| entry.entry_type == "event")
        .map(|entry| {
            let name = entry.name.clone().unwrap_or_default();
            let inputs: Vec<&str> = entry.inputs.iter().map(|p| p.param_type.as_str()).collect();
            EventSignature {
                signature: format!("{}({})", name, inputs.join(",")),
                name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> AbiEntry {
        AbiEntry {
            entry_type: "function".to_string(),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn erc20_abi() -> Vec<AbiEntry> {
        ERC20_FUNCTIONS.iter().map(|f| function(f)).collect()
    }

    #[test]
    fn test_erc20_detection() {
        let standards = detect_standards(&erc20_abi());
        assert!(standards.is_erc20);
        assert!(!standards.is_erc721);
        assert!(!standards.is_erc1155);
    }

    #[test]
    fn test_missing_one_function_fails() {
        let mut abi = erc20_abi();
        abi.pop(); // drop allowance
        assert!(!detect_standards(&abi).is_erc20);
    }

    #[test]
    fn test_empty_abi_all_false() {
        let standards = detect_standards(&[]);
        assert!(!standards.is_erc20 && !standards.is_erc721 && !standards.is_erc1155);
    }

    #[test]
    fn test_overlapping_standards_independent() {
        // Union of ERC20 and ERC721 name sets satisfies both
        let mut abi = erc20_abi();
        for f in ERC721_FUNCTIONS {
            abi.push(function(f));
        }
        let standards = detect_standards(&abi);
        assert!(standards.is_erc20, "independent flags: ERC20 still set");
        assert!(standards.is_erc721, "independent flags: ERC721 also set");
    }

    #[test]
    fn test_events_do_not_count_as_functions() {
        let mut abi = erc20_abi();
        abi.pop();
        abi.push(AbiEntry {
            entry_type: "event".to_string(),
            name: Some("allowance".to_string()),
            ..Default::default()
        });
        assert!(!detect_standards(&abi).is_erc20);
    }

    #[test]
    fn test_signature_extraction() {
        let abi = vec![
            AbiEntry {
                entry_type: "function".to_string(),
                name: Some("transfer".to_string()),
                inputs: vec![
                    AbiParam {
                        name: "to".to_string(),
                        param_type: "address".to_string(),
                    },
                    AbiParam {
                        name: "amount".to_string(),
                        param_type: "uint256".to_string(),
                    },
                ],
                outputs: vec![AbiParam {
                    name: String::new(),
                    param_type: "bool".to_string(),
                }],
                state_mutability: Some("nonpayable".to_string()),
            },
            AbiEntry {
                entry_type: "event".to_string(),
                name: Some("Transfer".to_string()),
                inputs: vec![
                    AbiParam {
                        name: "from".to_string(),
                        param_type: "address".to_string(),
                    },
                    AbiParam {
                        name: "to".to_string(),
                        param_type: "address".to_string(),
                    },
                    AbiParam {
                        name: "value".to_string(),
                        param_type: "uint256".to_string(),
                    },
                ],
                ..Default::default()
            },
        ];

        let functions = extract_function_signatures(&abi);
        assert_eq!(functions.len(), 1);
        assert_eq!(
            functions[0].signature,
            "transfer(address,uint256) returns (bool)"
        );

        let events = extract_event_signatures(&abi);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].signature, "Transfer(address,address,uint256)");
    }

    #[test]
    fn test_abi_parses_from_etherscan_json() {
        let raw = r#"[
            {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
            {"type":"constructor","inputs":[]}
        ]"#;
        let abi: Vec<AbiEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(abi.len(), 2);
        assert_eq!(abi[0].name.as_deref(), Some("balanceOf"));
        assert!(abi[1].name.is_none());
    }
}
