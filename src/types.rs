//! Type definitions for Contract Sentry
//! The audit result record and all of its sub-records

use serde::{Deserialize, Serialize};

use crate::bytecode::BytecodeReport;
use crate::probe::DeployedState;
use crate::proxy::ProxyAnalysis;
use crate::security::SecurityReport;
use crate::standards::{AbiEntry, EventSignature, FunctionSignature, Standards};

/// Requested output shape for an audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raw data only
    Raw,
    /// Security audit prompt
    Audit,
    /// Quick analysis prompt
    Quick,
    /// Deep dive prompt
    Deep,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Audit => "audit",
            OutputFormat::Quick => "quick",
            OutputFormat::Deep => "deep",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(OutputFormat::Raw),
            "audit" => Ok(OutputFormat::Audit),
            "quick" => Ok(OutputFormat::Quick),
            "deep" => Ok(OutputFormat::Deep),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

/// The single output entity of an audit, assembled incrementally by the
/// orchestrator. One fresh record per invocation; never shared.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContractAuditResult {
    pub address: String,
    pub network: String,
    pub is_contract: bool,
    pub is_verified: bool,
    /// Final display name. Live token state overwrites the registry name when
    /// both exist: the static name may describe an implementation template
    /// rather than the live instance.
    pub contract_name: Option<String>,
    /// Registry-recorded name, kept even after a deployed-name overwrite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_contract_name: Option<String>,
    pub contract_creator: Option<String>,
    pub creation_tx: Option<String>,
    /// Hex bytecode echo (as returned by the gateway)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_code: Option<String>,
    pub source_code: Option<String>,
    pub abi: Option<Vec<AbiEntry>>,
    pub standards: Standards,
    pub security_analysis: SecurityReport,
    pub function_signatures: Vec<FunctionSignature>,
    pub event_signatures: Vec<EventSignature>,
    /// Coarse label from basic bytecode analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probable_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_analysis: Option<ProxyAnalysis>,
    /// Live storage view; may legitimately diverge from `source_code`-derived
    /// data for upgradeable contracts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_state: Option<DeployedState>,
    /// Enhanced (confidence-scored) bytecode analysis, only populated for
    /// networks without registry support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytecode_analysis: Option<BytecodeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_contract_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_symbol: Option<String>,
    /// Native balance as an ether-denominated string (account addresses only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u64>,
    /// Reasons full analysis was unavailable
    pub analysis_limitations: Vec<String>,
    pub error: Option<String>,
}

impl ContractAuditResult {
    /// Fresh record echoing the validated inputs
    pub fn new(address: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            network: network.into(),
            ..Default::default()
        }
    }

    /// Terminal-failure record: same shape as a success, only `error` set.
    /// Partial work computed before the failure is deliberately discarded.
    pub fn failure(
        address: impl Into<String>,
        network: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self {
            address: address.into(),
            network: network.into(),
            error: Some(format!("Error analyzing contract: {}", message)),
            ..Default::default()
        }
    }
}

/// Prompt-wrapped projection of an audit result
#[derive(Debug, Clone, Serialize)]
pub struct PromptOutput {
    pub prompt: String,
    pub context: ContractAuditResult,
    pub format_type: String,
    pub address: String,
    pub network: String,
}

/// What `audit` hands back: the raw record or a prompt projection of it
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AuditOutput {
    Raw(ContractAuditResult),
    Prompt(PromptOutput),
}

impl AuditOutput {
    /// The underlying result record, whichever shape was returned
    pub fn context(&self) -> &ContractAuditResult {
        match self {
            AuditOutput::Raw(result) => result,
            AuditOutput::Prompt(output) => &output.context,
        }
    }
}
