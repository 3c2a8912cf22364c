//! Audit Orchestrator Module
//!
//! Sequences the full analysis pipeline for one address on one network:
//! validation, registry lookups, bytecode heuristics, proxy resolution and
//! live-state probing, merged into a single result record.
//!
//! Stage order is load-bearing: registry before bytecode, proxy before
//! deployed state. The order decides which identity field wins under the
//! deployed-name-overwrites-static-name invariant.
//!
//! Failure policy: field-level failures are absorbed (field omitted),
//! stage-level failures are recorded on that stage's sub-record, and
//! anything that escapes the pipeline collapses into a record carrying only
//! `{error, address, network}`.

use alloy_primitives::Address;
use std::str::FromStr;
use tracing::{info, warn};

use crate::bytecode::{detect_contract_type, enhanced_analysis};
use crate::config::AuditorConfig;
use crate::errors::{AppError, AppResult};
use crate::gateway::ChainGateway;
use crate::probe::{analyze_deployed_state, best_effort, DeployedState};
use crate::prompts;
use crate::proxy::analyze_proxy;
use crate::registry::RegistryClient;
use crate::security::analyze_source;
use crate::standards::{detect_standards, extract_event_signatures, extract_function_signatures};
use crate::types::{AuditOutput, ContractAuditResult, OutputFormat, PromptOutput};

/// Multi-chain contract auditor. Owns the immutable configuration and the
/// registry client; a fresh gateway and result record are built per audit,
/// so concurrent audits never share mutable state.
pub struct ContractAuditor {
    config: AuditorConfig,
    registry: RegistryClient,
}

impl ContractAuditor {
    /// Build an auditor from configuration
    pub fn new(config: AuditorConfig) -> AppResult<Self> {
        let registry = RegistryClient::new(
            &config.etherscan_url,
            &config.etherscan_api_key,
            config.registry_timeout,
        )?;
        Ok(Self { config, registry })
    }

    /// Build an auditor with the default network tables
    pub fn with_default_config() -> AppResult<Self> {
        Self::new(AuditorConfig::default())
    }

    /// Audit one contract address. `network` defaults to the configured
    /// default network; `format` selects the raw record or a prompt-wrapped
    /// projection of it.
    ///
    /// Always returns a well-formed record: a terminal failure anywhere in
    /// the pipeline yields the same shape with only `error` populated.
    pub async fn audit(
        &self,
        address: &str,
        network: Option<&str>,
        format: OutputFormat,
    ) -> AuditOutput {
        let network = network
            .unwrap_or(&self.config.default_network)
            .to_string();

        info!("🔍 Auditing {} on {}", address, network);

        match self.run_pipeline(address, &network).await {
            Ok(result) => self.project(result, format),
            Err(e) => {
                warn!("❌ Audit failed [{}]: {}", e.code_str(), e);
                AuditOutput::Raw(ContractAuditResult::failure(address, network, e))
            }
        }
    }

    /// Validation gates, then the analysis itself
    async fn run_pipeline(&self, address: &str, network: &str) -> AppResult<ContractAuditResult> {
        let rpc_url = self
            .config
            .rpc_url(network)
            .ok_or_else(|| AppError::invalid_network(network, &self.config.supported_networks()))?;

        let gateway = ChainGateway::new(rpc_url, network, self.config.rpc_timeout)?;
        if !gateway.is_connected().await {
            return Err(AppError::connection_failed(network));
        }

        let parsed = Address::from_str(address).map_err(|_| AppError::invalid_address())?;
        let checksummed = parsed.to_checksum(None);

        Ok(self.analyze_contract(&gateway, &parsed, &checksummed, network).await)
    }

    /// The analysis pipeline proper. Nothing in here returns an error:
    /// every stage degrades into the record it is building.
    async fn analyze_contract(
        &self,
        gateway: &ChainGateway,
        address: &Address,
        checksummed: &str,
        network: &str,
    ) -> ContractAuditResult {
        let mut result = ContractAuditResult::new(checksummed, network);

        let code = best_effort(gateway.get_code(address)).await;
        result.is_contract = code.as_deref().map(has_code).unwrap_or(false);

        // Account address: balance and nonce enrichment only, both absorbed
        if !result.is_contract {
            result.error = Some("Address is not a contract".to_string());
            result.native_balance = best_effort(async {
                let wei = gateway.get_balance(address).await?;
                Ok(alloy_primitives::utils::format_ether(wei))
            })
            .await;
            result.transaction_count = best_effort(gateway.get_transaction_count(address)).await;
            return result;
        }

        result.contract_code = code;

        let registry_supported = self.config.is_registry_supported(network);
        if registry_supported {
            // Eligibility implies a configured chain ID
            let chain_id = self.config.chain_id(network).unwrap_or_default();

            if let Some(creation) = self.registry.get_creation_info(checksummed, chain_id).await {
                result.contract_creator = creation.contract_creator;
                result.creation_tx = creation.tx_hash;
            }

            let verification = self.registry.get_verification(checksummed, chain_id).await;
            result.is_verified = verification.is_verified;

            if verification.is_verified {
                result.contract_name = verification.contract_name.clone();
                result.source_contract_name = verification.contract_name;
                result.source_code = verification.source_code;
                result.abi = verification.abi;

                if let Some(abi) = &result.abi {
                    result.standards = detect_standards(abi);
                    result.function_signatures = extract_function_signatures(abi);
                    result.event_signatures = extract_event_signatures(abi);
                }
                if let Some(source) = &result.source_code {
                    result.security_analysis = analyze_source(source);
                }
            } else {
                // Terminal note; bytecode-level analysis still runs below
                result.error = Some(format!(
                    "Contract is not verified on Etherscan for {}",
                    network
                ));
            }
        } else {
            result
                .analysis_limitations
                .push(format!("Etherscan API not supported for {}", network));
            result.error = Some(format!(
                "Limited analysis available for {} - Etherscan not supported",
                network
            ));
        }

        // Bytecode analysis runs regardless of registry support
        if let Some(bytecode) = result.contract_code.clone() {
            result.probable_type = Some(detect_contract_type(&bytecode));

            let proxy_analysis = analyze_proxy(gateway, address, &bytecode).await;
            let is_proxy = proxy_analysis.is_proxy;

            if is_proxy {
                info!("🧭 Proxy detected: {}", proxy_analysis.proxy_type);
                result.proxy_analysis = Some(proxy_analysis);
                let state = analyze_deployed_state(gateway, address).await;
                apply_deployed_identity(&mut result, &state);
                result.deployed_state = Some(state);
            }

            // Bytecode is the best evidence on registry-less networks
            if !registry_supported {
                result.bytecode_analysis = Some(enhanced_analysis(&bytecode));
            }

            // Token contracts reveal live state even without being proxies
            if !is_proxy {
                let state = analyze_deployed_state(gateway, address).await;
                apply_deployed_identity(&mut result, &state);
                result.deployed_state = Some(state);
            }
        }

        result
    }

    /// Project the record per the requested format. Formatting is a pure
    /// substitution and never discards the computed analysis.
    fn project(&self, result: ContractAuditResult, format: OutputFormat) -> AuditOutput {
        match prompts::render(format, &result) {
            None => AuditOutput::Raw(result),
            Some(prompt) => AuditOutput::Prompt(PromptOutput {
                prompt,
                format_type: format.as_str().to_string(),
                address: result.address.clone(),
                network: result.network.clone(),
                context: result,
            }),
        }
    }
}

/// Deployed bytecode means a real contract: non-empty and not the single
/// zero byte some RPCs return for empty accounts.
fn has_code(code: &str) -> bool {
    let digits = code.trim_start_matches("0x");
    !digits.is_empty() && digits != "00"
}

/// Deployed identity always takes precedence over static identity: the
/// registry's name may describe an implementation template rather than the
/// live instance.
fn apply_deployed_identity(result: &mut ContractAuditResult, state: &DeployedState) {
    if let Some(name) = state.token_info.name.as_ref().filter(|n| !n.is_empty()) {
        result.contract_name = Some(name.clone());
        result.deployed_contract_name = Some(name.clone());
        result.deployed_symbol = state.token_info.symbol.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::DeployedState;

    #[test]
    fn test_has_code() {
        assert!(has_code("0x6080604052"));
        assert!(!has_code("0x"));
        assert!(!has_code("0x00"));
        assert!(!has_code(""));
    }

    #[test]
    fn test_deployed_name_overwrites_registry_name() {
        let mut result = ContractAuditResult::new("0xabc", "mainnet");
        result.contract_name = Some("TransparentUpgradeableProxy".to_string());
        result.source_contract_name = Some("TransparentUpgradeableProxy".to_string());

        let mut state = DeployedState::default();
        state.token_info.name = Some("Wrapped Ether".to_string());
        state.token_info.symbol = Some("WETH".to_string());

        apply_deployed_identity(&mut result, &state);

        assert_eq!(result.contract_name.as_deref(), Some("Wrapped Ether"));
        assert_eq!(result.deployed_symbol.as_deref(), Some("WETH"));
        // Registry name survives in its own field
        assert_eq!(
            result.source_contract_name.as_deref(),
            Some("TransparentUpgradeableProxy")
        );
    }

    #[test]
    fn test_empty_deployed_name_keeps_registry_name() {
        let mut result = ContractAuditResult::new("0xabc", "mainnet");
        result.contract_name = Some("Registry".to_string());

        let mut state = DeployedState::default();
        state.token_info.name = Some(String::new());

        apply_deployed_identity(&mut result, &state);
        assert_eq!(result.contract_name.as_deref(), Some("Registry"));
        assert!(result.deployed_contract_name.is_none());
    }

    #[test]
    fn test_absent_deployed_state_keeps_registry_name() {
        let mut result = ContractAuditResult::new("0xabc", "mainnet");
        result.contract_name = Some("Registry".to_string());

        apply_deployed_identity(&mut result, &DeployedState::default());
        assert_eq!(result.contract_name.as_deref(), Some("Registry"));
    }
}
