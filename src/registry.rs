//! Registry Client - Etherscan V2 Multichain API
//!
//! Creation metadata and verification/source lookups for every network that
//! has a real registry behind its chain ID. The V2 endpoint routes by
//! `chainid`, so one base URL covers all supported chains.
//!
//! API: https://api.etherscan.io/v2/api

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::standards::AbiEntry;

/// Etherscan response envelope: `status` is "1" on success, result is
/// action-specific.
#[derive(Debug, Deserialize)]
struct EtherscanResponse<T> {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

/// One row of `getcontractcreation`
#[derive(Debug, Deserialize)]
struct CreationRow {
    #[serde(rename = "contractCreator")]
    contract_creator: Option<String>,
    #[serde(rename = "txHash")]
    tx_hash: Option<String>,
}

/// One row of `getsourcecode`
#[derive(Debug, Deserialize)]
struct SourceRow {
    #[serde(rename = "ContractName", default)]
    contract_name: Option<String>,
    #[serde(rename = "SourceCode", default)]
    source_code: Option<String>,
    #[serde(rename = "ABI", default)]
    abi: Option<String>,
}

/// Contract creation metadata
#[derive(Debug, Clone)]
pub struct CreationInfo {
    pub contract_creator: Option<String>,
    pub tx_hash: Option<String>,
}

/// Verification status plus source/ABI when published
#[derive(Debug, Clone, Default)]
pub struct VerificationInfo {
    pub is_verified: bool,
    pub contract_name: Option<String>,
    pub source_code: Option<String>,
    pub abi: Option<Vec<AbiEntry>>,
}

/// Etherscan V2 API client
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RegistryClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Contract creation info, or None when the registry has no record.
    /// Registry hiccups degrade to None with a warning - creation metadata
    /// is enrichment, not a gate.
    pub async fn get_creation_info(&self, address: &str, chain_id: u64) -> Option<CreationInfo> {
        match self.fetch_creation(address, chain_id).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Registry creation lookup failed for chain {}: {}", chain_id, e);
                None
            }
        }
    }

    async fn fetch_creation(&self, address: &str, chain_id: u64) -> AppResult<Option<CreationInfo>> {
        let url = format!(
            "{}?chainid={}&module=contract&action=getcontractcreation&contractaddresses={}&apikey={}",
            self.base_url, chain_id, address, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::registry_error(format!(
                "Registry HTTP error: {}",
                response.status()
            )));
        }

        let data: EtherscanResponse<Vec<CreationRow>> = response.json().await?;
        if data.status.as_deref() != Some("1") {
            return Ok(None);
        }

        let row = match data.result.and_then(|rows| rows.into_iter().next()) {
            Some(row) => row,
            None => return Ok(None),
        };

        Ok(Some(CreationInfo {
            contract_creator: row.contract_creator,
            tx_hash: row.tx_hash,
        }))
    }

    /// Verification status. Registry hiccups degrade to "not verified" with
    /// a warning rather than aborting the pipeline.
    pub async fn get_verification(&self, address: &str, chain_id: u64) -> VerificationInfo {
        match self.fetch_verification(address, chain_id).await {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    "Registry verification lookup failed for chain {}: {}",
                    chain_id, e
                );
                VerificationInfo::default()
            }
        }
    }

    async fn fetch_verification(&self, address: &str, chain_id: u64) -> AppResult<VerificationInfo> {
        let url = format!(
            "{}?chainid={}&module=contract&action=getsourcecode&address={}&apikey={}",
            self.base_url, chain_id, address, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::registry_error(format!(
                "Registry HTTP error: {}",
                response.status()
            )));
        }

        let data: EtherscanResponse<Vec<SourceRow>> = response.json().await?;
        if data.status.as_deref() != Some("1") {
            return Ok(VerificationInfo::default());
        }

        let row = match data.result.and_then(|rows| rows.into_iter().next()) {
            Some(row) => row,
            None => return Ok(VerificationInfo::default()),
        };

        let source_code = row.source_code.unwrap_or_default();
        if !has_meaningful_source(&source_code) {
            return Ok(VerificationInfo::default());
        }

        // The ABI field is a JSON string; unverified contracts carry a
        // sentinel message there, which simply fails to parse.
        let abi = row
            .abi
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<AbiEntry>>(raw).ok());

        Ok(VerificationInfo {
            is_verified: true,
            contract_name: row.contract_name,
            source_code: Some(source_code),
            abi,
        })
    }
}

/// Verified means more than an empty or placeholder source blob
fn has_meaningful_source(source: &str) -> bool {
    !source.is_empty() && source != "{}" && source.len() > 2
}
