//! Deployed State Probe Module
//!
//! Reads live contract state directly over RPC, independent of verification
//! status. For upgradeable contracts this is the ground truth: the live
//! storage may diverge from anything the registry's static source says.
//!
//! Failure model: every field is individually best-effort. A missing name()
//! does not block symbol(); a dead metadata path falls back to per-field
//! reads. Nothing in here aborts an audit.

use alloy_primitives::{utils::format_ether, utils::format_units, Address};
use alloy_sol_types::{sol, SolCall};
use serde::Serialize;
use std::future::Future;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::gateway::ChainGateway;
use crate::metadata::{self, TokenMetadataClient};

// Owner view, separate from the ERC20 shape: Ownable contracts expose it
// regardless of token-ness
sol! {
    function owner() external view returns (address);
}

/// Absorb a field-level failure into an absent value. Every per-field read
/// in the probe (and the account-address enrichment in the orchestrator)
/// goes through this; nothing else may swallow errors silently.
pub async fn best_effort<T>(fut: impl Future<Output = AppResult<T>>) -> Option<T> {
    fut.await.ok()
}

/// Live token identity fields
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenInfo {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

/// Live supply fields. The formatted figure requires decimals; when decimals
/// is unknown the formatted field is simply omitted, never defaulted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SupplyInfo {
    pub total_supply: Option<String>,
    pub total_supply_formatted: Option<String>,
}

/// Live owner field
#[derive(Debug, Clone, Default, Serialize)]
pub struct OwnerInfo {
    pub owner: Option<String>,
}

/// Native-token holdings of the contract itself
#[derive(Debug, Clone, Default, Serialize)]
pub struct Balances {
    pub native_balance: Option<String>,
}

/// Snapshot of live contract state
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeployedState {
    pub token_info: TokenInfo,
    pub supply_info: SupplyInfo,
    pub owner_info: OwnerInfo,
    pub balances: Balances,
    pub error: Option<String>,
}

/// Probe live state: metadata collaborator first, per-field fallback second,
/// owner and native balance unconditionally.
pub async fn analyze_deployed_state(gateway: &ChainGateway, address: &Address) -> DeployedState {
    let mut state = DeployedState::default();

    match TokenMetadataClient::fetch(gateway, address).await {
        Ok(meta) => {
            state.token_info.name = Some(meta.name);
            state.token_info.symbol = Some(meta.symbol);
            state.token_info.decimals = Some(meta.decimals);
            state.supply_info.total_supply = Some(meta.total_supply);
            state.supply_info.total_supply_formatted = Some(meta.total_supply_formatted);
        }
        Err(_) => {
            // Per-field fallback against the inline ERC20 view
            state.token_info.name = best_effort(metadata::call_name(gateway, address)).await;
            state.token_info.symbol = best_effort(metadata::call_symbol(gateway, address)).await;
            state.token_info.decimals =
                best_effort(metadata::call_decimals(gateway, address)).await;

            if let Some(supply) =
                best_effort(metadata::call_total_supply(gateway, address)).await
            {
                state.supply_info.total_supply = Some(supply.to_string());
                if let Some(decimals) = state.token_info.decimals {
                    state.supply_info.total_supply_formatted =
                        format_units(supply, decimals).ok();
                }
            }
        }
    }

    state.owner_info.owner = best_effort(call_owner(gateway, address)).await;

    state.balances.native_balance = best_effort(async {
        let wei = gateway.get_balance(address).await?;
        Ok(format_ether(wei))
    })
    .await;

    state
}

async fn call_owner(gateway: &ChainGateway, address: &Address) -> AppResult<String> {
    let output = gateway.eth_call(address, &ownerCall {}.abi_encode()).await?;
    let decoded = ownerCall::abi_decode_returns(&output, true)
        .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "owner() decode failed", e))?;
    Ok(decoded._0.to_checksum(None))
}
