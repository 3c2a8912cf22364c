//! Token Metadata Module
//!
//! All-or-nothing metadata fetch for ERC20-shaped contracts: name, symbol,
//! decimals and total supply in one pass, with a human-formatted supply.
//! The deployed-state probe tries this first and falls back to per-field
//! reads when any one call here fails.

use alloy_primitives::{utils::format_units, Address};
use alloy_sol_types::{sol, SolCall};
use serde::Serialize;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::gateway::ChainGateway;

// Minimal ERC20 metadata view
sol! {
    function name() external view returns (string);
    function symbol() external view returns (string);
    function decimals() external view returns (uint8);
    function totalSupply() external view returns (uint256);
}

/// Token metadata snapshot
#[derive(Debug, Clone, Serialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    pub total_supply_formatted: String,
}

/// Token metadata collaborator over a chain gateway
#[derive(Debug, Clone, Copy)]
pub struct TokenMetadataClient;

impl TokenMetadataClient {
    /// Fetch the full metadata set. Any single failing call fails the whole
    /// fetch; partial metadata is the probe's fallback path, not this one.
    pub async fn fetch(gateway: &ChainGateway, address: &Address) -> AppResult<TokenMetadata> {
        let name = call_name(gateway, address).await?;
        let symbol = call_symbol(gateway, address).await?;
        let decimals = call_decimals(gateway, address).await?;
        let total_supply = call_total_supply(gateway, address).await?;

        let total_supply_formatted = format_units(total_supply, decimals)
            .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "Supply formatting failed", e))?;

        Ok(TokenMetadata {
            name,
            symbol,
            decimals,
            total_supply: total_supply.to_string(),
            total_supply_formatted,
        })
    }
}

pub(crate) async fn call_name(gateway: &ChainGateway, address: &Address) -> AppResult<String> {
    let output = gateway.eth_call(address, &nameCall {}.abi_encode()).await?;
    let decoded = nameCall::abi_decode_returns(&output, true)
        .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "name() decode failed", e))?;
    Ok(decoded._0)
}

pub(crate) async fn call_symbol(gateway: &ChainGateway, address: &Address) -> AppResult<String> {
    let output = gateway.eth_call(address, &symbolCall {}.abi_encode()).await?;
    let decoded = symbolCall::abi_decode_returns(&output, true)
        .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "symbol() decode failed", e))?;
    Ok(decoded._0)
}

pub(crate) async fn call_decimals(gateway: &ChainGateway, address: &Address) -> AppResult<u8> {
    let output = gateway
        .eth_call(address, &decimalsCall {}.abi_encode())
        .await?;
    let decoded = decimalsCall::abi_decode_returns(&output, true)
        .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "decimals() decode failed", e))?;
    Ok(decoded._0)
}

pub(crate) async fn call_total_supply(
    gateway: &ChainGateway,
    address: &Address,
) -> AppResult<alloy_primitives::U256> {
    let output = gateway
        .eth_call(address, &totalSupplyCall {}.abi_encode())
        .await?;
    let decoded = totalSupplyCall::abi_decode_returns(&output, true)
        .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "totalSupply() decode failed", e))?;
    Ok(decoded._0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_selectors() {
        // Canonical ERC20 metadata selectors
        assert_eq!(hex::encode(nameCall::SELECTOR), "06fdde03");
        assert_eq!(hex::encode(symbolCall::SELECTOR), "95d89b41");
        assert_eq!(hex::encode(decimalsCall::SELECTOR), "313ce567");
        assert_eq!(hex::encode(totalSupplyCall::SELECTOR), "18160ddd");
    }

    #[test]
    fn test_supply_formatting() {
        let supply = alloy_primitives::U256::from(1_500_000_000_000_000_000u128);
        let formatted = format_units(supply, 18u8).unwrap();
        assert_eq!(formatted, "1.500000000000000000");
    }
}
