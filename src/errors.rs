//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so production logs can be
//! grepped by category:
//! - NET_xxx: network/configuration errors
//! - ADDR_xxx: address validation errors
//! - RPC_xxx: chain gateway errors
//! - REG_xxx: registry (Etherscan-family) errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Plain message: these strings land verbatim in the result record's
        // `error` field, so no code prefix here.
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Network / configuration errors
    // ============================================
    /// Network name not in the configured set
    InvalidNetwork,
    /// Malformed contract/account address
    InvalidAddress,

    // ============================================
    // Chain gateway (RPC) errors
    // ============================================
    /// RPC endpoint unreachable
    RpcConnectionFailed,
    /// RPC request timeout
    RpcTimeout,
    /// RPC returned an error response
    RpcError,
    /// Malformed RPC response
    RpcInvalidResponse,

    // ============================================
    // Registry errors
    // ============================================
    /// Network has no registry support (capability limitation, not a hard failure)
    RegistryUnavailable,
    /// Registry HTTP/API error
    RegistryError,
    /// Registry reachable but contract has no published source
    ContractNotVerified,

    // ============================================
    // Generic
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidNetwork => "NET_INVALID",
            Self::InvalidAddress => "ADDR_INVALID",
            Self::RpcConnectionFailed => "RPC_CONNECTION_FAILED",
            Self::RpcTimeout => "RPC_TIMEOUT",
            Self::RpcError => "RPC_ERROR",
            Self::RpcInvalidResponse => "RPC_INVALID_RESPONSE",
            Self::RegistryUnavailable => "REG_UNAVAILABLE",
            Self::RegistryError => "REG_ERROR",
            Self::ContractNotVerified => "CONTRACT_NOT_VERIFIED",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Network not in the configured set
    pub fn invalid_network(network: &str, supported: &[&str]) -> Self {
        Self::new(
            ErrorCode::InvalidNetwork,
            format!(
                "Network '{}' not supported. Supported networks: {:?}",
                network, supported
            ),
        )
    }

    /// Malformed address
    pub fn invalid_address() -> Self {
        Self::new(ErrorCode::InvalidAddress, "Invalid Ethereum address format")
    }

    /// RPC endpoint unreachable
    pub fn connection_failed(network: &str) -> Self {
        Self::new(
            ErrorCode::RpcConnectionFailed,
            format!("Failed to connect to {} network", network),
        )
    }

    /// RPC returned an error response
    pub fn rpc_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcError, msg)
    }

    /// Registry HTTP/API error
    pub fn registry_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RegistryError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::RpcTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::RpcConnectionFailed, "Connection failed")
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::RpcInvalidResponse, "JSON parse error", err)
    }
}
