//! Contract Sentry Library
//!
//! Multi-chain smart contract audit engine producing a structured
//! risk/identity profile from on-chain state:
//! - Verification status and source/ABI via the Etherscan V2 registry
//! - Token standard detection (ERC20/721/1155) over verified ABIs
//! - Proxy/upgrade pattern detection with implementation resolution
//! - Bytecode selector heuristics with confidence scoring
//! - Known-unsafe-pattern scanning of verified source

pub mod audit;
pub mod bytecode;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod matcher;
pub mod metadata;
pub mod probe;
pub mod prompts;
pub mod proxy;
pub mod registry;
pub mod security;
pub mod standards;
pub mod types;

pub use audit::ContractAuditor;
pub use bytecode::{detect_contract_type, enhanced_analysis, BytecodeReport};
pub use config::AuditorConfig;
pub use errors::{AppError, AppResult, ErrorCode};
pub use gateway::ChainGateway;
pub use matcher::{scan, MatchStrategy, PatternRule};
pub use metadata::{TokenMetadata, TokenMetadataClient};
pub use probe::{analyze_deployed_state, best_effort, DeployedState};
pub use proxy::{analyze_proxy, detect_proxy_markers, ProxyAnalysis};
pub use registry::{CreationInfo, RegistryClient, VerificationInfo};
pub use security::{analyze_source, SecurityIssue, SecurityReport, Severity};
pub use standards::{detect_standards, AbiEntry, Standards};
pub use types::{AuditOutput, ContractAuditResult, OutputFormat, PromptOutput};
