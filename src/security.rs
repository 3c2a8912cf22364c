//! Security Heuristics Module
//!
//! Substring checks over verified source text. No AST, no control flow -
//! each check is an independent pattern with a fixed severity and
//! description, and all checks run (no short-circuit). The output is a
//! best-effort signal list, not an audit verdict.

use serde::Serialize;

/// Issue severity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// One detected issue
#[derive(Debug, Clone, Serialize)]
pub struct SecurityIssue {
    pub severity: Severity,
    pub issue: String,
    pub description: String,
}

/// Full security scan output
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecurityReport {
    pub issues_found: bool,
    pub issues: Vec<SecurityIssue>,
}

/// Scan verified source text. Checks run in a fixed order and the issue list
/// preserves that order.
pub fn analyze_source(source_code: &str) -> SecurityReport {
    let mut issues = Vec::new();

    // Unguarded low-level value transfer
    if source_code.contains("call.value") && !source_code.contains("ReentrancyGuard") {
        issues.push(SecurityIssue {
            severity: Severity::High,
            issue: "Potential reentrancy vulnerability".to_string(),
            description:
                "Contract uses call.value without ReentrancyGuard or checks-effects-interactions pattern"
                    .to_string(),
        });
    }

    // Origin-based authentication
    if source_code.contains("tx.origin") {
        issues.push(SecurityIssue {
            severity: Severity::Medium,
            issue: "tx.origin used for authentication".to_string(),
            description: "Using tx.origin for authentication can be exploited by phishing attacks"
                .to_string(),
        });
    }

    // External calls with no require on any call site line
    let has_external_call =
        source_code.contains(".call(") || source_code.contains(".delegatecall(");
    let has_guarded_call_line = source_code
        .lines()
        .any(|line| line.contains("require") && line.contains(".call"));
    if has_external_call && !has_guarded_call_line {
        issues.push(SecurityIssue {
            severity: Severity::Medium,
            issue: "Unchecked external call".to_string(),
            description: "External calls without checking return value can lead to silent failures"
                .to_string(),
        });
    }

    // Time-based logic
    if source_code.contains("block.timestamp") || source_code.contains("now") {
        issues.push(SecurityIssue {
            severity: Severity::Low,
            issue: "Timestamp dependence".to_string(),
            description: "Using block.timestamp for critical logic can be manipulated by miners"
                .to_string(),
        });
    }

    // Destructive termination opcodes
    if source_code.contains("selfdestruct") || source_code.contains("suicide") {
        issues.push(SecurityIssue {
            severity: Severity::High,
            issue: "Unprotected self-destruct".to_string(),
            description: "Self-destruct functionality found - ensure it has proper access controls"
                .to_string(),
        });
    }

    SecurityReport {
        issues_found: !issues.is_empty(),
        issues,
    }
}
