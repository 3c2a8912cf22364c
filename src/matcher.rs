//! Shared hex-pattern matcher
//!
//! All bytecode classifiers (proxy markers, function selectors, router
//! signatures) are ordered tables of rules consumed by one scanner, so new
//! chains or standards are a table edit, not a control-flow change.
//!
//! Matching is a raw substring search over the hex text. A selector's hex
//! digits can appear incidentally inside unrelated immediate data; this is
//! an accepted approximation, not a disassembler.

/// One classification rule: every pattern must be present for the rule to fire.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    /// Hex substrings that must all appear in the bytecode
    pub patterns: &'static [&'static str],
    /// Label attached when the rule fires
    pub label: &'static str,
    /// Confidence contributed by this rule
    pub confidence_delta: f64,
}

/// Scanning strategy over a rule table.
///
/// ProxyResolver stops at the first proxy family found; enhanced bytecode
/// analysis collects every match. The two strategies are deliberately kept
/// distinct rather than unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Stop at the first rule that fires
    FirstMatch,
    /// Collect every rule that fires
    AllMatches,
}

/// Check whether a single rule fires against the hex text.
pub fn rule_matches(haystack: &str, rule: &PatternRule) -> bool {
    rule.patterns.iter().all(|p| haystack.contains(p))
}

/// Scan a rule table against hex text with the given strategy.
/// Returns the rules that fired, in table order.
pub fn scan<'a>(
    haystack: &str,
    rules: &'a [PatternRule],
    strategy: MatchStrategy,
) -> Vec<&'a PatternRule> {
    let mut hits = Vec::new();
    for rule in rules {
        if rule_matches(haystack, rule) {
            hits.push(rule);
            if strategy == MatchStrategy::FirstMatch {
                break;
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: [PatternRule; 3] = [
        PatternRule {
            patterns: &["aaaa"],
            label: "first",
            confidence_delta: 0.5,
        },
        PatternRule {
            patterns: &["bbbb"],
            label: "second",
            confidence_delta: 0.3,
        },
        PatternRule {
            patterns: &["aaaa", "cccc"],
            label: "compound",
            confidence_delta: 0.2,
        },
    ];

    #[test]
    fn test_first_match_stops_scanning() {
        let hits = scan("aaaabbbbcccc", &RULES, MatchStrategy::FirstMatch);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "first");
    }

    #[test]
    fn test_all_matches_collects_everything() {
        let hits = scan("aaaabbbbcccc", &RULES, MatchStrategy::AllMatches);
        let labels: Vec<&str> = hits.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["first", "second", "compound"]);
    }

    #[test]
    fn test_compound_rule_requires_all_patterns() {
        // "cccc" alone must not fire the compound rule
        let hits = scan("ccccdddd", &RULES, MatchStrategy::AllMatches);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_no_match_on_empty_input() {
        assert!(scan("", &RULES, MatchStrategy::AllMatches).is_empty());
    }
}
