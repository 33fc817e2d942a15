// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use genie_core::Action;
use regex::Regex;

fn config(allow: &[&str], deny: &[&str]) -> AutoApproveConfig {
    AutoApproveConfig {
        allow: allow.iter().map(|s| s.to_string()).collect(),
        deny: deny.iter().map(|s| s.to_string()).collect(),
        bash_allow_patterns: Vec::new(),
        bash_deny_patterns: Vec::new(),
    }
}

fn bash_command(command: &str) -> ToolInput {
    ToolInput::Bash {
        command: command.to_string(),
    }
}

// spec.md §8 S1
#[tokio::test]
async fn s1_allowed_non_bash_tool_is_approved() {
    let cfg = config(&["Read", "Glob", "Grep"], &[]);
    let decision = decide("Read", None, &cfg).await;
    assert_eq!(decision.action, Action::Approve);
}

// spec.md §8 S2 / property 1: deny dominates allow.
#[tokio::test]
async fn s2_denied_tool_is_denied_even_if_also_allowed() {
    let cfg = config(&["Read"], &["Write"]);
    let decision = decide("Write", None, &cfg).await;
    assert_eq!(decision.action, Action::Deny);
}

// property 2: neither allowed nor denied -> escalate, never approve.
#[tokio::test]
async fn unknown_tool_escalates() {
    let cfg = config(&["Read"], &[]);
    let decision = decide("Magic", None, &cfg).await;
    assert_eq!(decision.action, Action::Escalate);
}

// spec.md §8 S3
#[tokio::test]
async fn s3_bash_with_metacharacters_and_partial_allow_match_escalates() {
    let mut cfg = config(&["Bash"], &[]);
    cfg.bash_allow_patterns = vec![CompiledPattern {
        source: "bun test".to_string(),
        regex: Some(Regex::new("bun test").unwrap()),
    }];
    cfg.bash_deny_patterns = vec![CompiledPattern {
        source: "rm -rf".to_string(),
        regex: Some(Regex::new("rm -rf").unwrap()),
    }];
    let input = bash_command("bun test && rm -rf /");
    let decision = decide("Bash", Some(&input), &cfg).await;
    assert_eq!(decision.action, Action::Escalate);
}

// spec.md §8 S4 / property 3: deny dominates regardless of normalization
// surface (absolute path + double space).
#[tokio::test]
async fn s4_deny_pattern_matches_after_normalization() {
    let mut cfg = config(&["Bash"], &[]);
    cfg.bash_allow_patterns = vec![CompiledPattern {
        source: "bun test".to_string(),
        regex: Some(Regex::new("bun test").unwrap()),
    }];
    cfg.bash_deny_patterns = vec![CompiledPattern {
        source: "rm -rf".to_string(),
        regex: Some(Regex::new("rm -rf").unwrap()),
    }];
    let input = bash_command("/usr/bin/rm  -rf /var");
    let decision = decide("Bash", Some(&input), &cfg).await;
    assert_eq!(decision.action, Action::Deny);
}

// property 4: plain bash with no metacharacters approves on a partial
// allow match.
#[tokio::test]
async fn plain_bash_approves_on_partial_allow_match() {
    let mut cfg = config(&["Bash"], &[]);
    cfg.bash_allow_patterns = vec![CompiledPattern {
        source: "bun test".to_string(),
        regex: Some(Regex::new("bun test").unwrap()),
    }];
    let input = bash_command("bun test -w");
    let decision = decide("Bash", Some(&input), &cfg).await;
    assert_eq!(decision.action, Action::Approve);
}

#[tokio::test]
async fn bash_with_no_patterns_at_all_approves_on_tool_level_allow() {
    let cfg = config(&["Bash"], &[]);
    let input = bash_command("ls -la");
    let decision = decide("Bash", Some(&input), &cfg).await;
    assert_eq!(decision.action, Action::Approve);
}

#[tokio::test]
async fn bash_without_extractable_command_escalates() {
    let cfg = config(&["Bash"], &[]);
    let input = ToolInput::Other(std::collections::BTreeMap::new());
    let decision = decide("Bash", Some(&input), &cfg).await;
    assert_eq!(decision.action, Action::Escalate);
}

#[tokio::test]
async fn bash_with_metacharacters_and_full_allow_match_approves() {
    let mut cfg = config(&["Bash"], &[]);
    cfg.bash_allow_patterns = vec![CompiledPattern {
        source: "^bun test && bun build$".to_string(),
        regex: Some(Regex::new("^bun test && bun build$").unwrap()),
    }];
    let input = bash_command("bun test && bun build");
    let decision = decide("Bash", Some(&input), &cfg).await;
    assert_eq!(decision.action, Action::Approve);
}

#[tokio::test]
async fn bash_with_no_metacharacters_and_no_allow_match_escalates() {
    let mut cfg = config(&["Bash"], &[]);
    cfg.bash_deny_patterns = vec![CompiledPattern {
        source: "rm -rf".to_string(),
        regex: Some(Regex::new("rm -rf").unwrap()),
    }];
    let input = bash_command("ls -la");
    let decision = decide("Bash", Some(&input), &cfg).await;
    assert_eq!(decision.action, Action::Escalate);
}
