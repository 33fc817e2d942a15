// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The decision algorithm (spec.md §4.1): given a tool name, its input, and
//! a compiled [`AutoApproveConfig`], produce a [`Decision`]. Strict order,
//! first match wins at each step.

use genie_core::{Decision, ToolInput};

use crate::config::{AutoApproveConfig, CompiledPattern};
use crate::normalize::{contains_shell_metacharacter, normalize_command};
use crate::safe_regex::{literal_test, safe_regex_test, SafeMatch};

/// Evaluate one permission request's tool name/input against `config`.
pub async fn decide(
    tool_name: &str,
    tool_input: Option<&ToolInput>,
    config: &AutoApproveConfig,
) -> Decision {
    if config.deny.contains(tool_name) {
        return Decision::deny(format!("tool {tool_name:?} is in the deny list"));
    }
    if !config.allow.contains(tool_name) {
        return Decision::escalate(format!("tool {tool_name:?} is not in the allow list"));
    }
    if tool_name != "Bash" {
        return Decision::approve(format!("tool {tool_name:?} is allow-listed"));
    }

    decide_bash(tool_input, config).await
}

async fn decide_bash(tool_input: Option<&ToolInput>, config: &AutoApproveConfig) -> Decision {
    let Some(command) = tool_input.and_then(ToolInput::bash_command) else {
        return Decision::escalate("no command string could be extracted from the tool input");
    };

    let normalized = normalize_command(command);

    if let Some(pattern) = first_match(&config.bash_deny_patterns, &normalized).await {
        return Decision::deny(format!(
            "bash command matches deny pattern {:?}",
            pattern.source
        ));
    }

    if config.bash_allow_patterns.is_empty() && config.bash_deny_patterns.is_empty() {
        return Decision::approve("Bash is allow-listed with no configured bash patterns");
    }

    if contains_shell_metacharacter(&normalized) {
        if let Some(pattern) = first_full_match(&config.bash_allow_patterns, &normalized).await {
            return Decision::approve(format!(
                "bash command contains shell metacharacters but is fully covered by allow pattern {:?}",
                pattern.source
            ));
        }
        return Decision::escalate(
            "bash command contains shell metacharacters and no allow pattern covers the entire command",
        );
    }

    if let Some(pattern) = first_match(&config.bash_allow_patterns, &normalized).await {
        return Decision::approve(format!(
            "bash command matches allow pattern {:?}",
            pattern.source
        ));
    }

    Decision::escalate("bash command does not match any allow pattern")
}

async fn test_pattern(pattern: &CompiledPattern, input: &str) -> SafeMatch {
    match &pattern.regex {
        Some(regex) => safe_regex_test(regex, input).await,
        None => literal_test(&pattern.source, input),
    }
}

async fn first_match<'a>(
    patterns: &'a [CompiledPattern],
    input: &str,
) -> Option<&'a CompiledPattern> {
    for pattern in patterns {
        if test_pattern(pattern, input).await.matched {
            return Some(pattern);
        }
    }
    None
}

async fn first_full_match<'a>(
    patterns: &'a [CompiledPattern],
    input: &str,
) -> Option<&'a CompiledPattern> {
    for pattern in patterns {
        let result = test_pattern(pattern, input).await;
        if result.matched && result.full_match {
            return Some(pattern);
        }
    }
    None
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
