// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded regex execution (spec.md §4.1.2): ReDoS mitigation for
//! operator-supplied bash allow/deny patterns. Input is capped at 8 KiB and
//! matching runs under a 100ms wall-clock budget on a blocking thread; a
//! pattern that blows either bound is treated as a non-match, never as a
//! crash or a hang.

use regex::Regex;
use std::time::Duration;
use tracing::warn;

/// Maximum input length considered by [`safe_regex_test`]; longer input is
/// truncated (on a char boundary) before matching.
pub const MAX_INPUT_BYTES: usize = 8 * 1024;

/// Wall-clock budget for a single match attempt.
pub const MATCH_BUDGET: Duration = Duration::from_millis(100);

/// Outcome of a bounded regex test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafeMatch {
    pub matched: bool,
    /// True if `matched` and the match span covered the entire (truncated)
    /// input, per the "whole command" requirement in spec.md §4.1 step e.
    pub full_match: bool,
}

/// Test `pattern` against `input`, truncating `input` to
/// [`MAX_INPUT_BYTES`] and giving the match [`MATCH_BUDGET`] of wall-clock
/// time. A pattern that fails to compile falls back to a literal substring
/// search (logged by the caller, which owns the compiled-pattern cache).
pub async fn safe_regex_test(pattern: &Regex, input: &str) -> SafeMatch {
    let input = truncate_to_char_boundary(input, MAX_INPUT_BYTES).to_string();
    let pattern_source = pattern.as_str().to_string();
    let pattern = pattern.clone();
    let handle = tokio::task::spawn_blocking(move || {
        pattern
            .find(&input)
            .map(|m| (m.start(), m.end(), input.len()))
    });

    match tokio::time::timeout(MATCH_BUDGET, handle).await {
        Ok(Ok(Some((start, end, len)))) => SafeMatch {
            matched: true,
            full_match: start == 0 && end == len,
        },
        Ok(Ok(None)) => SafeMatch::default(),
        // The blocking task panicked; treat as non-match rather than
        // propagating, matching "neither failure may crash the engine".
        Ok(Err(join_error)) => {
            warn!(pattern = %pattern_source, %join_error, "bash pattern match task panicked");
            SafeMatch::default()
        }
        Err(_elapsed) => {
            warn!(pattern = %pattern_source, budget_ms = MATCH_BUDGET.as_millis() as u64, "bash pattern match exceeded time budget");
            SafeMatch::default()
        }
    }
}

/// Literal substring fallback for a pattern that failed to compile.
pub fn literal_test(pattern: &str, input: &str) -> SafeMatch {
    let input = truncate_to_char_boundary(input, MAX_INPUT_BYTES);
    match input.find(pattern) {
        Some(pos) => SafeMatch {
            matched: true,
            full_match: pos == 0 && pattern.len() == input.len(),
        },
        None => SafeMatch::default(),
    }
}

fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
#[path = "safe_regex_tests.rs"]
mod tests;
