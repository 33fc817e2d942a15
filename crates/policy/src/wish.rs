// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses the `## Auto-Approve` section out of a wish markdown file
//! (spec.md §6). Only that one heading's items are recognized; everything
//! else in the document is ignored by this parser.

/// Raw items collected from one `## Auto-Approve` section, before the
/// allow-surface folding in [`crate::config::AutoApproveConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishAutoApprove {
    pub bash: Vec<String>,
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

/// Scan `markdown` for a `## Auto-Approve` heading and collect `- bash:`,
/// `- allow:`, and `- deny:` items until the next `##` heading (or end of
/// document).
pub fn parse_wish_autoapprove(markdown: &str) -> WishAutoApprove {
    let mut result = WishAutoApprove::default();
    let mut in_section = false;

    for line in markdown.lines() {
        let line = line.trim_start();
        if let Some(heading) = line.strip_prefix("## ") {
            in_section = heading.trim() == "Auto-Approve";
            continue;
        }
        if !in_section {
            continue;
        }
        let Some(item) = line.strip_prefix("- ") else {
            continue;
        };
        if let Some(value) = item.strip_prefix("bash:") {
            result.bash.push(unquote(value.trim()));
        } else if let Some(value) = item.strip_prefix("allow:") {
            result.allow.push(value.trim().to_string());
        } else if let Some(value) = item.strip_prefix("deny:") {
            result.deny.push(value.trim().to_string());
        }
    }

    result
}

fn unquote(s: &str) -> String {
    s.trim_matches('"').to_string()
}

#[cfg(test)]
#[path = "wish_tests.rs"]
mod tests;
