// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered auto-approve configuration (spec.md §4.1, §6). Four layers are
//! merged lowest-precedence first: global defaults, a per-repo override
//! selected from the global file, a repo-local file, and a wish-markdown
//! block. Every layer either *inherits* (unions into the accumulator) or
//! *overrides* (replaces the accumulator's defaults outright); which one a
//! given layer is depends on its `inherit` field (wish blocks are always
//! inherit).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::warn;

use crate::wish::WishAutoApprove;

/// How a [`RepoBlock`] combines with whatever precedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inherit {
    #[default]
    None,
    Global,
}

/// The raw (uncompiled) allow/deny/pattern lists shared by every layer's
/// YAML shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsBlock {
    #[serde(default)]
    pub allow: HashSet<String>,
    #[serde(default)]
    pub deny: HashSet<String>,
    #[serde(default)]
    pub bash_allow_patterns: Vec<String>,
    #[serde(default)]
    pub bash_deny_patterns: Vec<String>,
}

/// A repo-specific override block, either nested under the global file's
/// `repos` map or standing alone as a repo-local `auto-approve.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoBlock {
    #[serde(default)]
    pub inherit: Inherit,
    #[serde(flatten)]
    pub defaults: DefaultsBlock,
}

/// Top-level shape of `auto-approve.yaml` (spec.md §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsBlock,
    #[serde(default)]
    pub repos: HashMap<String, RepoBlock>,
}

/// One compiled bash pattern. `regex` is `None` when the source failed to
/// compile; callers fall back to a literal substring match in that case
/// (spec.md §4.1.2, §7 `RegexCompile`).
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub regex: Option<Regex>,
}

impl CompiledPattern {
    fn compile(source: &str) -> Self {
        match Regex::new(source) {
            Ok(regex) => Self {
                source: source.to_string(),
                regex: Some(regex),
            },
            Err(error) => {
                warn!(pattern = source, %error, "bash pattern failed to compile; falling back to literal substring match");
                Self {
                    source: source.to_string(),
                    regex: None,
                }
            }
        }
    }
}

/// The compiled, in-memory form of the layered policy (spec.md §3
/// `AutoApproveConfig`).
#[derive(Debug, Clone, Default)]
pub struct AutoApproveConfig {
    pub allow: HashSet<String>,
    pub deny: HashSet<String>,
    pub bash_allow_patterns: Vec<CompiledPattern>,
    pub bash_deny_patterns: Vec<CompiledPattern>,
}

impl AutoApproveConfig {
    fn apply_inherit(&mut self, block: &DefaultsBlock) {
        self.allow.extend(block.allow.iter().cloned());
        self.deny.extend(block.deny.iter().cloned());
        self.bash_allow_patterns
            .extend(compile_all(&block.bash_allow_patterns));
        self.bash_deny_patterns
            .extend(compile_all(&block.bash_deny_patterns));
    }

    fn apply_override(&mut self, block: &DefaultsBlock) {
        self.allow = block.allow.clone();
        self.deny = block.deny.clone();
        self.bash_allow_patterns = compile_all(&block.bash_allow_patterns);
        self.bash_deny_patterns = compile_all(&block.bash_deny_patterns);
    }

    fn apply_repo_block(&mut self, block: &RepoBlock) {
        match block.inherit {
            Inherit::Global => self.apply_inherit(&block.defaults),
            Inherit::None => self.apply_override(&block.defaults),
        }
    }

    /// Wish-level blocks always inherit. The upstream markdown parser folds
    /// every item under `## Auto-Approve` -- including `- deny:` entries --
    /// into the allow surface; that quirk is preserved here rather than
    /// silently fixed (spec.md §9 Open Questions; see DESIGN.md).
    fn apply_wish(&mut self, items: &WishAutoApprove) {
        self.bash_allow_patterns.extend(compile_all(&items.bash));
        self.allow.extend(items.allow.iter().cloned());
        self.allow.extend(items.deny.iter().cloned());
    }
}

fn compile_all(sources: &[String]) -> Vec<CompiledPattern> {
    sources.iter().map(|s| CompiledPattern::compile(s)).collect()
}

/// Default location of the user-level global config file, mirroring the
/// teacher's `dirs::home_dir()`-based resolution for per-user state.
pub fn default_global_config_path() -> std::path::PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"))
        .join("genie")
        .join("auto-approve.yaml")
}

fn read_config_file(path: &Path) -> Option<ConfigFile> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to read auto-approve config; using empty defaults");
            return None;
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(config) => Some(config),
        Err(error) => {
            warn!(path = %path.display(), %error, "invalid auto-approve config; using empty defaults");
            None
        }
    }
}

fn read_repo_block(path: &Path) -> Option<RepoBlock> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to read auto-approve config; using empty defaults");
            return None;
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(block) => Some(block),
        Err(error) => {
            warn!(path = %path.display(), %error, "invalid auto-approve config; using empty defaults");
            None
        }
    }
}

/// Select the `repos` key that applies to `repo_path`: the longest key that
/// equals `repo_path` or is a `/`-boundary-respecting prefix of it.
fn select_repo_key<'a>(repos: &'a HashMap<String, RepoBlock>, repo_path: &str) -> Option<&'a str> {
    repos
        .keys()
        .filter(|key| {
            key.as_str() == repo_path
                || (repo_path.starts_with(key.as_str())
                    && repo_path.as_bytes().get(key.len()) == Some(&b'/'))
        })
        .max_by_key(|key| key.len())
        .map(String::as_str)
}

/// Load and merge all four layers for `repo_path` (spec.md §4.1 load
/// order). `wish_markdown` is the full text of a wish's markdown file, if
/// one applies to the request being evaluated.
pub fn load_layered(
    global_path: &Path,
    repo_path: &Path,
    repo_local_path: &Path,
    wish_markdown: Option<&str>,
) -> AutoApproveConfig {
    let mut config = AutoApproveConfig::default();
    let repo_path_str = repo_path.to_string_lossy();

    if let Some(global) = read_config_file(global_path) {
        config.apply_inherit(&global.defaults);
        if let Some(key) = select_repo_key(&global.repos, &repo_path_str) {
            if let Some(block) = global.repos.get(key) {
                config.apply_repo_block(block);
            }
        }
    }

    if let Some(repo_local) = read_repo_block(repo_local_path) {
        config.apply_repo_block(&repo_local);
    }

    if let Some(markdown) = wish_markdown {
        let items = crate::wish::parse_wish_autoapprove(markdown);
        config.apply_wish(&items);
    }

    config
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
