// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::Deserialize;
use tempfile::tempdir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Sample {
    value: u32,
}

#[test]
fn load_missing_file_is_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(load_json::<Sample>(&path).unwrap().is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    save_json(&path, &Sample { value: 42 }).unwrap();
    let loaded: Sample = load_json(&path).unwrap().unwrap();
    assert_eq!(loaded, Sample { value: 42 });
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deep/sample.json");
    save_json(&path, &Sample { value: 1 }).unwrap();
    assert!(path.exists());
}

#[test]
fn save_leaves_no_tmp_file_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    save_json(&path, &Sample { value: 1 }).unwrap();
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn load_json_errors_on_malformed_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "not json").unwrap();
    assert!(load_json::<Sample>(&path).is_err());
}

#[test]
fn load_json_lenient_skips_malformed_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "not json").unwrap();
    assert!(load_json_lenient::<Sample>(&path).is_none());
}

#[test]
fn load_json_lenient_skips_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(load_json_lenient::<Sample>(&path).is_none());
}
