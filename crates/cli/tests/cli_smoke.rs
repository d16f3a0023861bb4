//! CLI smoke tests for stylepack.
//!
//! These tests run the binary against small throwaway themes and check exit
//! codes and the shape of what gets printed.

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the stylepack binary.
fn stylepack_cmd() -> Command {
  cargo_bin_cmd!("stylepack")
}

const CONFIG: &str = r#"
root: theme
output: public
stylesheets:
  screen:
    - reset.css
    - ./layout/*
  vendor:
    - ./vendor/**/*
"#;

/// Create a theme with a config file in a temp directory.
fn temp_site(config: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  let files = [
    ("stylepack.yaml", config),
    ("theme/reset.css", "* { margin: 0; }\n"),
    ("theme/layout/a.css", ".a {}\n"),
    ("theme/layout/b.css", ".b {}\n"),
    ("theme/vendor/x.css", ".x {}\n"),
    ("theme/vendor/deep/y.css", ".y {}\n"),
  ];
  for (rel, content) in files {
    let path = temp.path().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }
  temp
}

fn read(dir: &Path, rel: &str) -> String {
  std::fs::read_to_string(dir.join(rel)).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  stylepack_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  stylepack_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("stylepack"));
}

#[test]
fn subcommand_help_works() {
  for sub in ["compile", "resolve"] {
    stylepack_cmd().args([sub, "--help"]).assert().success();
  }
}

#[test]
fn missing_subcommand_fails() {
  stylepack_cmd().assert().failure();
}

// =============================================================================
// Compile
// =============================================================================

#[test]
fn compile_writes_every_bundle() {
  let site = temp_site(CONFIG);

  stylepack_cmd()
    .current_dir(site.path())
    .arg("compile")
    .assert()
    .success()
    .stdout(predicate::str::contains("screen"))
    .stdout(predicate::str::contains("vendor"));

  assert_eq!(read(site.path(), "public/screen.css"), "* { margin: 0; }\n.a {}\n.b {}\n");
  assert_eq!(read(site.path(), "public/vendor.css"), ".y {}\n.x {}\n");
  assert!(site.path().join("public/manifest.json").is_file());
}

#[test]
fn compile_selected_bundle_only() {
  let site = temp_site(CONFIG);

  stylepack_cmd()
    .current_dir(site.path())
    .args(["compile", "vendor"])
    .assert()
    .success();

  assert!(site.path().join("public/vendor.css").is_file());
  assert!(!site.path().join("public/screen.css").exists());
}

#[test]
fn compile_honors_out_dir_and_jobs() {
  let site = temp_site(CONFIG);
  let out = site.path().join("elsewhere");

  stylepack_cmd()
    .current_dir(site.path())
    .args(["compile", "-j", "1", "--out-dir"])
    .arg(&out)
    .assert()
    .success();

  assert!(out.join("screen.css").is_file());
  assert!(!site.path().join("public").exists());
}

#[test]
fn compile_rejects_zero_jobs() {
  let site = temp_site(CONFIG);

  stylepack_cmd()
    .current_dir(site.path())
    .args(["compile", "--jobs", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--jobs"));
}

#[test]
fn compile_failure_exits_nonzero_but_publishes_the_rest() {
  let config = r#"
root: theme
output: public
stylesheets:
  broken:
    - missing.css
  screen:
    - reset.css
"#;
  let site = temp_site(config);

  stylepack_cmd()
    .current_dir(site.path())
    .arg("compile")
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing.css"));

  assert!(site.path().join("public/screen.css").is_file());
  assert!(!site.path().join("public/broken.css").exists());
}

#[test]
fn recompiling_with_default_paths_is_stable() {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("stylepack.yaml"), "stylesheets:\n  screen: [./**/*]\n").unwrap();
  std::fs::write(temp.path().join("a.css"), "a{}\n").unwrap();

  for _ in 0..2 {
    stylepack_cmd().current_dir(temp.path()).arg("compile").assert().success();
    assert_eq!(read(temp.path(), "compiled/screen.css"), "a{}\n");
  }
}

#[test]
fn colliding_bundle_names_are_rejected() {
  let config = "stylesheets:\n  screen: [reset.css]\n  screen.css: [reset.css]\n";
  let site = temp_site(config);

  stylepack_cmd()
    .current_dir(site.path())
    .arg("compile")
    .assert()
    .failure()
    .stderr(predicate::str::contains("screen.css"));
}

#[test]
fn compile_json_output() {
  let site = temp_site(CONFIG);

  let output = stylepack_cmd()
    .current_dir(site.path())
    .args(["-o", "json", "compile"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["compiled"].as_array().unwrap().len(), 2);
  assert!(json["failed"].as_array().unwrap().is_empty());
  assert_eq!(json["compiled"][0]["bundle"], "screen");
  assert_eq!(json["compiled"][0]["sources"], 3);
}

#[test]
fn compile_unknown_bundle_fails() {
  let site = temp_site(CONFIG);

  stylepack_cmd()
    .current_dir(site.path())
    .args(["compile", "print"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown bundle"));
}

#[test]
fn missing_config_fails() {
  let temp = TempDir::new().unwrap();

  stylepack_cmd()
    .current_dir(temp.path())
    .arg("compile")
    .assert()
    .failure()
    .stderr(predicate::str::contains("stylepack.yaml"));
}

#[test]
fn explicit_config_path() {
  let site = temp_site(CONFIG);
  let elsewhere = TempDir::new().unwrap();

  stylepack_cmd()
    .current_dir(elsewhere.path())
    .arg("-c")
    .arg(site.path().join("stylepack.yaml"))
    .arg("compile")
    .assert()
    .success();

  // Relative paths in the config are anchored at the config file.
  assert!(site.path().join("public/screen.css").is_file());
}

// =============================================================================
// Resolve
// =============================================================================

#[test]
fn resolve_lists_sources_in_order() {
  let site = temp_site(CONFIG);

  stylepack_cmd()
    .current_dir(site.path())
    .args(["resolve", "screen"])
    .assert()
    .success()
    .stdout(predicate::str::is_match(r"(?s)reset\.css.*layout/a\.css.*layout/b\.css").unwrap());

  assert!(!site.path().join("public").exists());
}

#[test]
fn resolve_verbose_lists_directories() {
  let site = temp_site(CONFIG);

  stylepack_cmd()
    .current_dir(site.path())
    .args(["-v", "resolve", "vendor"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Directories:"))
    .stdout(predicate::str::contains("vendor/deep"));
}

#[test]
fn resolve_json_output() {
  let site = temp_site(CONFIG);

  let output = stylepack_cmd()
    .current_dir(site.path())
    .args(["resolve", "vendor", "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["bundle"], "vendor");
  let files = json["files"].as_array().unwrap();
  assert_eq!(files.len(), 2);
  assert!(files[0].as_str().unwrap().ends_with("y.css"));
  assert_eq!(json["dependencies"].as_array().unwrap().len(), 2);
}

#[test]
fn resolve_unknown_bundle_fails() {
  let site = temp_site(CONFIG);

  stylepack_cmd()
    .current_dir(site.path())
    .args(["resolve", "print"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown bundle: print"));
}
