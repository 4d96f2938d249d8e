use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn cmd() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("vimspec").unwrap()
}

const MISSING_EDITOR: &str = r#"
[editor]
executable = "vimspec-no-such-editor"
"#;

const STRING_CASE: &str = r#"
kind = "ex"

[[syntax]]
name = "string literal"
code = 'x = "hello"'
pattern = "hello"
includes = "elixirString"
"#;

fn write_case(root: &Path, name: &str, content: &str) {
    fs::create_dir_all(root.join("spec")).unwrap();
    fs::write(root.join("spec").join(name), content).unwrap();
}

#[test]
fn init_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["init"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .vimspecrc.toml"));

    let written = fs::read_to_string(dir.path().join(".vimspecrc.toml")).unwrap();
    assert!(written.contains("ftdetect/eelixir.vim"));
}

#[test]
fn init_fails_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".vimspecrc.toml"), "").unwrap();
    cmd()
        .args(["init"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn check_without_case_files_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["check", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No case files found"));
}

#[test]
fn check_reports_broken_case_file() {
    let dir = tempfile::tempdir().unwrap();
    write_case(dir.path(), "broken.toml", "[[indent]]\nname = ");
    cmd()
        .args(["check", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("case file parse error"))
        .stderr(predicate::str::contains("broken.toml"));
}

#[test]
fn check_reports_case_without_expectation() {
    let dir = tempfile::tempdir().unwrap();
    write_case(
        dir.path(),
        "strings.toml",
        "kind = \"ex\"\n[[syntax]]\nname = \"bare\"\ncode = \"x\"\npattern = \"x\"\n",
    );
    cmd()
        .args(["check", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs one of `includes` or `excludes`"));
}

#[test]
fn check_rejects_invalid_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_case(dir.path(), "strings.toml", STRING_CASE);
    cmd()
        .args(["check", dir.path().to_str().unwrap(), "--filter", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --filter regex"));
}

#[test]
fn check_fails_when_editor_cannot_start() {
    let dir = tempfile::tempdir().unwrap();
    write_case(dir.path(), "strings.toml", STRING_CASE);
    fs::write(dir.path().join(".vimspecrc.toml"), MISSING_EDITOR).unwrap();
    cmd()
        .args(["check", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("editor setup failed"))
        .stderr(predicate::str::contains("vimspec-no-such-editor"));
}

#[test]
fn check_with_explicit_config_path() {
    let dir = tempfile::tempdir().unwrap();
    write_case(dir.path(), "strings.toml", STRING_CASE);
    let config = dir.path().join("custom.toml");
    fs::write(&config, MISSING_EDITOR).unwrap();
    cmd()
        .args([
            "check",
            dir.path().to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vimspec-no-such-editor"));
}

#[test]
fn check_reports_broken_config() {
    let dir = tempfile::tempdir().unwrap();
    write_case(dir.path(), "strings.toml", STRING_CASE);
    fs::write(
        dir.path().join(".vimspecrc.toml"),
        "[editor]\nstartup_timeout_ms = \"soon\"\n",
    )
    .unwrap();
    cmd()
        .args(["check", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config parse error"));
}

#[test]
fn probe_fails_when_editor_cannot_start() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".vimspecrc.toml"), MISSING_EDITOR).unwrap();
    cmd()
        .args([
            "probe",
            "-",
            "--kind",
            "eex",
            "--root",
            dir.path().to_str().unwrap(),
        ])
        .write_stdin("<div>\n<%= foo %>\n</div>\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("editor setup failed"));
}

#[test]
fn probe_rejects_unknown_kind() {
    cmd()
        .args(["probe", "-", "--kind", "exs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn probe_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args([
            "probe",
            dir.path().join("nope.ex").to_str().unwrap(),
            "--kind",
            "ex",
            "--root",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
