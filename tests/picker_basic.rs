#![cfg(unix)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use expectrl::{spawn, Eof};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

const TWO_COMMITS: &str = "#!/usr/bin/env sh\nprintf 'aaa111\\037fix bug\\037\\036\\nbbb222\\037add feature\\037HEAD -> main, tag: v1.0\\036\\n'\n";

/// Create a temp dir holding an executable `git` script and return it with a PATH that finds it first.
fn fake_git(script: &str) -> anyhow::Result<(TempDir, String)> {
    let tmp_dir = tempfile::tempdir()?;
    let git_path = tmp_dir.path().join("git");
    std::fs::write(&git_path, script)?;
    std::fs::set_permissions(&git_path, std::fs::Permissions::from_mode(0o755))?;

    let orig_path = std::env::var("PATH").unwrap_or_default();
    let path = format!("{}:{}", tmp_dir.path().display(), orig_path);
    Ok((tmp_dir, path))
}

fn isolated_cmd(path: &str, config_home: &Path) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("commit-picker")?;
    cmd.env("PATH", path).env("XDG_CONFIG_HOME", config_home);
    Ok(cmd)
}

#[test]
fn list_prints_commits_in_order() -> anyhow::Result<()> {
    let (dir, path) = fake_git(TWO_COMMITS)?;

    let output = isolated_cmd(&path, dir.path())?
        .args(["--selected", "bbb222", "list"])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["  aaa111 fix bug", "* bbb222 (v1.0) add feature"]
    );
    Ok(())
}

#[test]
fn list_json_is_machine_readable() -> anyhow::Result<()> {
    let (dir, path) = fake_git(TWO_COMMITS)?;

    let output = isolated_cmd(&path, dir.path())?
        .args(["list", "--json"])
        .output()?;

    assert!(output.status.success());
    let commits: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let commits = commits.as_array().expect("array of commits");
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0]["hash"], "aaa111");
    assert_eq!(commits[1]["tags"], serde_json::json!(["v1.0"]));
    Ok(())
}

#[test]
fn list_reports_git_failure() -> anyhow::Result<()> {
    let (dir, path) = fake_git("#!/usr/bin/env sh\necho 'fatal: not a git repository' >&2\nexit 128\n")?;

    let output = isolated_cmd(&path, dir.path())?.arg("list").output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("git log failed"), "{stderr}");
    assert!(stderr.contains("not a git repository"), "{stderr}");
    Ok(())
}

#[test]
fn picker_requires_a_terminal() -> anyhow::Result<()> {
    let (dir, path) = fake_git(TWO_COMMITS)?;

    let output = isolated_cmd(&path, dir.path())?.output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("needs a terminal"), "{stderr}");
    Ok(())
}

#[test]
fn config_set_then_show() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = std::env::var("PATH").unwrap_or_default();

    isolated_cmd(&path, dir.path())?
        .args(["config", "set", "max_count", "25"])
        .assert()
        .success();

    let output = isolated_cmd(&path, dir.path())?.arg("config").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("max_count = 25"), "{stdout}");

    let output = isolated_cmd(&path, dir.path())?
        .args(["config", "set", "colour", "blue"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(stderr.matches("Unknown config key: colour").count(), 1, "{stderr}");
    assert!(!stderr.contains("parse"), "{stderr}");
    Ok(())
}

#[test]
fn missing_git_is_reported_once() -> anyhow::Result<()> {
    // An empty directory as the whole PATH, so no `git` can be found.
    let dir = tempfile::tempdir()?;
    let path = dir.path().display().to_string();

    let output = isolated_cmd(&path, dir.path())?.arg("list").output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.starts_with("Error: Failed to run git: "), "{stderr}");
    assert_eq!(stderr.matches("Failed to run git").count(), 1, "{stderr}");
    assert_eq!(stderr.matches("os error").count(), 1, "{stderr}");
    Ok(())
}

#[test]
#[serial_test::serial]
fn tui_quits_on_q() -> anyhow::Result<()> {
    let (dir, path) = fake_git(TWO_COMMITS)?;

    // Set env vars for this process so the child inherits them
    let orig_path = std::env::var("PATH").unwrap_or_default();
    let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
    std::env::set_var("PATH", &path);
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let bin = cargo_bin("commit-picker");
    let mut p = spawn(bin.display().to_string().as_str())?;

    // Give program moment then send 'q'
    p.send("q")?;
    let res = p.expect(Eof);

    // Restore
    std::env::set_var("PATH", orig_path);
    match orig_xdg {
        Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    res?;
    Ok(())
}
