//! End-to-end tests of the `pake_build` binary.
//!
//! The packaging tool is replaced by a shell script named `cli.js`, run with
//! `--node sh`, that records its arguments and writes a fake package.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

/// Writes a fake pake-cli into `<root>/node_modules/pake-cli`.
fn fake_tool(root: &Path, script: &str) -> PathBuf {
    let tool = root.join("node_modules/pake-cli");
    std::fs::create_dir_all(&tool).unwrap();
    std::fs::write(tool.join("cli.js"), script).unwrap();
    tool
}

const SUCCEEDING_TOOL: &str = r#"
echo "$@" > args.txt
echo pkg > "$NAME.deb"
mkdir -p dist
echo extra > dist/extra.txt
"#;

fn pake_build(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pake_build").unwrap();
    cmd.env_clear()
        .env("PATH", std::env::var_os("PATH").unwrap_or_default())
        .current_dir(root)
        .args(["--node", "sh", "--tool-dir"])
        .arg(root.join("node_modules/pake-cli"));
    cmd
}

#[test]
fn missing_required_parameters_fail_without_side_effects() {
    let root = tempfile::tempdir().unwrap();
    let tool = fake_tool(root.path(), SUCCEEDING_TOOL);

    pake_build(root.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL and NAME required but not set"));

    assert!(!tool.join("args.txt").exists());
    assert!(!tool.join("output").exists());
}

#[test]
fn missing_tool_directory_fails() {
    let root = tempfile::tempdir().unwrap();

    pake_build(root.path())
        .env("URL", "https://example.com")
        .env("NAME", "MyApp")
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory not found"));
}

#[cfg(target_os = "linux")]
#[test]
fn linux_build_collects_artifacts() {
    let root = tempfile::tempdir().unwrap();
    let tool = fake_tool(root.path(), SUCCEEDING_TOOL);

    pake_build(root.path())
        .env("URL", "https://example.com")
        .env("NAME", "MyApp")
        .env("MULTI_ARCH", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build completed successfully!"))
        .stdout(predicate::str::contains("MyApp.deb"));

    let args = std::fs::read_to_string(tool.join("args.txt")).unwrap();
    assert_eq!(
        args.trim(),
        "https://example.com --name MyApp --height 780 --width 1200 --show-system-tray"
    );
    assert!(tool.join("output/MyApp.deb").is_file());
    assert!(tool.join("output/extra.txt").is_file());
    assert!(!tool.join("MyApp.deb").exists());
    assert!(root.path().join("output").is_dir());
}

#[cfg(unix)]
#[test]
fn redirected_output_has_no_color_codes() {
    let root = tempfile::tempdir().unwrap();
    fake_tool(root.path(), SUCCEEDING_TOOL);

    pake_build(root.path())
        .env("URL", "https://example.com")
        .env("NAME", "MyApp")
        .env("TERM", "xterm-256color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build completed successfully!"))
        .stdout(predicate::str::contains("\x1b[").not());

    pake_build(root.path())
        .env("TERM", "xterm-256color")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build failed: URL and NAME required"))
        .stderr(predicate::str::contains("\x1b[").not());
}

#[cfg(target_os = "linux")]
#[test]
fn unreachable_icon_does_not_stop_the_build() {
    let root = tempfile::tempdir().unwrap();
    let tool = fake_tool(root.path(), SUCCEEDING_TOOL);

    // Bind and drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    pake_build(root.path())
        .env("URL", "https://example.com")
        .env("NAME", "MyApp")
        .env("ICON", format!("http://127.0.0.1:{port}/icon.png"))
        .args(["--icon-timeout-ms", "2000"])
        .assert()
        .success();

    let args = std::fs::read_to_string(tool.join("args.txt")).unwrap();
    assert!(!args.contains("--icon"));
    assert!(!tool.join("icon.png").exists());
    assert!(tool.join("output/MyApp.deb").is_file());
}

#[cfg(unix)]
#[test]
fn failing_tool_exits_non_zero_without_collecting() {
    let root = tempfile::tempdir().unwrap();
    let tool = fake_tool(
        root.path(),
        r#"
echo pkg > "$NAME.deb"
exit 4
"#,
    );

    pake_build(root.path())
        .env("URL", "https://example.com")
        .env("NAME", "MyApp")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Final build parameters: sh cli.js https://example.com --name MyApp",
        ))
        .stderr(predicate::str::contains("Build failed with code 4"));

    assert!(tool.join("MyApp.deb").exists());
    assert!(!tool.join("output/MyApp.deb").exists());
}

#[cfg(unix)]
#[test]
fn tool_without_artifacts_is_collection_failure() {
    let root = tempfile::tempdir().unwrap();
    fake_tool(root.path(), "exit 0\n");

    pake_build(root.path())
        .env("URL", "https://example.com")
        .env("NAME", "MyApp")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to move built files to output directory",
        ));
}

#[test]
fn zero_icon_timeout_is_rejected() {
    let root = tempfile::tempdir().unwrap();

    pake_build(root.path())
        .args(["--icon-timeout-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid arguments"));
}
