//! Integration tests for inspector-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use inspector_core::test_utils::create_test_gem;
use inspector_core::test_utils::create_test_tar_gz;
use inspector_core::test_utils::create_test_zip;
use predicates::prelude::*;
use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::path::PathBuf;
use tempfile::TempDir;

fn inspector_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("inspector");
    for var in [
        "RUST_LOG",
        "HTTP_PROXY",
        "HTTPS_PROXY",
        "ALL_PROXY",
        "http_proxy",
        "https_proxy",
        "all_proxy",
        "INSPECTOR_REGISTRY_URL",
        "INSPECTOR_DOWNLOAD_URL",
        "INSPECTOR_ENTROPY_THRESHOLD",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_fixture(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, data).expect("failed to write fixture");
    path
}

fn demo_gem(dir: &TempDir) -> PathBuf {
    let gem = create_test_gem(
        b"--- !ruby/object:Gem::Specification\nname: demo\n",
        vec![
            ("lib/demo.rb", b"module Demo\n  VERSION = '1.0'\nend\n"),
            ("lib/demo/cache.pyc", b"\x42\x0d\x0d\x0a\x00\x00\x00\x00"),
        ],
    );
    write_fixture(dir, "demo-1.0.gem", &gem)
}

/// Answers every request with the same JSON body until the test exits.
fn serve_json(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let addr = listener.local_addr().expect("no local address");

    std::thread::spawn(move || {
        for mut socket in listener.incoming().flatten() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}")
}

const RELEASES: &str = r#"[
    {"number": "1.0", "platform": "ruby"},
    {"number": "1.0", "platform": "java"},
    {"number": "0.9", "platform": "ruby"}
]"#;

#[test]
fn test_version_flag() {
    inspector_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspector"));
}

#[test]
fn test_help_flag() {
    inspector_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspecting published package"))
        .stdout(predicate::str::contains("inspect-file"));
}

#[test]
fn test_inspect_file_lists_gem() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let gem = demo_gem(&temp);

    inspector_cmd()
        .arg("inspect-file")
        .arg(&gem)
        .assert()
        .success()
        .stdout(predicate::str::contains("demo-1.0.gem (nested-tar"))
        .stdout(predicate::str::contains("metadata.gz"))
        .stdout(predicate::str::contains("data.tar.gz/lib/demo.rb"));
}

#[test]
fn test_inspect_file_quiet_listing_has_no_header() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let gem = demo_gem(&temp);

    inspector_cmd()
        .arg("--quiet")
        .arg("inspect-file")
        .arg(&gem)
        .assert()
        .success()
        .stdout(predicate::str::contains("nested-tar").not())
        .stdout(predicate::str::contains("data.tar.gz/lib/demo.rb"));
}

#[test]
fn test_inspect_file_shows_findings_and_text() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let gem = demo_gem(&temp);

    inspector_cmd()
        .arg("inspect-file")
        .arg(&gem)
        .arg("data.tar.gz/lib/demo.rb")
        .assert()
        .success()
        .stdout(predicate::str::contains("SHA-256: "))
        .stdout(predicate::str::contains("Entropy: "))
        .stdout(predicate::str::contains("VERSION = '1.0'"));
}

#[test]
fn test_inspect_file_flags_compiled_bytecode() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let gem = demo_gem(&temp);

    inspector_cmd()
        .arg("inspect-file")
        .arg(&gem)
        .arg("data.tar.gz/lib/demo/cache.pyc")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled Python Bytecode"));
}

#[test]
fn test_inspect_file_ungzips_metadata() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let gem = demo_gem(&temp);

    inspector_cmd()
        .arg("inspect-file")
        .arg(&gem)
        .arg("metadata.gz")
        .assert()
        .success()
        .stdout(predicate::str::contains("name: demo"));
}

#[test]
fn test_inspect_file_high_entropy() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let noise: Vec<u8> = (0..4096u32).map(|i| (i % 256) as u8).collect();
    let zip = write_fixture(&temp, "blob.zip", &create_test_zip(vec![("blob.bin", &noise)]));

    inspector_cmd()
        .arg("inspect-file")
        .arg(&zip)
        .arg("blob.bin")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entropy: 8.0 (HIGH)"))
        .stdout(predicate::str::contains("Binary files are not supported."));
}

#[test]
fn test_inspect_file_entropy_threshold_flag() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let half: Vec<u8> = (0..4096u32).map(|i| (i % 16) as u8).collect();
    let archive = write_fixture(
        &temp,
        "pkg-1.0.tar.gz",
        &create_test_tar_gz(vec![("pkg/data.bin", &half)]),
    );

    inspector_cmd()
        .args(["--entropy-threshold", "3.5", "inspect-file"])
        .arg(&archive)
        .arg("pkg/data.bin")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entropy: 4.0 (HIGH)"));

    inspector_cmd()
        .arg("inspect-file")
        .arg(&archive)
        .arg("pkg/data.bin")
        .assert()
        .success()
        .stdout(predicate::str::contains("(HIGH)").not());
}

#[test]
fn test_inspect_file_json_listing() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = write_fixture(
        &temp,
        "pkg-1.0.tar.gz",
        &create_test_tar_gz(vec![("pkg/setup.py", b"print('hi')\n"), ("pkg/README", b"hi")]),
    );

    let output = inspector_cmd()
        .arg("--json")
        .arg("inspect-file")
        .arg(&archive)
        .output()
        .expect("failed to run inspector");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["format"], "tar.gz");
    assert_eq!(json["data"]["entries"][0], "pkg/setup.py");
    assert_eq!(json["data"]["entries"][1], "pkg/README");
}

#[test]
fn test_inspect_file_json_findings() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let zip = write_fixture(&temp, "w.whl", &create_test_zip(vec![("a.py", b"x = 1\n")]));

    let output = inspector_cmd()
        .arg("--json")
        .arg("inspect-file")
        .arg(&zip)
        .arg("a.py")
        .output()
        .expect("failed to run inspector");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "inspect-file");
    let findings = json["data"]["findings"].as_array().unwrap();
    assert_eq!(findings[0]["label"], "SHA-256");
    assert_eq!(findings[1]["label"], "Entropy");
    assert_eq!(json["data"]["contents"]["kind"], "text");
    assert_eq!(json["data"]["contents"]["syntax"], "py");
}

#[test]
fn test_inspect_file_unsupported_format() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let path = write_fixture(&temp, "archive.rar", b"Rar!\x1a\x07\x00");

    inspector_cmd()
        .arg("inspect-file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn test_inspect_file_missing_entry() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let gem = demo_gem(&temp);

    inspector_cmd()
        .arg("inspect-file")
        .arg(&gem)
        .arg("data.tar.gz/lib/missing.rb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in demo-1.0.gem"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_inspect_file_corrupt_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let path = write_fixture(&temp, "broken.zip", b"PK\x03\x04 not really a zip");

    inspector_cmd()
        .arg("inspect-file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid archive broken.zip"));
}

#[test]
fn test_inspect_file_json_error() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let missing = temp.path().join("absent.gem");

    let output = inspector_cmd()
        .arg("--json")
        .arg("inspect-file")
        .arg(&missing)
        .output()
        .expect("failed to run inspector");
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "inspect-file");
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("absent.gem"));
}

#[test]
fn test_show_refuses_compiled_files() {
    inspector_cmd()
        .args(["show", "demo", "1.0", "lib/demo/cache.pyc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("compiled bytecode"))
        .stderr(predicate::str::contains("inspector decompile"));
}

#[test]
fn test_versions_unreachable_registry() {
    inspector_cmd()
        .args(["--registry-url", "http://127.0.0.1:9", "--timeout", "5"])
        .args(["versions", "rake"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Upstream unavailable"));
}

#[test]
fn test_invalid_entropy_threshold() {
    inspector_cmd()
        .args(["--entropy-threshold", "9", "versions", "rake"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 8"));
}

#[test]
fn test_completion_bash() {
    inspector_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inspector"));
}

#[test]
fn test_distributions_lists_platform_builds() {
    let registry = serve_json(RELEASES);

    inspector_cmd()
        .args(["--registry-url", &registry])
        .args(["--download-url", "https://dl.example"])
        .args(["distributions", "demo", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo 1.0 (2 distributions)"))
        .stdout(predicate::str::contains("demo-1.0.gem"))
        .stdout(predicate::str::contains("demo-1.0-java.gem"));
}

#[test]
fn test_distributions_json_carries_download_urls() {
    let registry = serve_json(RELEASES);

    let output = inspector_cmd()
        .args(["--json", "--registry-url", &registry])
        .args(["--download-url", "https://dl.example"])
        .args(["distributions", "demo", "1.0"])
        .output()
        .expect("failed to run inspector");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let builds = json["data"]["distributions"].as_array().unwrap();
    assert_eq!(builds.len(), 2);
    assert_eq!(builds[0]["platform"], "ruby");
    assert_eq!(builds[0]["url"], "https://dl.example/gems/demo-1.0.gem");
    assert_eq!(builds[1]["filename"], "demo-1.0-java.gem");
}

#[test]
fn test_distributions_unknown_version() {
    let registry = serve_json(RELEASES);

    inspector_cmd()
        .args(["--registry-url", &registry])
        .args(["distributions", "demo", "2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Release 2.0 of 'demo' not found"));
}
