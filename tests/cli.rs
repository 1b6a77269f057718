//! Runs the `terreplus` binary end to end with scripted stdin.

use assert_cmd::{Command, cargo};
use predicates::str;
use std::path::PathBuf;
use tempfile::TempDir;

/// A config that keeps the session token inside `dir` and never reaches
/// the real backend.
fn write_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    let contents = format!(
        "api_url = \"http://127.0.0.1:9\"\ntoken_path = {:?}\n",
        dir.path().join("token")
    );
    std::fs::write(&path, contents).unwrap();
    path
}

fn terreplus(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!());
    cmd.env_remove("TERREPLUS_API_URL")
        .arg("--config")
        .arg(write_config(dir));
    cmd
}

#[test]
fn test_usage_without_command() {
    Command::new(cargo::cargo_bin!())
        .assert()
        .failure()
        .code(2)
        .stdout(str::is_empty())
        .stderr(str::contains("Usage: terreplus [OPTIONS] <COMMAND>"));
}

#[test]
fn test_draw_square_from_stdin() {
    let dir = TempDir::new().unwrap();
    terreplus(&dir)
        .arg("draw")
        .write_stdin("0,0\n0,10\n10,10\n10,0\ndone\n")
        .assert()
        .success()
        .stdout(str::contains("Center: Lat: 5.0000, Lng: 5.0000"))
        .stdout(str::contains("\"type\": \"Polygon\""))
        .stdout(str::contains("Area:"));
}

#[test]
fn test_draw_blocks_two_points_then_accepts_third() {
    let dir = TempDir::new().unwrap();
    terreplus(&dir)
        .arg("draw")
        .write_stdin("0,0\n0,1\ndone\n1,1\ndone\n")
        .assert()
        .success()
        .stdout(str::contains("at least 3 points"))
        .stdout(str::contains("\"type\": \"Polygon\""));
}

#[test]
fn test_draw_cancelled() {
    let dir = TempDir::new().unwrap();
    terreplus(&dir)
        .arg("draw")
        .write_stdin("1,1\ncancel\n")
        .assert()
        .success()
        .stdout(str::contains("Cancelled."));
}

#[test]
fn test_register_with_two_points_fails_before_any_request() {
    let dir = TempDir::new().unwrap();
    terreplus(&dir)
        .args([
            "register",
            "--soil",
            "franco",
            "--road-km",
            "1",
            "--point=1,1",
            "--point=1,2",
        ])
        .assert()
        .failure()
        .stderr(str::contains("at least 3 points"));
}

#[test]
fn test_point_out_of_range_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    terreplus(&dir)
        .args(["draw", "--near=95,400"])
        .assert()
        .failure()
        .code(2)
        .stderr(str::contains("latitude"));
}
