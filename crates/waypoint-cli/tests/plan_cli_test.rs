//! End-to-end tests for the `waypoint` binary that need no database.
//!
//! Each test runs the built binary with an isolated config directory and no
//! API key, so plans always come from the template fallback.

use std::process::{Command, Output};

use tempfile::TempDir;

fn waypoint(config_home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_waypoint"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("RUST_LOG", "warn")
        .env_remove("GEMINI_API_KEY")
        .env_remove("GENAI_MODEL")
        .env_remove("GENAI_BASE_URL")
        .env_remove("GENAI_TIMEOUT_SECS")
        .env_remove("WAYPOINT_DATABASE_URL")
        .output()
        .expect("failed to run waypoint binary")
}

#[test]
fn plan_without_saving_prints_fallback_roadmap() {
    let home = TempDir::new().unwrap();
    let out = waypoint(
        &home,
        &[
            "plan",
            "Frontend Developer",
            "--target-date",
            "2099-01-01",
            "--hours-per-week",
            "10",
            "--no-save",
        ],
    );
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(json["source"], "fallback");
    assert!(json.get("goal_id").is_none(), "nothing was stored");
    let milestones = json["milestones"].as_array().unwrap();
    assert_eq!(milestones.len(), 4);
    assert_eq!(
        milestones[0]["title"],
        "Milestone 1: HTML, CSS & responsive design"
    );
    assert_eq!(milestones[0]["tasks"].as_array().unwrap().len(), 2);

    let weeks = json["weeks_available"].as_u64().unwrap();
    assert_eq!(json["achievable_hours"].as_f64().unwrap(), weeks as f64 * 10.0);
}

#[test]
fn plan_rejects_bad_date() {
    let home = TempDir::new().unwrap();
    let out = waypoint(
        &home,
        &["plan", "Learn Rust", "--target-date", "someday", "--no-save"],
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid targetDate"), "stderr: {stderr}");
}

#[test]
fn plan_rejects_blank_title() {
    let home = TempDir::new().unwrap();
    let out = waypoint(
        &home,
        &["plan", "  ", "--target-date", "2099-01-01", "--no-save"],
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("title and targetDate required"), "stderr: {stderr}");
}

#[test]
fn init_writes_config_once() {
    let home = TempDir::new().unwrap();
    let out = waypoint(&home, &["init", "--db-url", "postgresql://db:5432/roadmaps"]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let path = home.path().join("waypoint").join("config.toml");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("postgresql://db:5432/roadmaps"), "got: {contents}");

    let again = waypoint(&home, &["init"]);
    assert!(!again.status.success(), "second init without --force must fail");
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    let forced = waypoint(&home, &["init", "--force"]);
    assert!(forced.status.success());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("postgresql://localhost:5432/waypoint"));
}
