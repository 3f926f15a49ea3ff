//! End-to-end runs of the `snow-genius` binary that never reach the network.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::process::{Command, Output};

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;

const CATALOG_JSON: &str = r#"[
    {"id": "loon", "name": "Loon Mountain", "state": "NH"},
    {"id": "stowe", "name": "Stowe", "state": "VT"}
]"#;

#[fixture]
fn workdir() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("resorts.json"), CATALOG_JSON).expect("write catalog");
    dir
}

fn run(workdir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snow-genius"))
        .current_dir(workdir.path())
        .env_remove("SNOW_GENIUS_MODE")
        .env_remove("SNOW_GENIUS_TIMEOUT_SECS")
        .env_remove("SNOW_GENIUS_CATALOG")
        .env_remove("SNOW_GENIUS_DEV_MODE")
        .env_remove("API_URL")
        .env_remove("API_BASE")
        .args(args)
        .output()
        .expect("binary runs")
}

#[rstest]
fn dry_run_prints_the_payload(workdir: TempDir) {
    let output = run(
        &workdir,
        &[
            "score",
            "--rider",
            "35:nurse",
            "--resort",
            "Stowe:2:no-blackouts",
            "--mode",
            "single",
            "--dry-run",
        ],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr={stderr}");
    let payload: Value = serde_json::from_slice(&output.stdout).expect("payload JSON");
    assert_eq!(
        payload,
        json!({
            "riders": [{"age": 35, "category": "Nurse"}],
            "resort_plan": [{"resort_id": "stowe", "days": 2, "blackout_ok": false}]
        })
    );
}

#[rstest]
fn resorts_lists_catalog_suggestions(workdir: TempDir) {
    let output = run(&workdir, &["resorts", "loo"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr={stderr}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Loon Mountain, N.H.\tloon\n"
    );
}

#[rstest]
fn invalid_forms_exit_non_zero(workdir: TempDir) {
    let output = run(&workdir, &["score", "--rider", "35", "--dry-run"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Add at least one resort."));
}
