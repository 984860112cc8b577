//! Cassette-driven runs of the full mourning pipeline.
//!
//! Each test records the clock, git and llm traffic a run needs with
//! `CassetteRecorder`, then replays it so dates and narratives are fixed.

use std::path::Path;
use std::process::Command;

use chrono::NaiveDate;
use serde_json::json;

use code_obituary::cassette::recorder::CassetteRecorder;
use code_obituary::config::Config;
use code_obituary::context::ServiceContext;
use code_obituary::graveyard::Graveyard;
use code_obituary::mourn::{mourn, mourn_staged, MournRequest};
use code_obituary::obituary::ComposeMode;

const OAUTH: &str = "import requests\n\n\
def get_oauth_token(consumer_key, consumer_secret):\n    pass\n\n\
class TwitterClient:\n    pass\n";

fn record_deleted_file(recorder: &mut CassetteRecorder, content: &str) {
    recorder.record(
        "git",
        "read_at_revision",
        json!({"path": "auth/legacy_oauth.py", "revision": "HEAD"}),
        json!({"ok": content}),
    );
    recorder.record(
        "git",
        "lifecycle",
        json!({"path": "auth/legacy_oauth.py"}),
        json!({"ok": {"born": "2022-03-14", "deleted": "2024-11-01"}}),
    );
}

#[tokio::test]
async fn generated_obituary_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("generated.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "generated");
    record_deleted_file(&mut recorder, OAUTH);
    recorder.record(
        "llm",
        "complete",
        json!({"model": "claude-sonnet-4-20250514"}),
        json!({"ok": {
            "text": "Here lies legacy_oauth.py, who spoke OAuth 1.0a for 963 days. It is survived by oauth2_client.py.",
            "prompt_tokens": 412,
            "completion_tokens": 38
        }}),
    );
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(Config::default(), &cassette).unwrap();
    let request = MournRequest {
        path: "auth/legacy_oauth.py".into(),
        reason: Some("Twitter API v1 deprecated".into()),
        from_git: true,
    };
    let mourned = mourn(&ctx, dir.path(), &request).await.unwrap();

    assert_eq!(mourned.mode, ComposeMode::Generated);
    assert_eq!(mourned.record.lifespan_days(), Some(963));
    assert_eq!(mourned.record.survivors, vec!["oauth2_client.py"]);

    let records = Graveyard::new(ctx.fs.as_ref(), dir.path()).read_all().unwrap();
    assert_eq!(records, vec![mourned.record]);
}

#[tokio::test]
async fn failed_generation_falls_back_to_template() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("fallback.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "fallback");
    record_deleted_file(&mut recorder, OAUTH);
    recorder.record("llm", "complete", json!({}), json!({"err": "request failed: timed out"}));
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(Config::default(), &cassette).unwrap();
    let request = MournRequest {
        path: dir.path().join("auth/legacy_oauth.py"),
        reason: Some("Twitter API v1 deprecated".into()),
        from_git: false,
    };
    let mourned = mourn(&ctx, dir.path(), &request).await.unwrap();

    assert!(matches!(mourned.mode, ComposeMode::Fallback { .. }));
    let narrative = &mourned.record.narrative;
    assert!(narrative.starts_with("auth/legacy_oauth.py was a Python module"));
    assert!(narrative.contains("963 days"));
    assert!(narrative.contains("Twitter API v1 deprecated"));
    assert!(narrative.contains("`get_oauth_token`"));
}

#[tokio::test]
async fn uncommitted_deletion_dies_today() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("today.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "today");
    recorder.record("git", "read_at_revision", json!({}), json!({"ok": "echo hi\n"}));
    recorder.record("git", "lifecycle", json!({}), json!({"ok": {"born": "2023-01-01", "deleted": null}}));
    recorder.record("clock", "now", json!({}), json!("2024-11-01T10:30:00Z"));
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(Config::default(), &cassette).unwrap();
    let request = MournRequest { path: "deploy.sh".into(), reason: None, from_git: true };
    let mourned = mourn(&ctx, dir.path(), &request).await.unwrap();

    assert_eq!(mourned.mode, ComposeMode::Template);
    assert!(mourned.entry.contains("**Lived:** 2023-01-01 — 2024-11-01\n"));
    assert!(mourned.entry.contains("**Cause of death:** Deleted (cause unknown)\n"));
}

#[tokio::test]
async fn staged_deletions_are_all_mourned() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("staged.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "staged");
    recorder.record("git", "list_staged_deletions", json!({}), json!({"ok": ["a.rs", "b.go"]}));
    recorder.record("git", "read_at_revision", json!({"path": "a.rs"}), json!({"ok": "fn alpha() {}\n"}));
    recorder.record("git", "read_at_revision", json!({"path": "b.go"}), json!({"ok": "func Beta() {}\n"}));
    // An older deletion in history belongs to a previous life of the path.
    for _ in 0..2 {
        recorder.record("git", "lifecycle", json!({}), json!({"ok": {"born": null, "deleted": "2019-05-05"}}));
        recorder.record("clock", "now", json!({}), json!("2024-11-01T10:30:00Z"));
    }
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(Config::default(), &cassette).unwrap();
    let report = mourn_staged(&ctx, dir.path()).await.unwrap();

    assert!(report.failures.is_empty());
    let records = Graveyard::new(ctx.fs.as_ref(), dir.path()).read_all().unwrap();
    let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, ["a.rs", "b.go"]);
    assert!(records.iter().all(|r| r.died == NaiveDate::from_ymd_opt(2024, 11, 1)));
}

#[test]
fn binary_honors_replay_cassette() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("cli.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "cli");
    recorder.record("git", "list_staged_deletions", json!({}), json!({"ok": ["auth/legacy_oauth.py"]}));
    record_deleted_file(&mut recorder, OAUTH);
    recorder.record("clock", "now", json!({}), json!("2024-11-01T10:30:00Z"));
    recorder.finish().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_code-obituary"))
        .args(["mourn-staged", "--repo-root"])
        .arg(dir.path())
        .current_dir(dir.path())
        .env("OBITUARY_REPLAY", &cassette)
        .env_remove("ANTHROPIC_API_KEY")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Mourned auth/legacy_oauth.py"));
    let log = std::fs::read_to_string(Path::new(dir.path()).join("GRAVEYARD.md")).unwrap();
    assert!(log.contains("## auth/legacy_oauth.py\n**Lived:** 2022-03-14 — 2024-11-01\n"));
}
