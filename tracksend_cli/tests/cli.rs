use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tracksend(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    // Keep config, preferences, and the hand-off manifest inside the test dir
    cmd.env("XDG_CONFIG_HOME", temp_dir.path())
        .env("XDG_DATA_HOME", temp_dir.path());
    cmd
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("tracksend"));
}

#[test]
fn test_send_requires_terminal() {
    let temp_dir = TempDir::new().unwrap();
    tracksend(&temp_dir)
        .args(["send", "7", "--drive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

#[test]
fn test_share_requires_terminal() {
    let temp_dir = TempDir::new().unwrap();
    tracksend(&temp_dir)
        .args(["share", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

#[test]
fn test_send_rejects_share_with_sync() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.args(["send", "7", "--drive", "--drive-share", "--enable-sync"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_drive_share_needs_drive() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.args(["send", "7", "--drive-share"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--drive"));
}

#[test]
fn test_maps_share_needs_maps() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.args(["send", "7", "--maps-share"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--maps"));
}

#[test]
fn test_resume_needs_state_file() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.args(["send", "--resume"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--state"));
}

#[test]
fn test_resume_conflicts_with_destinations() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.args(["send", "--resume", "--state", "flow.json", "--drive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_send_requires_track_id() {
    let mut cmd = Command::cargo_bin("tracksend").unwrap();
    cmd.args(["send", "--drive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRACK_ID"));
}

#[test]
fn test_prefs_set_get_round_trip() {
    let temp_dir = TempDir::new().unwrap();

    tracksend(&temp_dir)
        .args(["prefs", "set", "share_target", "maps"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Set share_target = maps"));

    tracksend(&temp_dir)
        .args(["prefs", "get", "share_target"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maps"));
}

#[test]
fn test_prefs_get_unset_key_fails() {
    let temp_dir = TempDir::new().unwrap();
    tracksend(&temp_dir)
        .args(["prefs", "get", "never_written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn test_prefs_list_shows_values() {
    let temp_dir = TempDir::new().unwrap();

    tracksend(&temp_dir)
        .args(["prefs", "set", "default_table_public", "false"])
        .assert()
        .success();

    tracksend(&temp_dir)
        .args(["prefs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_table_public = false"));
}

#[test]
fn test_config_list_shows_flow_defaults() {
    let temp_dir = TempDir::new().unwrap();
    tracksend(&temp_dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("master_sync = leave-untouched"));
}

#[test]
fn test_config_set_and_get_policy() {
    let temp_dir = TempDir::new().unwrap();

    tracksend(&temp_dir)
        .args(["config", "set", "flow.master_sync", "force-enable"])
        .assert()
        .success();

    tracksend(&temp_dir)
        .args(["config", "get", "flow.master_sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("force-enable"));
}

#[test]
fn test_config_set_rejects_bad_policy() {
    let temp_dir = TempDir::new().unwrap();
    tracksend(&temp_dir)
        .args(["config", "set", "flow.master_sync", "perhaps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("master_sync"));
}

#[test]
fn test_config_path_points_into_config_home() {
    let temp_dir = TempDir::new().unwrap();
    tracksend(&temp_dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tracksend"));
}
