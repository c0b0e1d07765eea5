use assert_cmd::Command;
use predicates::prelude::*;

fn pulse() -> Command {
    let mut cmd = Command::cargo_bin("pulse").unwrap();
    // Keep ambient configuration out of the tests.
    for var in [
        "PULSE_STORE_ROOT",
        "PULSE_SECRET_ID",
        "PULSE_BUCKET",
        "PULSE_LIST_KEY",
        "PULSE_PREFIX",
        "PULSE_CONCURRENCY",
        "PULSE_API_BASE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    pulse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("repos"))
        .stdout(predicate::str::contains("schema"));
}

#[test]
fn schema_prints_catalog_columns() {
    pulse()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("repoName"))
        .stdout(predicate::str::contains("averageTimeToMergePR"))
        .stdout(predicate::str::contains("date"));
}

#[test]
fn run_without_configuration_exits_with_config_code() {
    pulse().arg("run").assert().failure().code(2);
}

#[test]
fn run_with_missing_secret_exits_with_auth_code() {
    let dir = tempfile::tempdir().unwrap();
    pulse()
        .arg("run")
        .arg("--store-root")
        .arg(dir.path())
        .arg("--secret-id")
        .arg("PULSE_CLI_TEST_UNSET_SECRET")
        .arg("--bucket")
        .arg("bucket")
        .assert()
        .failure()
        .code(3);
}

#[test]
fn repos_falls_back_to_default_list() {
    let dir = tempfile::tempdir().unwrap();
    pulse()
        .arg("repos")
        .arg("--store-root")
        .arg(dir.path())
        .arg("--bucket")
        .arg("bucket")
        .assert()
        .success()
        .stdout(predicate::str::contains("aws-samples/anthropic-on-aws"));
}

#[test]
fn repos_prints_configured_list() {
    let dir = tempfile::tempdir().unwrap();
    let list_dir = dir.path().join("bucket/config");
    std::fs::create_dir_all(&list_dir).unwrap();
    std::fs::write(
        list_dir.join("repositories.json"),
        r#"[{"owner": "rust-lang", "repo": "rust"}]"#,
    )
    .unwrap();

    pulse()
        .arg("repos")
        .arg("--store-root")
        .arg(dir.path())
        .arg("--bucket")
        .arg("bucket")
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-lang/rust"));
}
