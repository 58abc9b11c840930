use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("notion-dbctl").unwrap();
    // Keep the test hermetic: no secrets from the outer environment, and no
    // env file pickup from the repository root.
    cmd.env_remove("NOTION_API_KEY")
        .env_remove("NOTION_PARENT_PAGE_ID")
        .env_remove("NOTION_VERSION");
    cmd
}

#[test]
fn no_arguments_prints_usage() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_prints_usage() {
    cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn create_requires_title_and_properties() {
    cmd()
        .arg("create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TITLE"));

    cmd()
        .args(["create", "Only Title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PROPERTIES"));
}

#[test]
fn delete_requires_database_id() {
    cmd()
        .arg("delete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_ID"));
}

#[test]
fn clear_requires_database_id() {
    cmd()
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_ID"));
}

#[test]
fn missing_api_key_halts_before_subcommand() {
    let td = tempfile::tempdir().unwrap();
    cmd()
        .args(["--env-file"])
        .arg(td.path().join("absent.env"))
        .args(["delete", "db-123"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("NOTION_API_KEY"));
}

#[test]
fn missing_parent_page_id_halts_before_subcommand() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join(".env");
    std::fs::write(&path, "NOTION_API_KEY=secret\n").unwrap();
    cmd()
        .arg("--env-file")
        .arg(&path)
        .args(["search"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("NOTION_PARENT_PAGE_ID"));
}

#[test]
fn help_exits_zero() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("delete"));
}
