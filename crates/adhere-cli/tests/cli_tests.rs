use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn adhere_cmd() -> Command {
    let mut cmd = Command::cargo_bin("adhere").expect("Failed to find adhere binary");
    cmd.arg("--no-color");
    cmd
}

#[test]
fn test_cli_create_plan_success() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    adhere_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "plan",
            "create",
            "1",
            "Take amoxicillin",
            "--duration",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activated plan with ID: 1"))
        .stdout(predicate::str::contains("5 reminder(s) scheduled"))
        .stdout(predicate::str::contains("Take amoxicillin"));
}

#[test]
fn test_cli_create_plan_rejects_negative_duration() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    adhere_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "plan",
            "create",
            "1",
            "Take amoxicillin",
            "--duration=-1",
        ])
        .assert()
        .failure();
}

#[test]
fn test_cli_list_empty_plans() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    adhere_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_list_plans_after_create() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    adhere_cmd()
        .args([
            "--database-file",
            db_arg,
            "plan",
            "create",
            "3",
            "Walk 30 minutes",
            "--frequency",
            "weekly",
        ])
        .assert()
        .success();

    adhere_cmd()
        .args(["--database-file", db_arg, "plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Plans"))
        .stdout(predicate::str::contains("Walk 30 minutes"))
        .stdout(predicate::str::contains("**Patient**: 3"));
}

#[test]
fn test_cli_superseded_plan_hidden_unless_all() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    adhere_cmd()
        .args(["--database-file", db_arg, "plan", "create", "1", "Old action"])
        .assert()
        .success();
    adhere_cmd()
        .args(["--database-file", db_arg, "plan", "create", "1", "New action"])
        .assert()
        .success();

    adhere_cmd()
        .args(["--database-file", db_arg, "plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New action"))
        .stdout(predicate::str::contains("Old action").not());

    adhere_cmd()
        .args(["--database-file", db_arg, "plan", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Old action"));
}

#[test]
fn test_cli_show_missing_plan() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    adhere_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "plan", "show", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan with ID 42 not found."));
}

#[test]
fn test_cli_check_in_reminder() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    adhere_cmd()
        .args([
            "--database-file",
            db_arg,
            "plan",
            "create",
            "1",
            "Take amoxicillin",
            "--start-date",
            "2024-01-01",
            "--duration",
            "3",
        ])
        .assert()
        .success();

    // First reminder of the first plan gets ID 1.
    adhere_cmd()
        .args(["--database-file", db_arg, "reminder", "check-in", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in reminder 1 (day 1)."));

    // A repeated check-in is rejected without failing the command.
    adhere_cmd()
        .args(["--database-file", db_arg, "reminder", "check-in", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already checked in"));
}

#[test]
fn test_cli_list_reminders_unknown_plan_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    adhere_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "reminder",
            "list",
            "99",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("99"));
}

#[test]
fn test_cli_extract_creates_plans() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let payload = r#"Here is the structured output:
    {"checklist_items": [{"task": "Book follow-up"}],
     "action_plans": [{"action": "Take amoxicillin", "frequency": "DAILY", "duration_days": 4}]}"#;

    adhere_cmd()
        .args([
            "--database-file",
            db_arg,
            "extract",
            "1",
            "--start-date",
            "2024-01-01",
        ])
        .write_stdin(payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("Book follow-up"))
        .stdout(predicate::str::contains("4 reminder(s) scheduled"));
}

#[test]
fn test_cli_run_once_sweeps() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    adhere_cmd()
        .args([
            "--database-file",
            db_arg,
            "plan",
            "create",
            "1",
            "Take amoxicillin",
            "--start-date",
            "2020-01-01",
            "--duration",
            "2",
        ])
        .assert()
        .success();

    adhere_cmd()
        .args(["--database-file", db_arg, "run", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Re-dispatched 2 due reminder(s)."));
}

#[test]
fn test_cli_invalid_frequency_rejected() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    adhere_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "plan",
            "create",
            "1",
            "Take amoxicillin",
            "--frequency",
            "hourly",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
