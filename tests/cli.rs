use assert_cmd::Command;
use predicates::prelude::*;

fn termforge() -> Command {
    Command::cargo_bin("termforge").unwrap()
}

#[test]
fn unknown_group_fails_before_any_handler() {
    termforge()
        .arg("bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn unknown_subcommand_within_group_fails() {
    termforge()
        .args(["system", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn missing_required_option_fails() {
    termforge()
        .args(["develop", "edit", "main.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--instruction"));
}

#[test]
fn explain_requires_a_query() {
    termforge().arg("explain").assert().failure();
}

#[test]
fn help_lists_all_five_groups() {
    termforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("system")
                .and(predicate::str::contains("develop"))
                .and(predicate::str::contains("operations"))
                .and(predicate::str::contains("package"))
                .and(predicate::str::contains("learn")),
        );
}

#[test]
fn rejects_unknown_ai_model_value() {
    termforge()
        .args(["--ai-model", "gpt", "explain", "pipes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
