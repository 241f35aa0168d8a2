use std::path::Path;

use assert_cmd::Command;
use assert_fs::prelude::*;
use bookkeeping_core::ledger::Transaction;
use chrono::Local;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;

fn run_script(home: &Path, script: &str) -> String {
    let output = Command::cargo_bin("bookkeeping_cli")
        .expect("binary built")
        .env("BOOKKEEPING_HOME", home)
        .env("BOOKKEEPING_CLI_SCRIPT", "1")
        .env("NO_COLOR", "1")
        .write_stdin(script.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("utf-8 output")
}

fn recorded_ids(stdout: &str) -> Vec<String> {
    let pattern = Regex::new(r"Recorded (?:income|expense) \S+ .+ \((\d{13}[0-9a-z]{9})\)")
        .expect("valid regex");
    pattern
        .captures_iter(stdout)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[test]
fn records_and_summarises_transactions() {
    let home = assert_fs::TempDir::new().unwrap();
    let stdout = run_script(
        home.path(),
        "add income 100 salary \"monthly salary\"\n\
         add expense 30 dining lunch --tag work\n\
         list\n\
         dashboard\n\
         exit\n",
    );

    let ids = recorded_ids(&stdout);
    assert_eq!(ids.len(), 2, "stdout was: {stdout}");
    assert_ne!(ids[0], ids[1]);
    assert!(stdout.contains("2 record(s)  income ¥100.00  expense ¥30.00  balance ¥70.00"));
    assert!(stdout.contains("Balance  ¥70.00"), "stdout was: {stdout}");

    let stored = home.child("store/transactions.json");
    stored.assert(predicates::path::exists());
    let raw = std::fs::read_to_string(stored.path()).unwrap();
    let txns: Vec<Transaction> = serde_json::from_str(&raw).unwrap();
    assert_eq!(txns[0].description, "lunch");
    assert_eq!(txns[0].category, "🍽️");
    assert_eq!(txns[0].tags, Some(vec!["work".to_string()]));
    assert_eq!(txns[1].category, "💼");
}

#[test]
fn rejects_invalid_input_without_recording() {
    let home = assert_fs::TempDir::new().unwrap();
    let stdout = run_script(
        home.path(),
        "add expense -5 dining snack\n\
         add expense 5 salary snack\n\
         add expense 5 dining\n\
         add expense 5 dining \"   \"\n\
         list\n",
    );
    assert!(stdout.contains("amount must be a positive number"));
    assert!(stdout.contains("is an income category"));
    assert!(stdout.contains("usage: add"));
    assert!(stdout.contains("description is required"));
    assert!(stdout.contains("No transactions yet."));
    assert!(recorded_ids(&stdout).is_empty());
}

#[test]
fn delete_and_clear_require_confirmation_in_scripts() {
    let home = assert_fs::TempDir::new().unwrap();
    let first = run_script(
        home.path(),
        "add expense 12.5 transport bus\nadd income 50 investment dividend\n",
    );
    let ids = recorded_ids(&first);
    assert_eq!(ids.len(), 2);

    let second = run_script(
        home.path(),
        &format!(
            "delete {id}\ndelete {id} --yes\ndelete {id} --yes\nlist\n",
            id = ids[0]
        ),
    );
    assert!(second.contains("Pass `--yes` to confirm."));
    assert!(second.contains(&format!("Deleted transaction {}", ids[0])));
    assert!(second.contains(&format!("No transaction with id `{}`", ids[0])));
    assert!(second.contains("1 record(s)"));

    let third = run_script(home.path(), "clear\nlist\nclear --yes\nlist\n");
    assert!(third.contains("Nothing cleared."));
    assert!(third.contains("All data cleared."));
    assert!(third.contains("No transactions yet."));
    home.child("store/transactions.json")
        .assert(predicates::path::missing());
}

#[test]
fn exports_dated_json_file() {
    let home = assert_fs::TempDir::new().unwrap();
    let target = assert_fs::TempDir::new().unwrap();
    let stdout = run_script(
        home.path(),
        &format!(
            "add expense 8 shopping socks --date 2024-03-02\nexport \"{}\"\n",
            target.path().display()
        ),
    );
    assert!(stdout.contains("Exported 1 transaction(s)"));

    let name = format!(
        "bookkeeping-data-{}.json",
        Local::now().date_naive().format("%Y-%m-%d")
    );
    let exported = target.child(name);
    exported.assert(predicates::path::exists());
    let raw = std::fs::read_to_string(exported.path()).unwrap();
    assert!(raw.contains("\"description\": \"socks\""), "export was: {raw}");
    assert!(raw.contains("\"date\": \"2024-03-02\""));
}

#[test]
fn filters_history_and_reports_statistics() {
    let home = assert_fs::TempDir::new().unwrap();
    let stdout = run_script(
        home.path(),
        "add income 500 salary pay --date 2024-01-31\n\
         add expense 40 dining \"Team Lunch\" --date 2024-02-03\n\
         add expense 60 housing rent --date 2024-02-05\n\
         list --search LUNCH\n\
         list --type income --from 2024-01-01 --to 2024-01-31\n\
         list --search nothing-matches\n\
         stats\n",
    );
    assert!(stdout.contains("1 record(s)  income ¥0.00  expense ¥40.00  balance -¥40.00"));
    assert!(stdout.contains("1 record(s)  income ¥500.00  expense ¥0.00  balance ¥500.00"));
    assert!(stdout.contains("No transactions match the filter."));
    assert!(stdout.contains("2024-01"));
    assert!(stdout.contains("2024-02"));
    assert!(stdout.contains("🏠 Housing"));
    assert!(stdout.contains("60.0%"));
}

#[test]
fn suggests_commands_and_lists_categories() {
    let home = assert_fs::TempDir::new().unwrap();
    Command::cargo_bin("bookkeeping_cli")
        .unwrap()
        .env("BOOKKEEPING_HOME", home.path())
        .env("BOOKKEEPING_CLI_SCRIPT", "1")
        .write_stdin("dashbord\ncategories expense\ninfo\nquit\nlist\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `dashbord`"))
        .stdout(contains("Did you mean `dashboard`?"))
        .stdout(contains("Other Expense"))
        .stdout(contains("Records      : 0"))
        .stdout(contains("No transactions yet.").not());
}
