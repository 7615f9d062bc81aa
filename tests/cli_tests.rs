//! Integration tests for the CLI interface
//!
//! Runs the binary against small timesheet exports and checks the files it writes

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "Date,Client,First Name,Last Name,Task,Project,Hours,Notes,Billable?";

fn write_input(dir: &Path, name: &str, rows: &[&str]) -> std::path::PathBuf {
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_report(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("timesheet-rollup").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--skip-malformed"));
}

#[test]
fn test_sred_epics_end_to_end() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = write_input(
        tmp.path(),
        "data.csv",
        &[
            "2024-01-03,Acme,Alice,Smith,Dev,Engineering R&D - X,5,EPIC-1,Yes",
            "2024-01-10,Acme,Alice,Smith,Dev,Engineering R&D - X,3,,Yes",
        ],
    );
    let out = tmp.path().join("reports");

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total hours: 8"))
        .stdout(predicate::str::contains("SR&ED hours: 8"))
        .stdout(predicate::str::contains("People: 1"))
        .stdout(predicate::str::contains("Reports written to"));

    for name in [
        "clean-report.csv",
        "total-hours.csv",
        "work-hours.csv",
        "sred-hours.csv",
        "missing-epics.csv",
        "epics.csv",
        "epic-counts.csv",
    ] {
        assert!(out.join(name).is_file(), "{name} was not written");
    }
    assert!(!out.join("monthly-hours.csv").exists());

    assert_eq!(
        read_report(&out, "sred-hours.csv"),
        "Full Name,2024-01-01,2024-01-08\nAlice Smith,5,3\n"
    );
    assert_eq!(
        read_report(&out, "epics.csv"),
        "Full Name,2024-01-01,2024-01-08\nAlice Smith,EPIC-1,missing\n"
    );
    assert_eq!(
        read_report(&out, "missing-epics.csv"),
        "Full Name,2024-01-01,2024-01-08\nAlice Smith,EPIC-1,missing\n"
    );

    assert_eq!(
        read_report(&out, "epic-counts.csv"),
        "Full Name,2024-01-01,2024-01-08\nAlice Smith,1,0\n"
    );

    let clean = read_report(&out, "clean-report.csv");
    assert!(clean.starts_with("Date,Week,Full Name,Task,Project,Hours,Notes\n"));
    assert!(clean.contains("2024-01-10,2024-01-08,Alice Smith,Dev,Engineering R&D - X,3.0,\n"));
    assert!(!clean.contains("Acme"));
    Ok(())
}

#[test]
fn test_time_off_excluded_from_work_hours() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = write_input(
        tmp.path(),
        "data.csv",
        &[
            "2024-02-05,Acme,Bob,Jones,Time off: vacation,General,8,,No",
            "2024-02-06,Acme,Alice,Smith,Dev,Engineering R&D - X,4,EPIC-9,Yes",
        ],
    );
    let out = tmp.path().join("out");

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(&out)
        .assert()
        .success();

    assert_eq!(
        read_report(&out, "total-hours.csv"),
        "Full Name,2024-02-05\nAlice Smith,4\nBob Jones,8\n"
    );
    assert_eq!(
        read_report(&out, "work-hours.csv"),
        "Full Name,2024-02-05\nAlice Smith,4\nBob Jones,0\n"
    );
    // Bob has no qualifying rows: present with empty notes, absent from missing-epics
    assert_eq!(
        read_report(&out, "epics.csv"),
        "Full Name,2024-02-05\nAlice Smith,EPIC-9\nBob Jones,\n"
    );
    assert_eq!(read_report(&out, "missing-epics.csv"), "Full Name,2024-02-05\n");
    Ok(())
}

#[test]
fn test_defaults_to_data_csv_and_reports_dir() -> Result<()> {
    let tmp = TempDir::new()?;
    write_input(
        tmp.path(),
        "data.csv",
        &["2024-01-03,Acme,Alice,Smith,Dev,General,2.5,,No"],
    );

    Command::cargo_bin("timesheet-rollup")?
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total hours: 2.5"))
        .stdout(predicate::str::contains("SR&ED hours: 0\n"));

    assert!(tmp.path().join("reports").join("total-hours.csv").is_file());
    Ok(())
}

#[test]
fn test_header_only_input_prints_zero_totals() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = write_input(tmp.path(), "data.csv", &[]);

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(tmp.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Total hours: 0\n"))
        .stdout(predicate::str::contains("SR&ED hours: 0\n"))
        .stdout(predicate::str::contains("People: 0"))
        .stdout(predicate::str::contains("-0").not());
    Ok(())
}

#[test]
fn test_missing_input_file_fails() -> Result<()> {
    let tmp = TempDir::new()?;

    Command::cargo_bin("timesheet-rollup")?
        .arg(tmp.path().join("nope.csv"))
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("nope.csv"));

    assert!(!tmp.path().join("out").exists());
    Ok(())
}

#[test]
fn test_missing_columns_fail() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = tmp.path().join("data.csv");
    fs::write(&input, "Date,First Name,Hours\n2024-01-03,Alice,5\n")?;

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("missing required columns"));
    Ok(())
}

#[test]
fn test_malformed_row_aborts_by_default() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = write_input(
        tmp.path(),
        "data.csv",
        &[
            "2024-01-03,Acme,Alice,Smith,Dev,General,5,,No",
            "2024-01-04,Acme,Alice,Smith,Dev,General,lots,,No",
        ],
    );

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("line 3"));

    assert!(!tmp.path().join("out").exists());
    Ok(())
}

#[test]
fn test_skip_malformed_keeps_going() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = write_input(
        tmp.path(),
        "data.csv",
        &[
            "2024-01-03,Acme,Alice,Smith,Dev,General,5,,No",
            "someday,Acme,Alice,Smith,Dev,General,5,,No",
        ],
    );
    let out = tmp.path().join("out");

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(&out)
        .arg("--skip-malformed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total hours: 5"))
        .stdout(predicate::str::contains("Skipped rows: 1"));
    Ok(())
}

#[test]
fn test_monthly_report_with_config_markers() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = write_input(
        tmp.path(),
        "data.csv",
        &[
            "2017-10-02,Acme,Alice,Smith,Dev,Applied Research,6,R-1,Yes",
            "2017-11-06,Acme,Alice,Smith,PTO - holiday,General,8,,No",
        ],
    );
    let config = tmp.path().join("rollup.toml");
    fs::write(
        &config,
        r#"
time_off_marker = "PTO"
qualifying_project_marker = "Research"

[[monthly.buckets]]
label = "Research"
terms = [{ project_contains = "Research" }]

[[monthly.buckets]]
label = "Other"
terms = [{ project_contains = "General", exclude_task_contains = "PTO" }]
"#,
    )?;
    let out = tmp.path().join("out");

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .arg("--monthly")
        .assert()
        .success()
        .stdout(predicate::str::contains("SR&ED hours: 6"));

    assert_eq!(
        read_report(&out, "monthly-hours.csv"),
        "Full Name,Research 2017-10,Research 2017-11,Other 2017-10,Other 2017-11\n\
         Alice Smith,6,0,0,0\n"
    );
    assert_eq!(
        read_report(&out, "work-hours.csv"),
        "Full Name,2017-10-02\nAlice Smith,6\n"
    );
    Ok(())
}

#[test]
fn test_monthly_defaults_follow_env_markers() -> Result<()> {
    let tmp = TempDir::new()?;
    let input = write_input(
        tmp.path(),
        "data.csv",
        &[
            "2017-10-02,Acme,Alice,Smith,Dev,Applied Research,6,R-1,Yes",
            "2017-10-03,Acme,Alice,Smith,PTO - holiday,General,8,,No",
        ],
    );
    let out = tmp.path().join("out");

    Command::cargo_bin("timesheet-rollup")?
        .arg(&input)
        .arg(&out)
        .arg("--monthly")
        .env("TIMESHEET_QUALIFYING_MARKER", "Research")
        .env("TIMESHEET_TIME_OFF_MARKER", "PTO")
        .assert()
        .success()
        .stdout(predicate::str::contains("SR&ED hours: 6"));

    assert_eq!(
        read_report(&out, "monthly-hours.csv"),
        "Full Name,R&D 2017-10,Non-R&D 2017-10\nAlice Smith,6,0\n"
    );
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let tmp = TempDir::new()?;
    let config = tmp.path().join("rollup.toml");
    fs::write(&config, "qualifying_project_marker = \"\"\n")?;

    Command::cargo_bin("timesheet-rollup")?
        .arg("--config")
        .arg(&config)
        .current_dir(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("qualifying_project_marker"));
    Ok(())
}
