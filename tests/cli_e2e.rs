//! End-to-end CLI tests for tsgap.
//!
//! These tests run the actual binary and check stdout, stderr and exit codes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

const SLOW_STEP: &str = "15:04:05.000000 start\n15:04:05.600000 slow step\n";

fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    fs::write(dir.path().join("slow.log"), SLOW_STEP).unwrap();

    let mixed = "\
2024-03-12 09:00:00 INFO boot
2024-03-12 09:00:00 INFO listening on :8080
    at handler (server.rs:42)
2024-03-12 09:00:07 WARN slow request
";
    fs::write(dir.path().join("mixed.log"), mixed).unwrap();

    dir
}

fn tsgap_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_tsgap"));
    let mut cmd = Command::from_std(cmd);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn dashes(n: usize) -> String {
    "-".repeat(n)
}

// ============================================================================
// Basic Functionality
// ============================================================================

mod basic_functionality {
    use super::*;

    #[test]
    fn test_stdin_default_threshold() {
        tsgap_cmd()
            .write_stdin(SLOW_STEP)
            .assert()
            .success()
            .stdout(format!(
                "15:04:05.000000 start\n{}\n15:04:05.600000 slow step\n",
                dashes(80)
            ));
    }

    #[test]
    fn test_larger_threshold_no_separator() {
        tsgap_cmd()
            .args(["-d", "1s"])
            .write_stdin(SLOW_STEP)
            .assert()
            .success()
            .stdout(SLOW_STEP);
    }

    #[test]
    fn test_file_input() {
        let fixtures = setup_fixtures();
        let input = fixture(&fixtures, "slow.log");

        tsgap_cmd()
            .args(["-f", input.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(dashes(80)));
    }

    #[test]
    fn test_untimestamped_passthrough() {
        tsgap_cmd()
            .write_stdin("hello world\n")
            .assert()
            .success()
            .stdout("hello world\n");
    }

    #[test]
    fn test_empty_input() {
        tsgap_cmd().write_stdin("").assert().success().stdout("");
    }

    #[test]
    fn test_mixed_log_with_continuation_lines() {
        let fixtures = setup_fixtures();
        let input = fixture(&fixtures, "mixed.log");

        let output = tsgap_cmd()
            .args(["--file", input.to_str().unwrap(), "--duration", "5s"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], dashes(80));
        assert!(lines[4].contains("slow request"));
    }
}

// ============================================================================
// Flags
// ============================================================================

mod flags {
    use super::*;

    #[test]
    fn test_custom_separator() {
        tsgap_cmd()
            .args(["-p", "=*", "-r", "4"])
            .write_stdin(SLOW_STEP)
            .assert()
            .success()
            .stdout(predicate::str::contains("\n=*=*=*=*\n"));
    }

    #[test]
    fn test_zero_repeat_gives_empty_separator() {
        tsgap_cmd()
            .args(["-r", "0"])
            .write_stdin(SLOW_STEP)
            .assert()
            .success()
            .stdout("15:04:05.000000 start\n\n15:04:05.600000 slow step\n");
    }

    #[test]
    fn test_custom_pattern() {
        tsgap_cmd()
            .args(["-c", r"@([0-9]{2}h[0-9]{2})", "-e", "%Hh%M"])
            .write_stdin("@10h00 a\n10:00:00 b\n10:00:09 c\n@10h01 d\n")
            .assert()
            .success()
            .stdout(format!(
                "@10h00 a\n10:00:00 b\n10:00:09 c\n{}\n@10h01 d\n",
                dashes(80)
            ));
    }

    #[test]
    fn test_negative_duration() {
        tsgap_cmd()
            .args(["-d", "-5s"])
            .write_stdin("10:00 a\n10:00 b\n")
            .assert()
            .success()
            .stdout(format!("10:00 a\n{}\n10:00 b\n", dashes(80)));
    }

    #[test]
    fn test_date_only_custom_pattern() {
        tsgap_cmd()
            .args(["-c", r"([0-9]{4}-[0-9]{2}-[0-9]{2})", "-e", "%Y-%m-%d"])
            .write_stdin("2024-01-01 a\n2024-01-05 b\n")
            .assert()
            .success()
            .stdout(format!("2024-01-01 a\n{}\n2024-01-05 b\n", dashes(80)));
    }

    #[test]
    fn test_adaptive_never_separates() {
        let input = "00:00 a\n01:00 b\n02:00 c\n09:00 d\n";
        tsgap_cmd()
            .arg("-a")
            .write_stdin(input)
            .assert()
            .success()
            .stdout(input)
            .stderr(predicate::str::contains("experimental"));
    }

    #[test]
    fn test_verbose_logs_to_stderr_only() {
        tsgap_cmd()
            .arg("-vv")
            .write_stdin(SLOW_STEP)
            .assert()
            .success()
            .stdout(predicate::str::contains("annotating").not())
            .stderr(predicate::str::contains("annotating"));
    }

    #[test]
    fn test_version() {
        tsgap_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tsgap"));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_missing_file_exit_1() {
        tsgap_cmd()
            .args(["-f", "/nonexistent/path/app.log"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/nonexistent/path/app.log"));
    }

    #[test]
    fn test_bad_duration_exit_1() {
        tsgap_cmd()
            .args(["-d", "quickly"])
            .write_stdin(SLOW_STEP)
            .assert()
            .code(1)
            .stdout("")
            .stderr(predicate::str::contains("quickly"));
    }

    #[test]
    fn test_bad_regex_exit_1() {
        tsgap_cmd()
            .args(["-c", "([0-9]", "-e", "%H"])
            .write_stdin(SLOW_STEP)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("pattern"));
    }

    #[test]
    fn test_huge_repeat_exit_1() {
        tsgap_cmd()
            .arg("-r")
            .arg(usize::MAX.to_string())
            .write_stdin("10:00 a\n10:01 b\n")
            .assert()
            .code(1)
            .stdout("")
            .stderr(predicate::str::contains("separator"));
    }

    #[test]
    fn test_duration_overflow_exit_1() {
        tsgap_cmd()
            .args(["-d", "340282366920938463463374607431768211.999us"])
            .write_stdin(SLOW_STEP)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("out of range"));
    }

    #[test]
    fn test_help_exit_2() {
        tsgap_cmd()
            .arg("--help")
            .assert()
            .code(2)
            .stdout(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_unknown_flag_exit_2() {
        tsgap_cmd()
            .arg("--bogus")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_custom_without_example_exit_2() {
        tsgap_cmd()
            .args(["-c", "([0-9]{2})"])
            .assert()
            .code(2);
    }

    #[test]
    fn test_example_without_custom_exit_2() {
        tsgap_cmd().args(["-e", "%H"]).assert().code(2);
    }
}
