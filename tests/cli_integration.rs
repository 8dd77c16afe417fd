//! Integration tests for the DuressVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Passwords come from the `DURESSVAULT_*` environment variables so no
//! interactive prompt is shown.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const L1: &str = "main-password";
const DECOY: &str = "decoy-password";

/// Helper: get a Command pointing at the duressvault binary.
fn duressvault() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("duressvault").expect("binary should exist");
    cmd.env_remove("DURESSVAULT_PASSWORD")
        .env_remove("DURESSVAULT_L2_PASSWORD")
        .env_remove("DURESSVAULT_DECOY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper: a project dir with a cheap KDF and an initialized single-level vault.
fn initialized_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".duressvault.toml")
        .write_str("kdf_iterations = 10000\n")
        .unwrap();

    duressvault()
        .args(["init", "--second-factor", "none"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault created"));

    tmp
}

#[test]
fn help_flag_shows_usage() {
    duressvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decoy vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("note"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("decoy-init"));
}

#[test]
fn version_flag_shows_version() {
    duressvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("duressvault"));
}

#[test]
fn no_args_shows_help() {
    duressvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn status_without_vault_succeeds() {
    let tmp = TempDir::new().unwrap();
    duressvault()
        .arg("status")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No vault"));
}

#[test]
fn init_writes_records() {
    let tmp = initialized_project();
    tmp.child(".duressvault/meta.json")
        .assert(predicate::path::exists());
    tmp.child(".duressvault/real.vault")
        .assert(predicate::path::exists());
    tmp.child(".duressvault/decoy.vault")
        .assert(predicate::path::exists());
}

#[test]
fn init_twice_without_force_fails() {
    let tmp = initialized_project();
    duressvault()
        .args(["init", "--second-factor", "none"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_rejects_decoy_equal_to_main() {
    let tmp = TempDir::new().unwrap();
    duressvault()
        .args(["init", "--second-factor", "none"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .env("DURESSVAULT_DECOY_PASSWORD", L1)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
}

#[test]
fn decoy_lists_welcome_item() {
    let tmp = initialized_project();
    duressvault()
        .args(["list", "--decoy"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .success()
        .stdout(predicate::str::contains("decoy_welcome.txt"));
}

#[test]
fn wrong_password_gives_generic_error() {
    let tmp = initialized_project();
    duressvault()
        .arg("list")
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", DECOY)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to unlock vault"));
}

#[test]
fn add_then_export_round_trips_a_file() {
    let tmp = initialized_project();
    let source = tmp.child("passport.txt");
    source.write_str("P<UTO<<ERIKSSON").unwrap();

    duressvault()
        .args(["add", "passport.txt"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .assert()
        .success();

    duressvault()
        .arg("list")
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .assert()
        .success()
        .stdout(predicate::str::contains("passport.txt"));

    duressvault()
        .args(["export", "passport.txt", "--out", "out"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .assert()
        .success();

    tmp.child("out/passport.txt").assert("P<UTO<<ERIKSSON");
}

#[test]
fn export_falls_back_to_decoy() {
    let tmp = initialized_project();
    duressvault()
        .args(["export", "decoy_welcome.txt", "--out", "out"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", DECOY)
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .success();

    tmp.child("out/decoy_welcome.txt")
        .assert(predicate::str::contains("decoy vault"));
}

#[test]
fn note_goes_to_decoy_only() {
    let tmp = initialized_project();
    duressvault()
        .args(["note", "groceries", "--text", "milk", "--decoy"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .success();

    duressvault()
        .arg("list")
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .assert()
        .success()
        .stdout(predicate::str::contains("groceries").not());
}

#[test]
fn init_rejects_short_password() {
    let tmp = TempDir::new().unwrap();
    duressvault()
        .args(["init", "--second-factor", "none"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", "short")
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    tmp.child(".duressvault/real.vault")
        .assert(predicate::path::missing());
}

#[test]
fn two_level_vault_needs_second_password() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".duressvault.toml")
        .write_str("kdf_iterations = 10000\n")
        .unwrap();

    duressvault()
        .args(["init", "--second-factor", "password"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .env("DURESSVAULT_L2_PASSWORD", "second-password")
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .success();

    duressvault()
        .arg("status")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("second credential"));

    duressvault()
        .args(["note", "plan", "--text", "real contents"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .env("DURESSVAULT_L2_PASSWORD", "second-password")
        .assert()
        .success();

    duressvault()
        .arg("list")
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .env("DURESSVAULT_L2_PASSWORD", "second-password")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"));

    duressvault()
        .arg("list")
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .env("DURESSVAULT_L2_PASSWORD", "wrong-second")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to unlock vault"));
}

#[test]
fn remove_drops_only_the_first_match() {
    let tmp = initialized_project();
    for text in ["first", "second"] {
        duressvault()
            .args(["note", "todo", "--text", text])
            .current_dir(tmp.path())
            .env("DURESSVAULT_PASSWORD", L1)
            .assert()
            .success();
    }

    duressvault()
        .args(["remove", "todo", "--force"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .assert()
        .success();

    duressvault()
        .args(["export", "todo", "--out", "out"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_PASSWORD", L1)
        .assert()
        .success();

    tmp.child("out/todo").assert("second");
}

#[test]
fn decoy_init_replaces_decoy_contents() {
    let tmp = initialized_project();
    duressvault()
        .args(["decoy-init", "--force"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 files"));

    duressvault()
        .args(["list", "--decoy"])
        .current_dir(tmp.path())
        .env("DURESSVAULT_DECOY_PASSWORD", DECOY)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 item(s)"))
        .stdout(predicate::str::contains("invoice_1.txt"))
        .stdout(predicate::str::contains("invoice_3.txt"))
        .stdout(predicate::str::contains("notes.txt"))
        .stdout(predicate::str::contains("decoy_welcome.txt").not());
}

#[test]
fn completions_generate_script() {
    duressvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duressvault"));
}
