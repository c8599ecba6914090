//! Integration tests for CLI commands.
//!
//! Each test runs the binary end-to-end against published test vectors and
//! a project directory under a temp dir.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
const SHA384_ABC: &str = "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7";
const SHA512_ABC: &str = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";

fn kestrel(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kestrel").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"));
    cmd
}

// ============================================================================
// Digest
// ============================================================================

#[test]
fn digest_stdin_defaults_to_sha256() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .arg("digest")
        .write_stdin("abc")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{SHA256_ABC}  -")));
}

#[test]
fn digest_file_with_algorithm_flag() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("abc.txt");
    fs::write(&file, b"abc").unwrap();

    kestrel(&temp)
        .args(["digest", "--algorithm", "sha512", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(SHA512_ABC));
}

#[test]
fn digest_streams_in_small_chunks() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("kestrel.toml"), "[io]\nchunk_size = 1\n").unwrap();

    kestrel(&temp)
        .arg("digest")
        .write_stdin("abc")
        .assert()
        .success()
        .stdout(predicate::str::contains(SHA256_ABC));
}

#[test]
fn digest_algorithm_from_environment() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .arg("digest")
        .env("KESTREL_DIGEST__ALGORITHM", "sha384")
        .write_stdin("abc")
        .assert()
        .success()
        .stdout(predicate::str::contains(SHA384_ABC));
}

#[test]
fn digest_flag_overrides_environment() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .args(["digest", "--algorithm", "sha256"])
        .env("KESTREL_DIGEST__ALGORITHM", "sha384")
        .write_stdin("abc")
        .assert()
        .success()
        .stdout(predicate::str::contains(SHA256_ABC));
}

// ============================================================================
// HMAC / PBKDF2
// ============================================================================

#[test]
fn hmac_rfc4231_case_2() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .args(["hmac", "--key-hex", "4a656665"])
        .write_stdin("what do ya want for nothing?")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843",
        ));
}

#[test]
fn pbkdf2_sha256_single_iteration() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .args([
            "pbkdf2",
            "--password",
            "password",
            "--salt",
            "salt",
            "--iterations",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b",
        ));
}

#[test]
fn pbkdf2_iterations_from_project_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("kestrel.toml"),
        "[kdf]\niterations = 2\nkey_length = 32\n",
    )
    .unwrap();

    kestrel(&temp)
        .args(["pbkdf2", "--password", "password", "--salt", "salt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43",
        ));
}

#[test]
fn pbkdf2_length_flag_truncates() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .args([
            "pbkdf2",
            "--password",
            "password",
            "--salt",
            "salt",
            "--iterations",
            "1",
            "--length",
            "4",
        ])
        .assert()
        .success()
        .stdout("120fb6cf\n");
}

// ============================================================================
// CRC32
// ============================================================================

#[test]
fn crc32_ieee_check_value() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .arg("crc32")
        .write_stdin("123456789")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cbf43926"));
}

#[test]
fn crc32_polynomial_from_local_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("kestrel.toml"),
        "[checksum]\npolynomial = \"koopman\"\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("kestrel.local.toml"),
        "[checksum]\npolynomial = \"castagnoli\"\n",
    )
    .unwrap();

    kestrel(&temp)
        .arg("crc32")
        .write_stdin("123456789")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("e3069283"));
}

// ============================================================================
// AES-CTR
// ============================================================================

#[test]
fn ctr_encrypts_sp800_38a_block() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("plain.bin");
    let output = temp.path().join("cipher.bin");
    fs::write(&input, hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap()).unwrap();

    kestrel(&temp)
        .args([
            "ctr",
            "--key-hex",
            "2b7e151628aed2a6abf7158809cf4f3c",
            "--iv-hex",
            "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(
        hex::encode(fs::read(&output).unwrap()),
        "874d6191b620e3261bef6864990db6ce"
    );
}

#[test]
fn ctr_roundtrip_restores_plaintext() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("kestrel.toml"), "[io]\nchunk_size = 7\n").unwrap();

    let plain = temp.path().join("plain.bin");
    let cipher = temp.path().join("cipher.bin");
    let restored = temp.path().join("restored.bin");
    let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 % 251) as u8).collect();
    fs::write(&plain, &data).unwrap();

    for (from, to) in [(&plain, &cipher), (&cipher, &restored)] {
        kestrel(&temp)
            .args([
                "ctr",
                "--key-hex",
                "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
                "--iv-hex",
                "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff",
                "--input",
                from.to_str().unwrap(),
                "--output",
                to.to_str().unwrap(),
            ])
            .assert()
            .success();
    }

    assert_ne!(fs::read(&cipher).unwrap(), data);
    assert_eq!(fs::read(&restored).unwrap(), data);
}

// ============================================================================
// Config Commands
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[kdf]"))
        .stdout(predicate::str::contains("iterations = 600000"))
        .stdout(predicate::str::contains("algorithm = \"sha256\""));
}

#[test]
fn config_show_merges_environment() {
    let temp = TempDir::new().unwrap();
    kestrel(&temp)
        .args(["config", "show"])
        .env("KESTREL_KDF__ITERATIONS", "4096")
        .assert()
        .success()
        .stdout(predicate::str::contains("iterations = 4096"));
}

#[test]
fn config_show_uses_project_flag() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("kestrel.toml"), "[io]\nchunk_size = 4096\n").unwrap();

    kestrel(&temp)
        .args(["--project", project.to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chunk_size = 4096"));
}

#[test]
fn config_validate_reports_success() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("kestrel.toml"), "[digest]\nalgorithm = \"sha512\"\n").unwrap();

    kestrel(&temp)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("digest:   sha512"));
}

#[test]
fn config_validate_rejects_zero_chunk_size() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("kestrel.toml"), "[io]\nchunk_size = 0\n").unwrap();

    kestrel(&temp)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("io.chunk_size"));
}

#[test]
fn commands_fail_on_invalid_config() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("kestrel.toml"), "[kdf]\niterations = 0\n").unwrap();

    kestrel(&temp)
        .arg("digest")
        .write_stdin("abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
