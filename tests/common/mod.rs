//! Shared helpers for binary-level tests

use std::path::PathBuf;

/// Cached binary path for the scalr CLI to avoid repeated lookups
#[allow(deprecated)]
pub static SCALR_BIN: std::sync::LazyLock<PathBuf> =
    std::sync::LazyLock::new(|| assert_cmd::cargo::cargo_bin("scalr"));

/// Test helper to create a command with the cached binary and an isolated
/// environment: no inherited Scalr settings, empty standard input.
pub fn scalr_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(&*SCALR_BIN);
    for name in [
        "SCALR_HOSTNAME",
        "SCALR_TOKEN",
        "SCALR_ACCOUNT",
        "SCALR_CONFIG_DIR",
        "SCALR_LOG",
    ] {
        cmd.env_remove(name);
    }
    cmd.write_stdin("");
    cmd
}
