#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

/// Builds a command for the binary that cannot pick up the invoking user's config.
pub fn normalizer_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("resolution_normalizer"));
    cmd.env_remove("RESOLUTION_NORMALIZER_CONFIG");
    cmd.env_remove("XDG_CONFIG_HOME");
    cmd.env("HOME", home);
    cmd.env("RUST_LOG", "info");
    cmd.current_dir(home);
    cmd
}

pub fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run resolution_normalizer");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}
