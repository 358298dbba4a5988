//! Stamps `--version` with the source revision and the build target, so a
//! report can be traced back to the binary that produced it.

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TIDESCAN_REVISION");

    // Source tarballs carry no git metadata; packagers pass the revision in.
    let revision = env::var("TIDESCAN_REVISION")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .or_else(git_revision)
        .unwrap_or_else(|| UNKNOWN.to_owned());

    let target = env::var("TARGET").unwrap_or_else(|_| UNKNOWN.to_owned());
    let profile = env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_owned());

    println!("cargo:rustc-env=TIDESCAN_BUILD_REVISION={revision}");
    println!("cargo:rustc-env=TIDESCAN_BUILD_TARGET={target}");
    println!("cargo:rustc-env=TIDESCAN_BUILD_PROFILE={profile}");
}

/// `git describe` output such as `v0.1.0-3-g1a2b3c4-dirty`.
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_owned()).filter(|text| !text.is_empty())
}
