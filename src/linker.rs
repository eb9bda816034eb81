// This module wraps the external ld.lld invocation that turns a relocatable AMDGPU object
// file into the loadable HSACO shared object. The linker binary is resolved from the
// HSACO_LLD_PATH environment variable, then from the ROCm toolchain bundled next to the
// crate, then from PATH. The child process is run synchronously with no timeout; exit code
// and captured stderr come back as a LinkOutcome value so the binary emitter can report
// failures without aborting. A spawn failure (missing binary, permission error) is folded
// into the outcome as exit code -1 rather than surfaced as a separate error, matching how
// the pipeline has always treated a broken linker.

//! External `ld.lld` resolution and invocation.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Env override for the linker binary location.
const LLD_ENV: &str = "HSACO_LLD_PATH";

/// ld.lld bundled with the compiler distribution, relative to the crate root.
const BUNDLED_LLD: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/third_party/rocm/bin/ld.lld"
);

/// Exit status and captured diagnostics of one linker run.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    /// Child exit code; `-1` if the process could not be launched or was
    /// killed by a signal.
    pub code: i32,
    pub stderr: String,
}

impl LinkOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Locate the linker binary.
///
/// Order: `HSACO_LLD_PATH`, the bundled ROCm `ld.lld` if it exists, then a
/// bare `ld.lld` left to PATH resolution.
pub fn resolve_lld() -> PathBuf {
    if let Ok(path) = env::var(LLD_ENV) {
        return PathBuf::from(path);
    }
    let bundled = PathBuf::from(BUNDLED_LLD);
    if bundled.exists() {
        return bundled;
    }
    PathBuf::from("ld.lld")
}

/// Link `object` into a GNU-flavored shared object at `output`.
///
/// Blocks until the child exits; no timeout is applied.
pub fn link_shared_object(object: &Path, output: &Path) -> LinkOutcome {
    let lld = resolve_lld();
    log::debug!(
        "linking {} -> {} via {}",
        object.display(),
        output.display(),
        lld.display(),
    );

    let result = Command::new(&lld)
        .arg("-flavor")
        .arg("gnu")
        .arg("-shared")
        .arg("-o")
        .arg(output)
        .arg(object)
        .output();

    match result {
        Ok(out) => LinkOutcome {
            code: out.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        },
        Err(err) => LinkOutcome {
            code: -1,
            stderr: format!("failed to launch {}: {err}", lld.display()),
        },
    }
}
