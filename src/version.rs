//! Build metadata stamped in by `build.rs`.

use std::sync::OnceLock;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" outside a checkout.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" outside a checkout.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

const SHORT_SHA_LEN: usize = 7;

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

fn short_sha() -> &'static str {
    GIT_SHA.get(..SHORT_SHA_LEN).unwrap_or(GIT_SHA)
}

/// Full build identifier, e.g. `0.1.0+main.abc1234` or
/// `0.1.0+main.abc1234.dirty`.
///
/// Printed by `tonepickerd --version`, logged at startup and returned by
/// `GET /api/health`.
pub fn version_string() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let dirty = if git_dirty() { ".dirty" } else { "" };
        format!("{PKG_VERSION}+{GIT_BRANCH}.{}{dirty}", short_sha())
    })
}
