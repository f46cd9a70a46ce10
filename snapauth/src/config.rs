//! Central configuration for the snapauth crate

use std::{env, sync::LazyLock};

/// Base URL of the SnapAuth API
///
/// Override with the SNAPAUTH_API_URL environment variable, e.g. to point
/// a staging build at a sandbox backend.
/// Default: "https://api.snapauth.app"
pub(crate) static SNAPAUTH_API_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("SNAPAUTH_API_URL").unwrap_or_else(|_| "https://api.snapauth.app".to_string())
});

/// HTTP request timeout in seconds for backend calls
///
/// This bounds the two network phases of a ceremony. It does not bound the
/// authenticator prompt itself, which has no local timeout.
pub(crate) static SNAPAUTH_HTTP_TIMEOUT: LazyLock<u64> = LazyLock::new(|| {
    env::var("SNAPAUTH_HTTP_TIMEOUT")
        .map(|v| v.parse::<u64>().unwrap_or(30))
        .unwrap_or(30)
});
