//! Platform availability hints for passkeys and hardware authenticators

use super::types::AuthenticatorKind;

/// Authenticator kinds usable on this build, in presentation order.
///
/// Resolved once at compile time; the request builder intersects the
/// caller's requested kinds against this set.
pub(crate) fn supported_kinds() -> &'static [AuthenticatorKind] {
    #[cfg(feature = "security-keys")]
    {
        &[AuthenticatorKind::Passkey, AuthenticatorKind::SecurityKey]
    }
    #[cfg(not(feature = "security-keys"))]
    {
        &[AuthenticatorKind::Passkey]
    }
}

/// Indicates whether external security keys are supported on the current
/// build.
pub fn security_keys_supported() -> bool {
    cfg!(feature = "security-keys")
}

/// Indicates whether passkey autofill requests are supported.
///
/// Autofill ceremonies can be started regardless; on platforms without
/// autofill the authenticator relays a not-handled outcome, which autofill
/// ceremonies suppress.
pub fn autofill_supported() -> bool {
    true
}

/// Indicates whether background passkey upgrades are supported.
pub fn passkey_upgrades_supported() -> bool {
    true
}
