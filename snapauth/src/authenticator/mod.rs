mod availability;
mod requests;
mod types;

pub use availability::{autofill_supported, passkey_upgrades_supported, security_keys_supported};
pub use types::{
    AssertionCredential, AssertionRequest, AuthenticatorError, AuthenticatorKind,
    AuthorizationRequest, PlatformCredential, RegistrationCredential, RegistrationRequest,
    SecurityKeyRegistrationRequest,
};

pub(crate) use availability::supported_kinds;
pub(crate) use requests::{build_auth_requests, build_register_requests};

use crate::ceremony::CeremonyCompletion;

/// The platform credential subsystem, as an opaque capability.
///
/// An implementation presents the system credential UI for the given
/// requests and later reports the outcome through `completion`. The
/// completion handle may be called from any thread and may fire after the
/// owning ceremony was superseded; stale outcomes are discarded by the
/// coordinator, so implementations need no bookkeeping of their own.
pub trait PlatformAuthenticator: Send + Sync {
    /// Starts a credential session for the given requests.
    ///
    /// A session that never reports leaves its ceremony pending until a
    /// newer ceremony supersedes it.
    fn invoke(&self, requests: Vec<AuthorizationRequest>, completion: CeremonyCompletion);

    /// Cancels the in-flight session, if any.
    ///
    /// The session may still report afterwards; its outcome no longer
    /// matches a live ceremony and is ignored.
    fn cancel(&self);
}
