use thiserror::Error;

/// Authenticator categories a caller may request for a ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticatorKind {
    /// A platform-resident public-key credential.
    Passkey,
    /// An external hardware public-key credential.
    SecurityKey,
}

/// Fixed attestation preference sent with security-key registration.
pub(crate) const SECURITY_KEY_ATTESTATION: &str = "direct";

/// Fixed signature algorithm preference for security-key registration
/// (COSE ES256).
pub(crate) const SECURITY_KEY_ALGORITHMS: &[i32] = &[-7];

/// One request descriptor handed to the platform authenticator.
///
/// A ceremony produces at most one descriptor per permitted kind, passkey
/// first, so presentation order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationRequest {
    PasskeyRegistration(RegistrationRequest),
    SecurityKeyRegistration(SecurityKeyRegistrationRequest),
    PasskeyAssertion(AssertionRequest),
    SecurityKeyAssertion(AssertionRequest),
}

impl AuthorizationRequest {
    pub fn kind(&self) -> AuthenticatorKind {
        match self {
            Self::PasskeyRegistration(_) | Self::PasskeyAssertion(_) => AuthenticatorKind::Passkey,
            Self::SecurityKeyRegistration(_) | Self::SecurityKeyAssertion(_) => {
                AuthenticatorKind::SecurityKey
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub user_id: Vec<u8>,
    pub name: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityKeyRegistrationRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub user_id: Vec<u8>,
    pub name: String,
    pub display_name: Option<String>,
    /// Always [`SECURITY_KEY_ATTESTATION`].
    pub attestation: &'static str,
    /// Always [`SECURITY_KEY_ALGORITHMS`].
    pub algorithms: &'static [i32],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    /// `None` means any credential for this relying party may respond. An
    /// empty list is never produced; the two are different instructions to
    /// the authenticator.
    pub allow_credentials: Option<Vec<Vec<u8>>>,
}

/// Raw signed credential delivered by the platform authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCredential {
    Registration(RegistrationCredential),
    Assertion(AssertionCredential),
}

/// Attestation produced for a newly created credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredential {
    pub kind: AuthenticatorKind,
    pub credential_id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    /// Platforms have been observed to omit this; registration cannot
    /// proceed without it.
    pub attestation_object: Option<Vec<u8>>,
    /// Transport hints, empty when the platform does not report them.
    pub transports: Vec<String>,
}

/// Assertion proving possession of an existing credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionCredential {
    pub kind: AuthenticatorKind,
    pub credential_id: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    /// Typically absent for hardware keys.
    pub user_handle: Option<Vec<u8>>,
}

/// Platform authenticator outcomes relayed to the caller unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The platform reported a failure this SDK has no mapping for.
    #[error("Unknown authenticator failure")]
    Unknown,

    /// The user canceled the request.
    #[error("The user canceled the request")]
    Canceled,

    /// The authenticator returned a response that could not be understood.
    #[error("Invalid authenticator response")]
    InvalidResponse,

    /// No handler processed the authorization request.
    #[error("Authorization request was not handled")]
    NotHandled,

    /// The authorization attempt failed.
    #[error("Authorization failed")]
    Failed,

    /// The request requires interaction but none was possible.
    #[error("Authorization request is not interactive")]
    NotInteractive,

    /// The presented credential matched the exclusion list.
    #[error("Credential matched an excluded credential")]
    MatchedExcludedCredential,
}
