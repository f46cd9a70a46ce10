//! Error types surfaced to SDK callers

use thiserror::Error;

use crate::api::TransportError;
use crate::authenticator::AuthenticatorError;

/// Errors that can resolve a ceremony.
///
/// Every ceremony terminates with either a token or exactly one of these.
/// `NetworkInterruption` is the one kind that is generally safe to retry;
/// the SDK itself never retries anything.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapAuthError {
    /// The network request was disrupted.
    #[error("Network request was disrupted")]
    NetworkInterruption,

    /// A response arrived from the backend in an unexpected format. If you
    /// encounter this, please reach out to us.
    #[error("Malformed response from the backend")]
    MalformedResponse,

    /// The SDK was unable to encode data to send to the backend. If you
    /// ever encounter this, please reach out to us.
    #[error("Failed to encode request body")]
    EncodingFailure,

    /// The request was valid and understood, but processing was refused.
    /// Carries the backend's error code.
    #[error("Request rejected by the backend: {0}")]
    RejectedRequest(String),

    /// None of the requested authenticator kinds are usable on this
    /// platform build.
    #[error("No requested authenticator kind is supported on this platform")]
    UnsupportedPlatform,

    /// A newer ceremony was started before this one completed.
    #[error("Ceremony superseded by a newer request")]
    SupersededByNewRequest,

    /// The authenticator produced a credential of a type the SDK did not
    /// request. If you encounter this, please reach out to us.
    #[error("Unexpected authorization type")]
    UnexpectedAuthorizationType,

    /// Data the backend requires during credential registration was not
    /// provided by the authenticator, so the ceremony cannot proceed.
    #[error("Registration data missing from authenticator response")]
    RegistrationDataMissing,

    /// A relayed platform authenticator outcome, including user
    /// cancellation.
    #[error("Authenticator error: {0}")]
    Authenticator(#[from] AuthenticatorError),
}

impl From<TransportError> for SnapAuthError {
    fn from(err: TransportError) -> Self {
        tracing::error!("Transport error: {err}");
        Self::NetworkInterruption
    }
}
