mod client;
mod types;

pub use client::{HttpTransport, Transport, TransportError};

pub(crate) use client::ApiClient;
pub(crate) use types::{
    AssertionCredentialBody, AssertionResponseBody, AttestationResponseBody, AuthOptions,
    AuthOptionsRequest, Base64UrlValue, ProcessAuthRequest, ProcessRegisterRequest,
    ProcessResponse, RegisterCredentialBody, RegisterOptions, RegisterOptionsRequest,
    RegisteringUser,
};

/// Backend endpoint paths. The shapes are a fixed contract; the paths are
/// joined against the configured base URL.
pub(crate) mod paths {
    pub(crate) const ATTESTATION_OPTIONS: &str = "/attestation/options";
    pub(crate) const ATTESTATION_PROCESS: &str = "/attestation/process";
    pub(crate) const ASSERTION_OPTIONS: &str = "/assertion/options";
    pub(crate) const ASSERTION_PROCESS: &str = "/assertion/process";
}
