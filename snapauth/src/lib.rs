//! snapauth - Client SDK for SnapAuth credential ceremonies
//!
//! This crate coordinates WebAuthn-style registration and authentication
//! against the SnapAuth backend: it fetches one-time ceremony options,
//! drives the platform credential subsystem, and submits the signed
//! credential for verification, yielding a single short-lived token or a
//! typed error.
//!
//! The platform credential subsystem itself is out of scope; supply it
//! through the [`PlatformAuthenticator`] trait.

mod api;
mod authenticator;
mod ceremony;
mod config;
mod errors;
mod utils;

// Re-export the ceremony coordination components
pub use ceremony::{AuthenticatingUser, CeremonyCompletion, CeremonyState, SnapAuth,
    SnapAuthResult, TokenInfo};

pub use errors::SnapAuthError;

pub use authenticator::{
    AssertionCredential, AssertionRequest, AuthenticatorError, AuthenticatorKind,
    AuthorizationRequest, PlatformAuthenticator, PlatformCredential, RegistrationCredential,
    RegistrationRequest, SecurityKeyRegistrationRequest,
};

pub use authenticator::{autofill_supported, passkey_upgrades_supported, security_keys_supported};

pub use api::{HttpTransport, Transport, TransportError};
