//! Builds platform authorization requests from server-issued options.

use crate::api::{AuthOptions, RegisterOptions};

use super::availability::supported_kinds;
use super::types::{
    AssertionRequest, AuthenticatorKind, AuthorizationRequest, RegistrationRequest,
    SECURITY_KEY_ALGORITHMS, SECURITY_KEY_ATTESTATION, SecurityKeyRegistrationRequest,
};

/// Kinds to build for, in the stable supported order (passkey before
/// security key) regardless of the order the caller asked in.
fn permitted(kinds: &[AuthenticatorKind]) -> impl Iterator<Item = AuthenticatorKind> + '_ {
    supported_kinds()
        .iter()
        .copied()
        .filter(move |kind| kinds.contains(kind))
}

/// Builds one registration request per permitted authenticator kind.
///
/// Returns an empty list when no requested kind is usable on this build;
/// the coordinator treats that as a local failure and never invokes the
/// platform authenticator with zero requests.
pub(crate) fn build_register_requests(
    options: &RegisterOptions,
    name: &str,
    display_name: Option<&str>,
    kinds: &[AuthenticatorKind],
) -> Vec<AuthorizationRequest> {
    permitted(kinds)
        .map(|kind| match kind {
            AuthenticatorKind::Passkey => {
                AuthorizationRequest::PasskeyRegistration(RegistrationRequest {
                    rp_id: options.rp.id.clone(),
                    challenge: options.challenge.as_bytes().to_vec(),
                    user_id: options.user.id.as_bytes().to_vec(),
                    name: name.to_string(),
                    display_name: display_name.map(str::to_string),
                })
            }
            AuthenticatorKind::SecurityKey => {
                AuthorizationRequest::SecurityKeyRegistration(SecurityKeyRegistrationRequest {
                    rp_id: options.rp.id.clone(),
                    challenge: options.challenge.as_bytes().to_vec(),
                    user_id: options.user.id.as_bytes().to_vec(),
                    name: name.to_string(),
                    display_name: display_name.map(str::to_string),
                    attestation: SECURITY_KEY_ATTESTATION,
                    algorithms: SECURITY_KEY_ALGORITHMS,
                })
            }
        })
        .collect()
}

/// Builds one assertion request per permitted authenticator kind.
///
/// An allow-list the server omitted stays omitted; substituting an empty
/// list would tell the authenticator nothing may respond.
pub(crate) fn build_auth_requests(
    options: &AuthOptions,
    kinds: &[AuthenticatorKind],
) -> Vec<AuthorizationRequest> {
    let allow_credentials = options.allow_credentials.as_ref().map(|credentials| {
        credentials
            .iter()
            .map(|credential| credential.id.as_bytes().to_vec())
            .collect::<Vec<_>>()
    });

    permitted(kinds)
        .map(|kind| {
            let request = AssertionRequest {
                rp_id: options.rp_id.clone(),
                challenge: options.challenge.as_bytes().to_vec(),
                allow_credentials: allow_credentials.clone(),
            };
            match kind {
                AuthenticatorKind::Passkey => AuthorizationRequest::PasskeyAssertion(request),
                AuthenticatorKind::SecurityKey => {
                    AuthorizationRequest::SecurityKeyAssertion(request)
                }
            }
        })
        .collect()
}
