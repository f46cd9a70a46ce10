use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::api::ProcessResponse;
use crate::authenticator::{AuthenticatorError, PlatformCredential};
use crate::errors::SnapAuthError;

/// Lifecycle of the coordinator.
///
/// At most one state is ever non-idle per [`SnapAuth`](super::SnapAuth)
/// handle; starting a new ceremony from any state first resets the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CeremonyState {
    #[default]
    Idle,
    Registering,
    Authenticating,
    Autofill,
}

/// Identifies the subject of an authentication ceremony.
///
/// Serializes as `{"id": ...}` or `{"handle": ...}`, never both keys.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatingUser {
    /// The backend-assigned user id.
    Id(String),
    /// The caller-assigned user handle.
    Handle(String),
}

/// The registration or authentication token.
///
/// The token cannot be used directly by the client app. Send it to your
/// backend for verification; it is single-use and rejected after
/// `expires_at`, both enforced by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<ProcessResponse> for TokenInfo {
    fn from(response: ProcessResponse) -> Self {
        Self {
            token: response.token,
            expires_at: response.expires_at,
        }
    }
}

/// Terminal result of one ceremony.
pub type SnapAuthResult = Result<TokenInfo, SnapAuthError>;

/// Identity of one ceremony, unique per coordinator handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CeremonyId(pub(crate) u64);

pub(crate) type PlatformOutcome = Result<PlatformCredential, AuthenticatorError>;

/// The in-flight ceremony's continuation slot.
///
/// At most one exists per coordinator. Both senders are consumed at most
/// once: `superseded` by the next ceremony's reset, `platform` by the
/// authenticator completion that matches this ceremony.
pub(crate) struct PendingCeremony {
    pub(crate) id: CeremonyId,
    pub(crate) superseded: Option<oneshot::Sender<()>>,
    pub(crate) platform: Option<oneshot::Sender<PlatformOutcome>>,
}
