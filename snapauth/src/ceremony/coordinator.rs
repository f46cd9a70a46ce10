use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::api::{
    ApiClient, AssertionCredentialBody, AssertionResponseBody, AttestationResponseBody,
    AuthOptions, AuthOptionsRequest, Base64UrlValue, ProcessAuthRequest, ProcessRegisterRequest,
    ProcessResponse, RegisterCredentialBody, RegisterOptions, RegisterOptionsRequest,
    RegisteringUser, Transport, paths,
};
use crate::authenticator::{
    AssertionCredential, AuthenticatorError, AuthenticatorKind, PlatformAuthenticator,
    PlatformCredential, RegistrationCredential, build_auth_requests, build_register_requests,
};
use crate::errors::SnapAuthError;

use super::types::{
    AuthenticatingUser, CeremonyId, CeremonyState, PendingCeremony, PlatformOutcome,
    SnapAuthResult,
};

const LOCK_POISONED: &str = "ceremony runtime lock poisoned";

/// The single mutable state shared between ceremony tasks and the
/// authenticator completion path. Never held across an await.
struct CeremonyRuntime {
    state: CeremonyState,
    pending: Option<PendingCeremony>,
    seq: u64,
}

/// Completion handle issued to the platform authenticator for one ceremony.
///
/// Reports the session outcome back to the coordinator. An outcome whose
/// ceremony no longer owns the pending slot is discarded, so a session
/// that fires after cancellation cannot resolve a newer ceremony.
pub struct CeremonyCompletion {
    id: CeremonyId,
    runtime: Arc<Mutex<CeremonyRuntime>>,
}

impl CeremonyCompletion {
    /// Delivers the authenticator outcome for this ceremony.
    ///
    /// Only the first matching delivery has any effect, with one
    /// exception: an error during an autofill ceremony is suppressed and
    /// the ceremony keeps waiting, since autofill is speculative and its
    /// failures are not user-actionable.
    pub fn complete(&self, outcome: Result<PlatformCredential, AuthenticatorError>) {
        let mut guard = self.runtime.lock().expect(LOCK_POISONED);
        let Some(current) = guard.pending.as_ref().map(|pending| pending.id) else {
            tracing::debug!("Authenticator completion with no ceremony in flight; ignoring");
            return;
        };
        if current != self.id {
            tracing::debug!(
                "Authenticator completion for stale ceremony {:?}; current is {:?}",
                self.id,
                current
            );
            return;
        }
        if guard.state == CeremonyState::Autofill {
            if let Err(code) = &outcome {
                tracing::debug!("Suppressing authenticator error during autofill: {code}");
                return;
            }
        }
        let Some(platform) = guard
            .pending
            .as_mut()
            .and_then(|pending| pending.platform.take())
        else {
            tracing::debug!("Authenticator completion already delivered; ignoring");
            return;
        };
        let _ = platform.send(outcome);
    }
}

/// Coordinates SnapAuth credential ceremonies.
///
/// One handle drives at most one ceremony at a time. Starting a new
/// ceremony while another is pending cancels the old authenticator session
/// and resolves the old ceremony with
/// [`SnapAuthError::SupersededByNewRequest`]; a superseded ceremony never
/// later produces a stray success.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use snapauth::{AuthenticatingUser, AuthenticatorKind, PlatformAuthenticator, SnapAuth};
/// # async fn example(authenticator: Arc<dyn PlatformAuthenticator>) {
/// let snap_auth = SnapAuth::new("pubkey_your_key", authenticator);
/// let result = snap_auth
///     .start_authenticate(
///         AuthenticatingUser::Handle("someuser".into()),
///         &[AuthenticatorKind::Passkey],
///     )
///     .await;
/// match result {
///     Ok(token_info) => { /* send token_info.token to your backend */ }
///     Err(error) => { /* examine error to decide how to proceed */ }
/// }
/// # }
/// ```
pub struct SnapAuth {
    api: ApiClient,
    authenticator: Arc<dyn PlatformAuthenticator>,
    runtime: Arc<Mutex<CeremonyRuntime>>,
}

impl SnapAuth {
    /// Creates a coordinator talking to the configured API base URL with
    /// the given publishable key.
    pub fn new(publishable_key: &str, authenticator: Arc<dyn PlatformAuthenticator>) -> Self {
        Self::from_api(ApiClient::new(publishable_key), authenticator)
    }

    /// Creates a coordinator over a caller-supplied transport.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        authenticator: Arc<dyn PlatformAuthenticator>,
    ) -> Self {
        Self::from_api(ApiClient::with_transport(transport), authenticator)
    }

    fn from_api(api: ApiClient, authenticator: Arc<dyn PlatformAuthenticator>) -> Self {
        Self {
            api,
            authenticator,
            runtime: Arc::new(Mutex::new(CeremonyRuntime {
                state: CeremonyState::Idle,
                pending: None,
                seq: 0,
            })),
        }
    }

    /// The current ceremony state.
    pub fn state(&self) -> CeremonyState {
        self.runtime.lock().expect(LOCK_POISONED).state
    }

    /// Registers a new credential for `name`.
    ///
    /// Fetches creation options from the backend, prompts via the platform
    /// authenticator, and submits the attestation for verification.
    pub async fn start_register(
        &self,
        name: &str,
        display_name: Option<&str>,
        kinds: &[AuthenticatorKind],
    ) -> SnapAuthResult {
        tracing::debug!("Starting registration ceremony");
        let (id, superseded, platform) = self.begin(CeremonyState::Registering);
        let result = tokio::select! {
            biased;
            _ = superseded => Err(SnapAuthError::SupersededByNewRequest),
            result = self.register_ceremony(id, platform, name, display_name, kinds) => result,
        };
        self.finish(id, &result);
        result
    }

    /// Authenticates `user` with an existing credential.
    pub async fn start_authenticate(
        &self,
        user: AuthenticatingUser,
        kinds: &[AuthenticatorKind],
    ) -> SnapAuthResult {
        tracing::debug!("Starting authentication ceremony");
        let (id, superseded, platform) = self.begin(CeremonyState::Authenticating);
        let result = tokio::select! {
            biased;
            _ = superseded => Err(SnapAuthError::SupersededByNewRequest),
            result = self.authenticate_ceremony(id, platform, user, kinds) => result,
        };
        self.finish(id, &result);
        result
    }

    /// Starts a passive autofill authentication, passkeys only.
    ///
    /// Authenticator errors are suppressed while autofill is pending, so
    /// this resolves only on a completed assertion, a backend failure, or
    /// supersession by a modal ceremony.
    pub async fn start_autofill(&self) -> SnapAuthResult {
        tracing::debug!("Starting autofill ceremony");
        let (id, superseded, platform) = self.begin(CeremonyState::Autofill);
        let result = tokio::select! {
            biased;
            _ = superseded => Err(SnapAuthError::SupersededByNewRequest),
            result = self.autofill_ceremony(id, platform) => result,
        };
        self.finish(id, &result);
        result
    }

    /// Attempts to upgrade an existing account to passkeys by registering
    /// one in the background.
    ///
    /// Call after the user signs in with another mechanism. Failures
    /// should be logged rather than shown.
    pub async fn upgrade_to_passkey(
        &self,
        name: &str,
        display_name: Option<&str>,
    ) -> SnapAuthResult {
        self.start_register(name, display_name, &[AuthenticatorKind::Passkey])
            .await
    }

    /// Resets the previous ceremony, if any, and claims the slot for a new
    /// one. The old ceremony is resolved as superseded and its
    /// authenticator session canceled before the new one does any work.
    fn begin(
        &self,
        target: CeremonyState,
    ) -> (
        CeremonyId,
        oneshot::Receiver<()>,
        oneshot::Receiver<PlatformOutcome>,
    ) {
        let (superseded_tx, superseded_rx) = oneshot::channel();
        let (platform_tx, platform_rx) = oneshot::channel();

        let (previous, id) = {
            let mut guard = self.runtime.lock().expect(LOCK_POISONED);
            let previous = guard.pending.take();
            guard.seq += 1;
            let id = CeremonyId(guard.seq);
            guard.state = target;
            guard.pending = Some(PendingCeremony {
                id,
                superseded: Some(superseded_tx),
                platform: Some(platform_tx),
            });
            (previous, id)
        };

        // Resolve the displaced ceremony outside the lock; cancel may call
        // back into the completion path synchronously.
        if let Some(mut stale) = previous {
            tracing::debug!("Superseding ceremony {:?} with {:?}", stale.id, id);
            if let Some(superseded) = stale.superseded.take() {
                let _ = superseded.send(());
            }
            self.authenticator.cancel();
        }

        (id, superseded_rx, platform_rx)
    }

    /// Releases the slot and returns to idle, but only if `id` still owns
    /// the slot. A superseded ceremony must not disturb its successor.
    fn finish(&self, id: CeremonyId, result: &SnapAuthResult) {
        if let Err(error) = result {
            tracing::warn!("Ceremony {:?} failed: {error}", id);
        }
        let mut guard = self.runtime.lock().expect(LOCK_POISONED);
        if guard.pending.as_ref().is_some_and(|pending| pending.id == id) {
            guard.pending = None;
            guard.state = CeremonyState::Idle;
        }
    }

    fn completion(&self, id: CeremonyId) -> CeremonyCompletion {
        CeremonyCompletion {
            id,
            runtime: Arc::clone(&self.runtime),
        }
    }

    /// Awaits the authenticator outcome for this ceremony.
    async fn platform_credential(
        &self,
        platform: oneshot::Receiver<PlatformOutcome>,
    ) -> Result<PlatformCredential, SnapAuthError> {
        let outcome = platform.await.unwrap_or_else(|_| {
            tracing::error!("Authenticator completion channel closed without an outcome");
            Err(AuthenticatorError::Unknown)
        });
        Ok(outcome?)
    }

    async fn register_ceremony(
        &self,
        id: CeremonyId,
        platform: oneshot::Receiver<PlatformOutcome>,
        name: &str,
        display_name: Option<&str>,
        kinds: &[AuthenticatorKind],
    ) -> SnapAuthResult {
        let body = RegisterOptionsRequest {
            user: RegisteringUser { name, display_name },
        };
        let options: RegisterOptions = self.api.post(paths::ATTESTATION_OPTIONS, &body).await?;

        let requests = build_register_requests(&options, name, display_name, kinds);
        if requests.is_empty() {
            tracing::warn!("No usable authenticator kind among {kinds:?}");
            return Err(SnapAuthError::UnsupportedPlatform);
        }

        self.authenticator.invoke(requests, self.completion(id));
        match self.platform_credential(platform).await? {
            PlatformCredential::Registration(registration) => {
                self.process_registration(registration).await
            }
            PlatformCredential::Assertion(_) => {
                tracing::error!("Received an assertion during a registration ceremony");
                Err(SnapAuthError::UnexpectedAuthorizationType)
            }
        }
    }

    async fn authenticate_ceremony(
        &self,
        id: CeremonyId,
        platform: oneshot::Receiver<PlatformOutcome>,
        user: AuthenticatingUser,
        kinds: &[AuthenticatorKind],
    ) -> SnapAuthResult {
        let body = AuthOptionsRequest {
            user: Some(user.clone()),
        };
        let options: AuthOptions = self.api.post(paths::ASSERTION_OPTIONS, &body).await?;

        let requests = build_auth_requests(&options, kinds);
        if requests.is_empty() {
            tracing::warn!("No usable authenticator kind among {kinds:?}");
            return Err(SnapAuthError::UnsupportedPlatform);
        }

        self.authenticator.invoke(requests, self.completion(id));
        match self.platform_credential(platform).await? {
            PlatformCredential::Assertion(assertion) => {
                self.process_assertion(assertion, Some(user)).await
            }
            PlatformCredential::Registration(_) => {
                tracing::error!("Received a registration during an authentication ceremony");
                Err(SnapAuthError::UnexpectedAuthorizationType)
            }
        }
    }

    async fn autofill_ceremony(
        &self,
        id: CeremonyId,
        platform: oneshot::Receiver<PlatformOutcome>,
    ) -> SnapAuthResult {
        let body = AuthOptionsRequest::default();
        let options: AuthOptions = self.api.post(paths::ASSERTION_OPTIONS, &body).await?;

        // Autofill only ever produces passkey assertions.
        let requests = build_auth_requests(&options, &[AuthenticatorKind::Passkey]);
        if requests.is_empty() {
            return Err(SnapAuthError::UnsupportedPlatform);
        }

        self.authenticator.invoke(requests, self.completion(id));
        match self.platform_credential(platform).await? {
            PlatformCredential::Assertion(assertion) => {
                self.process_assertion(assertion, None).await
            }
            PlatformCredential::Registration(_) => {
                tracing::error!("Received a registration during an autofill ceremony");
                Err(SnapAuthError::UnexpectedAuthorizationType)
            }
        }
    }

    /// Normalizes a registration credential and submits it for
    /// verification.
    async fn process_registration(&self, registration: RegistrationCredential) -> SnapAuthResult {
        let Some(attestation_object) = registration.attestation_object else {
            tracing::error!("No attestation object in registration response");
            return Err(SnapAuthError::RegistrationDataMissing);
        };

        let body = ProcessRegisterRequest {
            credential: RegisterCredentialBody {
                type_: "public-key",
                raw_id: Base64UrlValue::new(registration.credential_id),
                response: AttestationResponseBody {
                    client_data_json: Base64UrlValue::new(registration.client_data_json),
                    attestation_object: Base64UrlValue::new(attestation_object),
                    transports: registration.transports,
                },
            },
        };

        let processed: ProcessResponse = self.api.post(paths::ATTESTATION_PROCESS, &body).await?;
        tracing::debug!("Registration verified, token expires at {}", processed.expires_at);
        Ok(processed.into())
    }

    /// Normalizes an assertion and submits it for verification.
    async fn process_assertion(
        &self,
        assertion: AssertionCredential,
        user: Option<AuthenticatingUser>,
    ) -> SnapAuthResult {
        let body = ProcessAuthRequest {
            credential: AssertionCredentialBody {
                type_: "public-key",
                raw_id: Base64UrlValue::new(assertion.credential_id),
                response: AssertionResponseBody {
                    authenticator_data: Base64UrlValue::new(assertion.authenticator_data),
                    client_data_json: Base64UrlValue::new(assertion.client_data_json),
                    signature: Base64UrlValue::new(assertion.signature),
                    user_handle: assertion.user_handle.map(Base64UrlValue::new),
                },
            },
            user,
        };

        let processed: ProcessResponse = self.api.post(paths::ASSERTION_PROCESS, &body).await?;
        tracing::debug!("Assertion verified, token expires at {}", processed.expires_at);
        Ok(processed.into())
    }
}
