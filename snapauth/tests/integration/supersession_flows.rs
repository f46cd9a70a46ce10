use std::sync::Arc;

use snapauth::{
    AuthenticatingUser, AuthenticatorKind, CeremonyState, SnapAuth, SnapAuthError,
};

use crate::common::fixtures::{auth_options_with_allow_list, passkey_assertion, token_result};
use crate::common::{
    AuthenticatorScript, MockAuthenticator, MockTransport, TransportScript, settle, wait_for,
};

fn spawn_authentication(
    snap_auth: &Arc<SnapAuth>,
) -> tokio::task::JoinHandle<Result<snapauth::TokenInfo, SnapAuthError>> {
    let snap_auth = snap_auth.clone();
    tokio::spawn(async move {
        snap_auth
            .start_authenticate(
                AuthenticatingUser::Id("user_1".to_string()),
                &[AuthenticatorKind::Passkey],
            )
            .await
    })
}

/// Starting ceremony B while A is mid options fetch resolves A as
/// superseded and cancels its authenticator session; B proceeds alone.
#[tokio::test]
async fn test_new_ceremony_supersedes_pending_fetch() {
    crate::common::init_tracing();
    let transport = MockTransport::new(vec![
        TransportScript::Stall,
        TransportScript::Respond(auth_options_with_allow_list()),
        TransportScript::Respond(token_result()),
    ]);
    let authenticator = MockAuthenticator::new(vec![AuthenticatorScript::Hold]);
    let snap_auth = Arc::new(SnapAuth::with_transport(
        transport.clone(),
        authenticator.clone(),
    ));

    let first = spawn_authentication(&snap_auth);
    {
        let transport = transport.clone();
        wait_for(move || transport.call_count() == 1).await;
    }

    let second = spawn_authentication(&snap_auth);

    // The first ceremony resolves as superseded even though its backend
    // call never returned
    let first_result = first.await.expect("task should not panic");
    assert_eq!(
        first_result.unwrap_err(),
        SnapAuthError::SupersededByNewRequest
    );
    assert_eq!(authenticator.cancel_count(), 1);

    // The second ceremony is unaffected and completes normally
    {
        let authenticator = authenticator.clone();
        wait_for(move || authenticator.held_count() == 1).await;
    }
    assert_eq!(snap_auth.state(), CeremonyState::Authenticating);
    authenticator.fire(0, Ok(passkey_assertion()));

    let token_info = second
        .await
        .expect("task should not panic")
        .expect("second ceremony should succeed");
    assert_eq!(token_info.token, "tok_abc");
    assert_eq!(snap_auth.state(), CeremonyState::Idle);
}

/// A superseded ceremony's late authenticator callback must neither
/// resolve the new ceremony nor disturb its pending slot.
#[tokio::test]
async fn test_late_callback_cannot_touch_new_ceremony() {
    crate::common::init_tracing();
    let transport = MockTransport::new(vec![
        TransportScript::Respond(auth_options_with_allow_list()),
        TransportScript::Respond(auth_options_with_allow_list()),
        TransportScript::Respond(token_result()),
    ]);
    let authenticator =
        MockAuthenticator::new(vec![AuthenticatorScript::Hold, AuthenticatorScript::Hold]);
    let snap_auth = Arc::new(SnapAuth::with_transport(
        transport.clone(),
        authenticator.clone(),
    ));

    let first = spawn_authentication(&snap_auth);
    {
        let authenticator = authenticator.clone();
        wait_for(move || authenticator.held_count() == 1).await;
    }

    let second = spawn_authentication(&snap_auth);
    {
        let authenticator = authenticator.clone();
        wait_for(move || authenticator.held_count() == 2).await;
    }

    let first_result = first.await.expect("task should not panic");
    assert_eq!(
        first_result.unwrap_err(),
        SnapAuthError::SupersededByNewRequest
    );

    // The stale session fires anyway; the outcome must be discarded
    authenticator.fire(0, Ok(passkey_assertion()));
    settle().await;
    assert!(!second.is_finished());
    assert_eq!(snap_auth.state(), CeremonyState::Authenticating);
    // No processing call was made on behalf of the stale ceremony
    assert_eq!(transport.call_count(), 2);

    // The live session completes the second ceremony normally
    authenticator.fire(1, Ok(passkey_assertion()));
    let token_info = second
        .await
        .expect("task should not panic")
        .expect("second ceremony should succeed");
    assert_eq!(token_info.token, "tok_abc");
    assert_eq!(snap_auth.state(), CeremonyState::Idle);
}

/// Once a ceremony resolves, the coordinator is immediately reusable.
#[tokio::test]
async fn test_sequential_ceremonies_on_one_handle() {
    let transport = MockTransport::new(vec![
        TransportScript::Respond(auth_options_with_allow_list()),
        TransportScript::Respond(token_result()),
        TransportScript::Respond(auth_options_with_allow_list()),
        TransportScript::Respond(token_result()),
    ]);
    let authenticator = MockAuthenticator::new(vec![
        AuthenticatorScript::Respond(Ok(passkey_assertion())),
        AuthenticatorScript::Respond(Ok(passkey_assertion())),
    ]);
    let snap_auth = SnapAuth::with_transport(transport, authenticator);

    for _ in 0..2 {
        let token_info = snap_auth
            .start_authenticate(
                AuthenticatingUser::Id("user_1".to_string()),
                &[AuthenticatorKind::Passkey],
            )
            .await
            .expect("authentication should succeed");
        assert_eq!(token_info.token, "tok_abc");
        assert_eq!(snap_auth.state(), CeremonyState::Idle);
    }
}
