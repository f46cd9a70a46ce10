use serde_json::{Value, json};

use snapauth::{
    AssertionCredential, AuthenticatorKind, PlatformCredential, RegistrationCredential,
};

pub fn envelope(result: Value) -> String {
    json!({"result": result, "errors": null}).to_string()
}

pub fn error_envelope(code: &str, message: &str) -> String {
    json!({"result": null, "errors": [{"code": code, "message": message}]}).to_string()
}

/// Assertion options with a one-entry allow list: challenge "foo",
/// credential id bytes [0x00, 0x01, 0x02].
pub fn auth_options_with_allow_list() -> String {
    envelope(json!({
        "rpId": "example.com",
        "challenge": "Zm9v",
        "allowCredentials": [{"type": "public-key", "id": "AAEC"}]
    }))
}

/// Assertion options without an allow list, as issued for discoverable
/// and autofill ceremonies.
pub fn auth_options_discoverable() -> String {
    envelope(json!({
        "rpId": "example.com",
        "challenge": "Zm9v"
    }))
}

pub fn register_options() -> String {
    envelope(json!({
        "rp": {"id": "example.com", "name": "Example"},
        "user": {"id": "dXNlcl8x"},
        "challenge": "Zm9v",
        "attestation": "none"
    }))
}

pub fn token_result() -> String {
    envelope(json!({"token": "tok_abc", "expiresAt": 1999999999}))
}

pub fn passkey_assertion() -> PlatformCredential {
    PlatformCredential::Assertion(AssertionCredential {
        kind: AuthenticatorKind::Passkey,
        credential_id: vec![0x00, 0x01, 0x02],
        authenticator_data: b"auth-data".to_vec(),
        client_data_json: b"{}".to_vec(),
        signature: b"sig".to_vec(),
        user_handle: None,
    })
}

pub fn passkey_registration(with_attestation: bool) -> PlatformCredential {
    PlatformCredential::Registration(RegistrationCredential {
        kind: AuthenticatorKind::Passkey,
        credential_id: vec![0x00, 0x01, 0x02],
        client_data_json: b"{}".to_vec(),
        attestation_object: with_attestation.then(|| b"attestation".to_vec()),
        transports: vec!["internal".to_string()],
    })
}
