use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ceremony::AuthenticatingUser;
use crate::utils::{UtilError, base64url_decode, base64url_encode};

/// A byte sequence carried on the wire as canonical base64url text.
///
/// Serializes to its canonical encoding (URL-safe alphabet, no padding);
/// deserialization applies the strict decoder, so any malformed field in a
/// backend response fails envelope decoding as a whole.
#[derive(Clone, PartialEq, Eq, Default)]
pub(crate) struct Base64UrlValue(Vec<u8>);

impl Base64UrlValue {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub(crate) fn parse(text: &str) -> Result<Self, UtilError> {
        base64url_decode(text).map(Self)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn encoded(&self) -> String {
        base64url_encode(&self.0)
    }
}

impl fmt::Debug for Base64UrlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Base64UrlValue").field(&self.encoded()).finish()
    }
}

impl Serialize for Base64UrlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded())
    }
}

impl<'de> Deserialize<'de> for Base64UrlValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(D::Error::custom)
    }
}

/// Wrapper matching the API wire format.
///
/// Every response carries a `result` and zero or more `errors`, or a null
/// `result` and one or more `errors`.
#[derive(Deserialize, Debug)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct WireResponse<T> {
    #[serde(default)]
    pub(crate) result: Option<T>,
    #[serde(default)]
    pub(crate) errors: Option<Vec<WireError>>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct WireError {
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) message: String,
}

/// Server-issued options for a registration ceremony.
#[derive(Deserialize, Debug)]
pub(crate) struct RegisterOptions {
    pub(crate) rp: RelyingParty,
    pub(crate) user: UserEntity,
    pub(crate) challenge: Base64UrlValue,
    #[allow(dead_code)]
    #[serde(default)]
    pub(crate) attestation: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RelyingParty {
    pub(crate) id: String,
    #[allow(dead_code)]
    pub(crate) name: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UserEntity {
    pub(crate) id: Base64UrlValue,
}

/// Server-issued options for an authentication ceremony.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthOptions {
    pub(crate) rp_id: String,
    pub(crate) challenge: Base64UrlValue,
    /// Absent means any discoverable credential may respond. This is not
    /// the same as an empty list, so absence must be preserved.
    #[serde(default)]
    pub(crate) allow_credentials: Option<Vec<AllowCredential>>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AllowCredential {
    #[allow(dead_code)]
    #[serde(rename = "type")]
    pub(crate) type_: String,
    pub(crate) id: Base64UrlValue,
}

#[derive(Serialize, Debug)]
pub(crate) struct RegisterOptionsRequest<'a> {
    pub(crate) user: RegisteringUser<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisteringUser<'a> {
    pub(crate) name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) display_name: Option<&'a str>,
}

#[derive(Serialize, Debug, Default)]
pub(crate) struct AuthOptionsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user: Option<AuthenticatingUser>,
}

/// Processed registration credential submitted for verification.
#[derive(Serialize, Debug)]
pub(crate) struct ProcessRegisterRequest {
    pub(crate) credential: RegisterCredentialBody,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterCredentialBody {
    #[serde(rename = "type")]
    pub(crate) type_: &'static str,
    pub(crate) raw_id: Base64UrlValue,
    pub(crate) response: AttestationResponseBody,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttestationResponseBody {
    #[serde(rename = "clientDataJSON")]
    pub(crate) client_data_json: Base64UrlValue,
    pub(crate) attestation_object: Base64UrlValue,
    pub(crate) transports: Vec<String>,
}

/// Processed assertion submitted for verification.
#[derive(Serialize, Debug)]
pub(crate) struct ProcessAuthRequest {
    pub(crate) credential: AssertionCredentialBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user: Option<AuthenticatingUser>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssertionCredentialBody {
    #[serde(rename = "type")]
    pub(crate) type_: &'static str,
    pub(crate) raw_id: Base64UrlValue,
    pub(crate) response: AssertionResponseBody,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssertionResponseBody {
    pub(crate) authenticator_data: Base64UrlValue,
    #[serde(rename = "clientDataJSON")]
    pub(crate) client_data_json: Base64UrlValue,
    pub(crate) signature: Base64UrlValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user_handle: Option<Base64UrlValue>,
}

/// Token minted by the backend when a ceremony is verified.
///
/// `expiresAt` arrives as a Unix-epoch integer in seconds.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProcessResponse {
    pub(crate) token: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub(crate) expires_at: DateTime<Utc>,
}
