//! Google ID token payload decoding.
//!
//! Only the payload segment is read. The signature is not checked; the
//! backend verifies the credential before issuing a session.

use crate::portal::{
    error::{Error, Result},
    gate::IdentityClaim,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};

/// Claims the portal reads from a Google ID token.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GooglePayload {
    #[serde(default)]
    pub email: Option<String>,
    /// Hosted domain of a Google Workspace account.
    #[serde(default)]
    pub hd: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl From<GooglePayload> for IdentityClaim {
    fn from(payload: GooglePayload) -> Self {
        Self {
            email: payload.email.unwrap_or_default(),
            hosted_domain: payload.hd.filter(|hd| !hd.is_empty()),
        }
    }
}

/// Decodes the payload segment of a JWT without verifying it.
///
/// # Errors
///
/// Returns [`Error::Credential`] if the token has no payload segment, the
/// segment is not base64url, or it does not decode to a JSON object.
pub fn decode_payload(credential: &str) -> Result<GooglePayload> {
    let mut parts = credential.trim().split('.');
    let _header = parts.next().ok_or(Error::Credential("missing header"))?;
    let payload_b64 = parts
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or(Error::Credential("missing payload"))?;

    let normalized: String = payload_b64
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = Base64UrlUnpadded::decode_vec(&normalized)
        .map_err(|_| Error::Credential("invalid base64url payload"))?;

    serde_json::from_slice(&bytes).map_err(|_| Error::Credential("payload is not a JSON object"))
}

/// Decodes a credential straight into the identity the gate evaluates.
///
/// # Errors
///
/// See [`decode_payload`].
pub fn decode_claim(credential: &str) -> Result<IdentityClaim> {
    decode_payload(credential).map(IdentityClaim::from)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Value};

    /// Builds an unsigned token carrying `claims`.
    pub(crate) fn token_with(claims: &Value) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn decodes_email_and_hosted_domain() {
        let token = token_with(&json!({
            "email": "franchise@dsog.com",
            "hd": "dsog.com",
            "name": "Franchise Owner",
            "email_verified": true,
            "aud": "client-id"
        }));

        let payload = decode_payload(&token).unwrap();
        assert_eq!(payload.email.as_deref(), Some("franchise@dsog.com"));
        assert_eq!(payload.hd.as_deref(), Some("dsog.com"));
        assert_eq!(payload.name.as_deref(), Some("Franchise Owner"));
        assert_eq!(payload.email_verified, Some(true));

        let claim = decode_claim(&token).unwrap();
        assert_eq!(
            claim,
            IdentityClaim::new("franchise@dsog.com", Some("dsog.com".to_string()))
        );
    }

    #[test]
    fn missing_email_yields_empty_claim_email() {
        let token = token_with(&json!({ "sub": "1234" }));
        let claim = decode_claim(&token).unwrap();
        assert!(claim.email.is_empty());
        assert_eq!(claim.hosted_domain, None);
    }

    #[test]
    fn empty_hosted_domain_is_treated_as_absent() {
        let token = token_with(&json!({ "email": "x@dsog.com", "hd": "" }));
        assert_eq!(decode_claim(&token).unwrap().hosted_domain, None);
    }

    #[test]
    fn tolerates_padding_and_standard_alphabet() {
        let claims = json!({ "email": "émile@dsog.com", "name": "??>>" });
        let padded = base64ct::Base64::encode_string(claims.to_string().as_bytes());
        let token = format!("header.{padded}.sig");

        let payload = decode_payload(&token).unwrap();
        assert_eq!(payload.email.as_deref(), Some("émile@dsog.com"));
    }

    #[test]
    fn payload_only_token_is_accepted() {
        let payload = Base64UrlUnpadded::encode_string(br#"{"email":"x@dsog.com"}"#);
        let token = format!("header.{payload}");
        assert_eq!(
            decode_payload(&token).unwrap().email.as_deref(),
            Some("x@dsog.com")
        );
    }

    #[test]
    fn rejects_malformed_credentials() {
        assert!(matches!(
            decode_payload(""),
            Err(Error::Credential("missing payload"))
        ));
        assert!(matches!(
            decode_payload("no-dots-here"),
            Err(Error::Credential("missing payload"))
        ));
        assert!(matches!(
            decode_payload("header.!!!.sig"),
            Err(Error::Credential("invalid base64url payload"))
        ));

        let not_json = Base64UrlUnpadded::encode_string(b"not json");
        assert!(matches!(
            decode_payload(&format!("header.{not_json}.sig")),
            Err(Error::Credential("payload is not a JSON object"))
        ));
    }
}
