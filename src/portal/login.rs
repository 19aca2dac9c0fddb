//! Sign-in flows: password login and Google Sign-In.
//!
//! Google Sign-In decodes the credential locally, checks the identity against
//! the allow-list and only then forwards the credential to the backend. An
//! identity the backend does not know yet is registered on the fly.

use crate::portal::{
    client::{ApiResponse, PortalClient, Registration},
    credential::decode_claim,
    error::{Error, Result},
    gate::{is_authorized, AllowList},
    session::{AuthMethod, Session, SessionStore},
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

const NOT_FOUND_MARKER: &str = "not found";
const REGISTRATION_FAILED: &str = "Failed to create account. Please contact support.";

/// Loose shape check for an email address: `local@domain.tld`.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Display name derived from the local part of an email.
fn name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Signs in with email and password and stores the session.
///
/// # Errors
///
/// Returns [`Error::MissingCredentials`] or [`Error::InvalidEmail`] before any
/// request is made, [`Error::Backend`] when the backend rejects the login, and
/// transport errors from the client.
#[instrument(skip(client, store, password))]
pub async fn password_login(
    client: &PortalClient,
    store: &SessionStore,
    email: &str,
    password: &SecretString,
) -> Result<Session> {
    let email = email.trim();
    if email.is_empty() || password.expose_secret().is_empty() {
        return Err(Error::MissingCredentials);
    }
    if !valid_email(email) {
        return Err(Error::InvalidEmail(email.to_string()));
    }

    let response = client.login(email, password).await?;
    if !response.success {
        warn!("login rejected by backend");
        return Err(Error::Backend(response.message_or("Login failed")));
    }

    let token = response
        .token
        .clone()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Backend("Login response did not include a token".to_string()))?;

    let session = Session {
        user: user_or_fallback(response.user, email),
        token,
        auth_method: AuthMethod::Email,
    };
    store.save(&session)?;
    info!("signed in with password");

    Ok(session)
}

/// Handles a Google Sign-In credential end to end and stores the session.
///
/// # Errors
///
/// Returns [`Error::Credential`] if the credential cannot be decoded,
/// [`Error::Unauthorized`] if the identity is not allow-listed (no request is
/// made in either case), [`Error::Backend`] when the backend rejects the
/// identity, and transport errors from the client.
#[instrument(skip_all)]
pub async fn google_login(
    client: &PortalClient,
    store: &SessionStore,
    allow_list: &AllowList,
    credential: &SecretString,
) -> Result<Session> {
    let claim = decode_claim(credential.expose_secret())?;

    if !is_authorized(&claim, allow_list) {
        warn!(email = %claim.email, "google account is not allow-listed");
        return Err(Error::Unauthorized);
    }

    let email = claim.email.as_str();
    let response = client.google_login(credential, email).await?;

    let response = if response.success {
        response
    } else if response
        .message
        .as_deref()
        .is_some_and(|message| message.contains(NOT_FOUND_MARKER))
    {
        info!(email = %email, "google account unknown to backend, registering");
        register(client, email, credential).await?
    } else {
        return Err(Error::Backend(response.message_or("Authentication failed")));
    };

    // The backend may reuse the Google credential as the session token.
    let token = response
        .token
        .clone()
        .filter(|token| !token.is_empty())
        .unwrap_or_else(|| credential.expose_secret().to_string());

    let session = Session {
        user: user_or_fallback(response.user, email),
        token,
        auth_method: AuthMethod::Google,
    };
    store.save(&session)?;
    info!(email = %email, "signed in with google");

    Ok(session)
}

async fn register(
    client: &PortalClient,
    email: &str,
    credential: &SecretString,
) -> Result<ApiResponse> {
    let registration = Registration {
        email,
        name: name_from_email(email),
        auth_method: AuthMethod::Google.as_str(),
        token: credential,
    };

    let response = client.register_user(&registration).await?;
    if response.success {
        info!(email = %email, "new account created");
        Ok(response)
    } else {
        warn!(email = %email, "registration rejected: {}", response.message_or(""));
        Err(Error::Backend(REGISTRATION_FAILED.to_string()))
    }
}

fn user_or_fallback(user: Option<Value>, email: &str) -> Value {
    match user {
        Some(user) if !user.is_null() => user,
        _ => json!({ "email": email, "name": name_from_email(email) }),
    }
}

/// Removes the stored session.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub fn logout(store: &SessionStore) -> Result<()> {
    store.clear()
}

/// Returns the stored session, if any.
///
/// # Errors
///
/// Returns an error if the session file cannot be read.
pub fn current_session(store: &SessionStore) -> Result<Option<Session>> {
    store.load()
}
