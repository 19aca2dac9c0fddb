use super::user_facing;
use crate::{
    cli::globals::GlobalArgs,
    portal::{is_authorized, login, IdentityClaim},
};
use anyhow::{bail, Result};
use secrecy::SecretString;
use tracing::debug;

/// Handle `login`
///
/// # Errors
/// Returns an error if the login is rejected or the session cannot be stored.
pub async fn login(globals: &GlobalArgs, email: &str, password: &SecretString) -> Result<()> {
    let client = globals.client()?;
    let store = globals.session_store();

    let session = login::password_login(&client, &store, email, password)
        .await
        .map_err(user_facing)?;

    println!(
        "Login successful. Signed in as {}",
        session.email().unwrap_or(email.trim())
    );
    Ok(())
}

/// Handle `google`
///
/// # Errors
/// Returns an error if the identity is not allow-listed, the backend rejects
/// it, or the session cannot be stored.
pub async fn google(globals: &GlobalArgs, credential: &SecretString) -> Result<()> {
    let client = globals.client()?;
    let store = globals.session_store();

    let session = login::google_login(&client, &store, &globals.allow_list, credential)
        .await
        .map_err(user_facing)?;

    println!(
        "Login successful. Signed in with Google as {}",
        session.email().unwrap_or("unknown")
    );
    Ok(())
}

/// Handle `check`
///
/// # Errors
/// Returns an error if the identity is not allow-listed.
pub fn check(globals: &GlobalArgs, email: String, hosted_domain: Option<String>) -> Result<()> {
    let claim = IdentityClaim::new(
        email,
        hosted_domain.filter(|domain| !domain.trim().is_empty()),
    );

    debug!(
        emails = globals.allow_list.emails().count(),
        domains = globals.allow_list.domains().count(),
        "evaluating allow-list"
    );

    if is_authorized(&claim, &globals.allow_list) {
        println!("{} is authorized", claim.email);
        Ok(())
    } else {
        bail!("{} is not authorized", claim.email)
    }
}

/// Handle `logout`
///
/// # Errors
/// Returns an error if the session file cannot be removed.
pub fn logout(globals: &GlobalArgs) -> Result<()> {
    login::logout(&globals.session_store())?;
    println!("Signed out");
    Ok(())
}

/// Handle `whoami`
///
/// # Errors
/// Returns an error if no session is stored or it cannot be read.
pub fn whoami(globals: &GlobalArgs) -> Result<()> {
    let Some(session) = login::current_session(&globals.session_store())? else {
        bail!("Not signed in");
    };

    println!("Signed in via {}", session.auth_method);
    println!("{}", serde_json::to_string_pretty(&session.user)?);
    Ok(())
}
