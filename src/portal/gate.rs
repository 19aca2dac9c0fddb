//! Allow-list gate for Google Sign-In.
//!
//! A Google identity may proceed to backend authentication when, in order:
//!
//! 1. its email is listed in `allowed_emails`, or
//! 2. the provider asserted a hosted domain (`hd`) that is listed in
//!    `allowed_domains`, or
//! 3. no hosted domain (or a blank one) was asserted and the literal domain after the last `@`
//!    of the email is listed in `allowed_domains`.
//!
//! An asserted hosted domain that is not allowed is final. The literal email
//! suffix is only consulted when the provider said nothing about the domain.
//! All comparisons are case-insensitive and the gate never fails: malformed
//! input is simply not authorized.

use std::collections::BTreeSet;

/// Emails and domains permitted to sign in with Google.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowList {
    allowed_emails: BTreeSet<String>,
    allowed_domains: BTreeSet<String>,
}

impl AllowList {
    /// Builds an allow-list, normalizing every entry to trimmed lowercase and
    /// dropping empty entries.
    pub fn new<E, D>(emails: E, domains: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            allowed_emails: normalize_all(emails),
            allowed_domains: normalize_all(domains),
        }
    }

    /// Parses comma-separated email and domain lists.
    #[must_use]
    pub fn from_csv(emails: &str, domains: &str) -> Self {
        Self::new(emails.split(','), domains.split(','))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed_emails.is_empty() && self.allowed_domains.is_empty()
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.allowed_emails.iter().map(String::as_str)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.allowed_domains.iter().map(String::as_str)
    }

    fn allows_email(&self, normalized_email: &str) -> bool {
        self.allowed_emails.contains(normalized_email)
    }

    fn allows_domain(&self, domain: &str) -> bool {
        self.allowed_domains.contains(&domain.trim().to_lowercase())
    }
}

fn normalize_all<I>(entries: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| entry.as_ref().trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Identity asserted by a federated credential. Not verified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityClaim {
    pub email: String,
    pub hosted_domain: Option<String>,
}

impl IdentityClaim {
    pub fn new(email: impl Into<String>, hosted_domain: Option<String>) -> Self {
        Self {
            email: email.into(),
            hosted_domain,
        }
    }
}

/// Decides whether `claim` may proceed to backend authentication.
#[must_use]
pub fn is_authorized(claim: &IdentityClaim, allow_list: &AllowList) -> bool {
    if claim.email.is_empty() {
        return false;
    }

    let email = claim.email.to_lowercase();

    if allow_list.allows_email(&email) {
        return true;
    }

    if let Some(hosted_domain) = claim
        .hosted_domain
        .as_deref()
        .filter(|hd| !hd.trim().is_empty())
    {
        return allow_list.allows_domain(hosted_domain);
    }

    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| !domain.is_empty() && allow_list.allows_domain(domain))
}
