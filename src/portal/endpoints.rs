//! Backend actions and URL construction. The backend exposes a single URL and
//! dispatches on the `action` query parameter; every other argument travels as
//! a query parameter too.

use crate::portal::error::Result;
use std::fmt;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Status,
    Login,
    GoogleLogin,
    RegisterUser,
    GetProducts,
    SearchProducts,
    PlaceOrder,
    GetMaterials,
    GetUpdates,
    GetStats,
}

impl Endpoint {
    pub const ALL: [Self; 10] = [
        Self::Status,
        Self::Login,
        Self::GoogleLogin,
        Self::RegisterUser,
        Self::GetProducts,
        Self::SearchProducts,
        Self::PlaceOrder,
        Self::GetMaterials,
        Self::GetUpdates,
        Self::GetStats,
    ];

    /// Value of the `action` query parameter.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Login => "login",
            Self::GoogleLogin => "googleLogin",
            Self::RegisterUser => "registerUser",
            Self::GetProducts => "getProducts",
            Self::SearchProducts => "searchProducts",
            Self::PlaceOrder => "placeOrder",
            Self::GetMaterials => "getMaterials",
            Self::GetUpdates => "getUpdates",
            Self::GetStats => "getStats",
        }
    }

    /// Whether the request carries a password or credential that must not be
    /// logged.
    #[must_use]
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::Login | Self::GoogleLogin | Self::RegisterUser)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Builds the request URL for `endpoint`. `action` comes first, followed by
/// `params` in order; parameters with an empty value are skipped.
///
/// # Errors
///
/// Returns an error if `base` is not an absolute URL.
pub fn api_url<K, V>(base: &str, endpoint: Endpoint, params: &[(K, V)]) -> Result<Url>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(base.trim())?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("action", endpoint.action());
        for (key, value) in params {
            if value.as_ref().is_empty() {
                continue;
            }
            query.append_pair(key.as_ref(), value.as_ref());
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://script.google.com/macros/s/deployment/exec";

    #[test]
    fn action_names_are_unique() {
        let mut actions: Vec<_> = Endpoint::ALL.iter().map(|e| e.action()).collect();
        actions.sort_unstable();
        actions.dedup();
        assert_eq!(actions.len(), Endpoint::ALL.len());
    }

    #[test]
    fn builds_url_without_params() {
        let url = api_url::<&str, &str>(BASE, Endpoint::Status, &[]).unwrap();
        assert_eq!(url.as_str(), format!("{BASE}?action=status"));
    }

    #[test]
    fn encodes_params_in_order() {
        let url = api_url(
            BASE,
            Endpoint::SearchProducts,
            &[("query", "olive oil & salt")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            format!("{BASE}?action=searchProducts&query=olive+oil+%26+salt")
        );
    }

    #[test]
    fn skips_empty_params() {
        let url = api_url(
            BASE,
            Endpoint::GetProducts,
            &[("category", ""), ("supplier", "acme")],
        )
        .unwrap();
        assert_eq!(url.query(), Some("action=getProducts&supplier=acme"));
    }

    #[test]
    fn keeps_existing_query() {
        let url = api_url::<&str, &str>("https://api.dsog.com/exec?v=2", Endpoint::GetUpdates, &[])
            .unwrap();
        assert_eq!(url.query(), Some("v=2&action=getUpdates"));
    }

    #[test]
    fn rejects_relative_base() {
        assert!(api_url::<&str, &str>("/exec", Endpoint::Status, &[]).is_err());
    }

    #[test]
    fn sensitive_endpoints() {
        assert!(Endpoint::Login.is_sensitive());
        assert!(Endpoint::GoogleLogin.is_sensitive());
        assert!(Endpoint::RegisterUser.is_sensitive());
        assert!(!Endpoint::GetStats.is_sensitive());
    }
}
