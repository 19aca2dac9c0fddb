//! HTTP client for the portal backend. Every operation is a `GET` against the
//! backend URL with an `action` parameter and returns the backend's JSON
//! envelope. Requests share one timeout policy and one error mapping; the
//! client never logs passwords or credentials.

use crate::{
    portal::{
        endpoints::{api_url, Endpoint},
        error::{Error, Result},
    },
    APP_USER_AGENT,
};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default request timeout applied to every backend call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Response envelope shared by all backend actions.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    /// Backend message, or `fallback` when the backend sent none.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// New account details sent when a Google user is not yet known.
#[derive(Debug)]
pub struct Registration<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub auth_method: &'a str,
    pub token: &'a SecretString,
}

#[derive(Clone, Debug)]
pub struct PortalClient {
    http: Client,
    base_url: String,
}

impl PortalClient {
    /// Builds a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP client
    /// cannot be created.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub(crate) fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url.trim())?;

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim().to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<ApiResponse> {
        self.call(Endpoint::Status, &[]).await
    }

    /// Password login.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<ApiResponse> {
        self.call(
            Endpoint::Login,
            &[("email", email), ("password", password.expose_secret())],
        )
        .await
    }

    /// Forwards a Google credential for verification and session issuance.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self, credential))]
    pub async fn google_login(
        &self,
        credential: &SecretString,
        email: &str,
    ) -> Result<ApiResponse> {
        self.call(
            Endpoint::GoogleLogin,
            &[("token", credential.expose_secret()), ("email", email)],
        )
        .await
    }

    /// Creates a backend account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self, registration), fields(email = registration.email))]
    pub async fn register_user(&self, registration: &Registration<'_>) -> Result<ApiResponse> {
        self.call(
            Endpoint::RegisterUser,
            &[
                ("email", registration.email),
                ("name", registration.name),
                ("auth_method", registration.auth_method),
                ("token", registration.token.expose_secret()),
            ],
        )
        .await
    }

    /// Lists products, optionally filtered by category and supplier.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        category: Option<&str>,
        supplier: Option<&str>,
    ) -> Result<ApiResponse> {
        self.call(
            Endpoint::GetProducts,
            &[
                ("category", category.unwrap_or_default()),
                ("supplier", supplier.unwrap_or_default()),
            ],
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<ApiResponse> {
        self.call(Endpoint::SearchProducts, &[("query", query)]).await
    }

    /// Places an order described by arbitrary `key=value` fields.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    pub async fn place_order(&self, fields: &[(String, String)]) -> Result<ApiResponse> {
        let params: Vec<(&str, &str)> = fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        self.call(Endpoint::PlaceOrder, &params).await
    }

    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self))]
    pub async fn materials(&self, category: Option<&str>) -> Result<ApiResponse> {
        self.call(
            Endpoint::GetMaterials,
            &[("category", category.unwrap_or_default())],
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self))]
    pub async fn updates(&self) -> Result<ApiResponse> {
        self.call(Endpoint::GetUpdates, &[]).await
    }

    /// # Errors
    ///
    /// Returns an error on transport failures or non-2xx responses.
    #[instrument(skip(self))]
    pub async fn franchise_stats(&self, franchise_id: &str) -> Result<ApiResponse> {
        self.call(Endpoint::GetStats, &[("franchise_id", franchise_id)])
            .await
    }

    async fn call(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> Result<ApiResponse> {
        let url = api_url(&self.base_url, endpoint, params)?;

        if endpoint.is_sensitive() {
            debug!(action = %endpoint, "sending request");
        } else {
            debug!(action = %endpoint, %url, "sending request");
        }

        // Query strings may carry passwords, so the url is stripped from errors.
        let response = self.http.get(url).send().await.map_err(|err| {
            let err = err.without_url();
            warn!(action = %endpoint, "request failed: {err}");
            Error::from(err)
        })?;

        handle_json_response(response).await
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response(response: Response) -> Result<ApiResponse> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<ApiResponse>()
            .await
            .map_err(|err| Error::Parse(err.without_url().to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(Error::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

/// Trims and truncates an error body for display.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
