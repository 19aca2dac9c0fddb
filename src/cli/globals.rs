use crate::portal::{AllowList, PortalClient, SessionStore};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub session_path: PathBuf,
    pub allow_list: AllowList,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(session_path: PathBuf) -> Self {
        Self {
            api_url: None,
            session_path,
            allow_list: AllowList::default(),
        }
    }

    pub fn set_api_url(&mut self, api_url: String) {
        self.api_url = Some(api_url);
    }

    #[must_use]
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(&self.session_path)
    }

    /// Client for the configured backend.
    ///
    /// # Errors
    /// Returns an error if no backend URL was configured or it is invalid.
    pub fn client(&self) -> Result<PortalClient> {
        let api_url = self
            .api_url
            .as_deref()
            .context("missing required argument: --api-url")?;
        PortalClient::new(api_url).with_context(|| format!("invalid backend url: {api_url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(PathBuf::from("/tmp/session.json"));
        assert_eq!(args.api_url, None);
        assert!(args.allow_list.is_empty());
        assert_eq!(
            args.session_store().path(),
            PathBuf::from("/tmp/session.json").as_path()
        );
        assert!(args.client().is_err());
    }

    #[test]
    fn test_client_uses_api_url() {
        let mut args = GlobalArgs::new(PathBuf::from("/tmp/session.json"));
        args.set_api_url("https://backend.dsog.com/exec".to_string());
        let client = args.client().unwrap();
        assert_eq!(client.base_url(), "https://backend.dsog.com/exec");
    }
}
