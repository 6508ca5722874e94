use crate::api::{ApiConfig, SpaceClient};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub base_url: String,
    pub csrf_token: SecretString,
    pub session_cookie: Option<SecretString>,
    pub page: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(base_url: String, page: PathBuf) -> Self {
        Self {
            base_url,
            csrf_token: SecretString::default(),
            session_cookie: None,
            page,
        }
    }

    pub fn set_csrf_token(&mut self, token: SecretString) {
        self.csrf_token = token;
    }

    pub fn set_session_cookie(&mut self, cookie: SecretString) {
        self.session_cookie = Some(cookie);
    }

    /// Build the request client; every mutating request needs a CSRF token.
    ///
    /// # Errors
    /// Returns an error if the CSRF token is missing or the base URL is invalid.
    pub fn client(&self) -> Result<SpaceClient> {
        if self.csrf_token.expose_secret().trim().is_empty() {
            return Err(anyhow!("missing required argument: --csrf-token"));
        }

        let config = ApiConfig::new(
            &self.base_url,
            self.csrf_token.clone(),
            self.session_cookie.clone(),
        )
        .context("invalid SPACES_BASE_URL")?;

        Ok(SpaceClient::new(config)?)
    }
}
