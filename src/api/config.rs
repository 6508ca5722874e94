//! Request configuration injected into the client. The CSRF token and session
//! cookie are held as secrets and only exposed when a header is written.

use super::errors::AppError;
use secrecy::SecretString;
use url::Url;

/// Connection settings for one space backend.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub csrf_token: SecretString,
    pub session_cookie: Option<SecretString>,
}

impl ApiConfig {
    /// Builds a config from raw values, normalizing the base URL so relative
    /// action paths resolve beneath it.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the base URL is not an absolute http(s) URL.
    pub fn new(
        base_url: &str,
        csrf_token: SecretString,
        session_cookie: Option<SecretString>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            csrf_token,
            session_cookie,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Config("base URL is empty".to_string()));
    }

    let mut url =
        Url::parse(trimmed).map_err(|err| AppError::Config(format!("invalid base URL: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::Config(format!(
                "unsupported base URL scheme: {scheme}"
            )))
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
