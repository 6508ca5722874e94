//! HTTP layer for the space backend with a consistent header, origin and timeout
//! policy. Feature code calls [`SpaceClient::send_json`] and inspects the
//! returned [`ApiResponse`] itself, since the membership flows branch on the
//! exact status code rather than on success classes.

pub mod config;
pub mod errors;

pub use self::config::ApiConfig;
pub use self::errors::AppError;

use self::errors::map_request_error;
use reqwest::{multipart::Form, redirect::Policy, Client, Method, StatusCode};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use ulid::Ulid;
use url::Url;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum number of body characters written to debug logs.
const MAX_LOGGED_CHARS: usize = 200;

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    /// Returns `AppError::Parse` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_str(&self.body)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    }

    /// Best-effort `message` field of a JSON body.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        serde_json::from_str::<Value>(&self.body)
            .ok()?
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Clone, Debug)]
pub struct SpaceClient {
    http: Client,
    config: ApiConfig,
}

impl SpaceClient {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::none())
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Resolve an action URL against the base URL the way a browser resolves a
    /// form action, enforcing same-origin.
    ///
    /// # Errors
    /// Returns `AppError::Config` for unparsable targets and `AppError::CrossOrigin`
    /// when the target leaves the base origin.
    pub fn resolve(&self, target: &str) -> Result<Url, AppError> {
        let target = target.trim();
        let url = self
            .config
            .base_url
            .join(target)
            .map_err(|err| AppError::Config(format!("invalid action URL {target}: {err}")))?;

        if url.origin() != self.config.base_url.origin() {
            return Err(AppError::CrossOrigin(url.to_string()));
        }

        Ok(url)
    }

    /// Send a JSON body with the CSRF and session headers attached.
    ///
    /// # Errors
    /// Returns an error if the body cannot be encoded, the target is not same-origin,
    /// or the request fails before a response is received.
    pub async fn send_json<B: Serialize>(
        &self,
        method: Method,
        target: &str,
        body: &B,
    ) -> Result<ApiResponse, AppError> {
        let url = self.resolve(target)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;

        let request = self
            .http
            .request(method.clone(), url.clone())
            .header("Content-Type", "application/json")
            .body(payload);

        self.dispatch(method, url, request).await
    }

    /// Send a multipart form with the CSRF and session headers attached.
    ///
    /// # Errors
    /// Returns an error if the target is not same-origin or the request fails.
    pub async fn send_multipart(&self, target: &str, form: Form) -> Result<ApiResponse, AppError> {
        let url = self.resolve(target)?;
        let request = self.http.post(url.clone()).multipart(form);

        self.dispatch(Method::POST, url, request).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, AppError> {
        let request_id = Ulid::new().to_string();
        let mut request = request
            .header("X-CSRFToken", self.config.csrf_token.expose_secret())
            .header("X-Request-Id", request_id.as_str());

        if let Some(cookie) = &self.config.session_cookie {
            request = request.header("Cookie", cookie.expose_secret());
        }

        let span = info_span!(
            "spaces.request",
            http.method = %method,
            url = %url,
            request_id = %request_id
        );

        read_response(request).instrument(span).await
    }
}

async fn read_response(request: reqwest::RequestBuilder) -> Result<ApiResponse, AppError> {
    let response = request.send().await.map_err(|err| map_request_error(&err))?;
    let status = response.status();
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.map_err(|err| map_request_error(&err))?;

    debug!(
        status = status.as_u16(),
        body = %truncate(&body),
        "response received"
    );

    Ok(ApiResponse {
        status,
        location,
        body,
    })
}

fn truncate(body: &str) -> String {
    body.trim().chars().take(MAX_LOGGED_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{ApiConfig, ApiResponse, AppError, SpaceClient};
    use anyhow::Result;
    use reqwest::{Method, StatusCode};
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(base_url: &str) -> SpaceClient {
        let config = ApiConfig::new(
            base_url,
            SecretString::from("csrf-token"),
            Some(SecretString::from("sessionid=abc")),
        )
        .unwrap();
        SpaceClient::new(config).unwrap()
    }

    #[test]
    fn resolve_joins_relative_and_rooted_paths() {
        let client = client("https://portal.example/");
        assert_eq!(
            client.resolve("spaces/api/manager/").unwrap().as_str(),
            "https://portal.example/spaces/api/manager/"
        );
        assert_eq!(
            client.resolve("/spaces/api/writer/").unwrap().as_str(),
            "https://portal.example/spaces/api/writer/"
        );
        assert_eq!(
            client
                .resolve("https://portal.example/spaces/7/file_upload")
                .unwrap()
                .as_str(),
            "https://portal.example/spaces/7/file_upload"
        );
    }

    #[test]
    fn resolve_follows_browser_rules_under_a_base_path() {
        let client = client("https://portal.example/app/");
        assert_eq!(
            client.resolve("spaces/api/manager/").unwrap().as_str(),
            "https://portal.example/app/spaces/api/manager/"
        );
        assert_eq!(
            client.resolve("/spaces/api/manager/").unwrap().as_str(),
            "https://portal.example/spaces/api/manager/"
        );
    }

    #[test]
    fn resolve_refuses_other_origins() {
        let client = client("https://portal.example/");
        assert!(matches!(
            client.resolve("https://other.example/spaces/api/manager/"),
            Err(AppError::CrossOrigin(_))
        ));
        assert!(matches!(
            client.resolve("http://portal.example/spaces/api/manager/"),
            Err(AppError::CrossOrigin(_))
        ));
    }

    #[test]
    fn message_is_best_effort() {
        let response = ApiResponse {
            status: StatusCode::BAD_REQUEST,
            location: None,
            body: r#"{"message":"The user does not exist"}"#.to_string(),
        };
        assert_eq!(
            response.message().as_deref(),
            Some("The user does not exist")
        );

        let html = ApiResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            location: None,
            body: "<html>oops</html>".to_string(),
        };
        assert_eq!(html.message(), None);
        assert!(matches!(
            html.json::<serde_json::Value>(),
            Err(AppError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn send_json_attaches_csrf_and_session_headers() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/spaces/api/manager/"))
            .and(header("X-CSRFToken", "csrf-token"))
            .and(header("Cookie", "sessionid=abc"))
            .and(header("Content-Type", "application/json"))
            .and(header_exists("X-Request-Id"))
            .and(body_json(json!({ "email": "a@x.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "changed": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let response = client
            .send_json(
                Method::POST,
                "spaces/api/manager/",
                &json!({ "email": "a@x.com" }),
            )
            .await?;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, r#"{"changed":true}"#);
        Ok(())
    }

    #[tokio::test]
    async fn send_json_does_not_follow_redirects() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/spaces/api/writer/"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/accounts/login/"),
            )
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let response = client
            .send_json(
                Method::DELETE,
                "spaces/api/writer/",
                &json!({ "email": "b@x.com" }),
            )
            .await?;
        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(response.location.as_deref(), Some("/accounts/login/"));
        Ok(())
    }

    #[tokio::test]
    async fn send_json_maps_connection_failures() {
        let listener = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener,
            Err(_) => {
                eprintln!("Skipping test: cannot bind localhost");
                return;
            }
        };
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(&format!("http://{addr}"));
        let result = client
            .send_json(Method::POST, "spaces/api/manager/", &json!({ "email": "a@x.com" }))
            .await;
        assert!(matches!(result, Err(AppError::Network(_))));
    }
}
