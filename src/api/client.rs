//! Dashboard server client
//!
//! Plain JSON-over-HTTP calls against the status, refresh, rebalance and
//! language endpoints. Session authentication is a `sessionid` cookie.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::api::types::{RebalanceResponse, RefreshResponse, SetLanguageForm, StatusResponse};
use crate::consts::cli_consts::http::{connect_timeout, rebalance_timeout, request_timeout};
use crate::i18n::Language;
use reqwest::header::{COOKIE, HeaderMap, REFERER, SET_COOKIE};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("rebalance-dash/", env!("CARGO_PKG_VERSION"));

const CSRF_COOKIE: &str = "csrftoken";
const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, Error)]
#[error("invalid URL '{url}': {reason}")]
pub struct EndpointError {
    pub url: String,
    pub reason: String,
}

/// Where each server operation lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub status_url: String,
    pub refresh_url: String,
    pub rebalance_url: String,
    pub set_language_url: String,
}

impl Endpoints {
    /// Default routes of the dashboard app mounted at `base_url`.
    pub fn from_base(base_url: &str) -> Result<Self, EndpointError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized).map_err(|e| EndpointError {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let join = |path: &str| -> Result<String, EndpointError> {
            base.join(path)
                .map(String::from)
                .map_err(|e| EndpointError {
                    url: format!("{}{}", normalized, path),
                    reason: e.to_string(),
                })
        };

        Ok(Self {
            base_url: base.to_string(),
            status_url: join("status/")?,
            refresh_url: join("refresh_portfolio/")?,
            rebalance_url: join("manual_rebalance/")?,
            // Language switching is a site-wide route, not part of the dashboard app.
            set_language_url: join("/i18n/setlang/")?,
        })
    }

    pub fn with_status_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.status_url = url;
        }
        self
    }

    pub fn with_refresh_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.refresh_url = url;
        }
        self
    }

    pub fn with_rebalance_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.rebalance_url = url;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct StatusClient {
    client: Client,
    endpoints: Endpoints,
    session_cookie: Option<String>,
    csrf_token: Option<String>,
}

impl StatusClient {
    pub fn new(endpoints: Endpoints) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout())
            .build()?;
        Ok(Self {
            client,
            endpoints,
            session_cookie: None,
            csrf_token: None,
        })
    }

    pub fn with_session_cookie(mut self, session_cookie: Option<String>) -> Self {
        self.session_cookie = session_cookie;
        self
    }

    pub fn with_csrf_token(mut self, csrf_token: Option<String>) -> Self {
        self.csrf_token = csrf_token;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn cookie_header(&self, csrf_token: Option<&str>) -> Option<String> {
        let mut cookies = Vec::new();
        if let Some(session) = &self.session_cookie {
            cookies.push(format!("{}={}", SESSION_COOKIE, session));
        }
        if let Some(token) = csrf_token {
            cookies.push(format!("{}={}", CSRF_COOKIE, token));
        }
        (!cookies.is_empty()).then(|| cookies.join("; "))
    }

    fn with_common_headers(
        &self,
        request: RequestBuilder,
        csrf_token: Option<&str>,
    ) -> RequestBuilder {
        let request = request.header("User-Agent", USER_AGENT);
        match self.cookie_header(csrf_token) {
            Some(cookies) => request.header(COOKIE, cookies),
            None => request,
        }
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<T, ApiError> {
        log::debug!("GET {}", url);
        let response = self
            .with_common_headers(self.client.get(url).timeout(timeout), None)
            .send()
            .await?;

        // Protected views answer an expired session with a redirect to the login page.
        if redirected_to_login(url, response.url()) {
            return Err(ApiError::LoginRequired(response.url().to_string()));
        }
        let response = Self::handle_response_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Token from configuration, or the one the site hands out with its landing page.
    async fn csrf_token(&self) -> Result<String, ApiError> {
        if let Some(token) = &self.csrf_token {
            return Ok(token.clone());
        }
        let request = self
            .client
            .get(&self.endpoints.base_url)
            .timeout(request_timeout());
        let response = self
            .with_common_headers(request, None)
            .send()
            .await?;
        csrf_token_from_headers(response.headers()).ok_or(ApiError::MissingCsrfToken)
    }
}

/// Whether a request for `requested` ended up on the login page.
fn redirected_to_login(requested: &str, landed: &Url) -> bool {
    let is_login = |path: &str| path.ends_with("/login/") || path.ends_with("/login");
    is_login(landed.path())
        && !Url::parse(requested).is_ok_and(|requested| is_login(requested.path()))
}

/// Extract the `csrftoken` cookie value from `Set-Cookie` headers.
fn csrf_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|token| !token.is_empty())
}

#[async_trait::async_trait]
impl DashboardApi for StatusClient {
    async fn fetch_status(&self) -> Result<StatusResponse, ApiError> {
        self.get_json(&self.endpoints.status_url, request_timeout())
            .await
    }

    async fn refresh_portfolio(&self) -> Result<RefreshResponse, ApiError> {
        self.get_json(&self.endpoints.refresh_url, request_timeout())
            .await
    }

    async fn trigger_rebalance(&self) -> Result<RebalanceResponse, ApiError> {
        self.get_json(&self.endpoints.rebalance_url, rebalance_timeout())
            .await
    }

    async fn set_language(&self, language: Language, next: &str) -> Result<(), ApiError> {
        let token = self.csrf_token().await?;
        let form = SetLanguageForm {
            language: language.code().to_string(),
            next: next.to_string(),
        };
        let request = self
            .client
            .post(&self.endpoints.set_language_url)
            .timeout(request_timeout())
            .header("X-CSRFToken", token.as_str())
            // Django rejects HTTPS form posts without a same-origin referer.
            .header(REFERER, self.endpoints.base_url.as_str())
            .form(&form);
        let response = self
            .with_common_headers(request, Some(&token))
            .send()
            .await?;

        // The view answers with a redirect to `next`; anything below 400 is fine.
        if response.status().is_client_error() || response.status().is_server_error() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn endpoints_follow_dashboard_routes() {
        let endpoints = Endpoints::from_base("http://127.0.0.1:8000/dashboard").unwrap();
        assert_eq!(endpoints.base_url, "http://127.0.0.1:8000/dashboard/");
        assert_eq!(endpoints.status_url, "http://127.0.0.1:8000/dashboard/status/");
        assert_eq!(
            endpoints.refresh_url,
            "http://127.0.0.1:8000/dashboard/refresh_portfolio/"
        );
        assert_eq!(
            endpoints.rebalance_url,
            "http://127.0.0.1:8000/dashboard/manual_rebalance/"
        );
        assert_eq!(
            endpoints.set_language_url,
            "http://127.0.0.1:8000/i18n/setlang/"
        );
    }

    #[test]
    fn endpoint_overrides_replace_defaults() {
        let endpoints = Endpoints::from_base("https://example.com")
            .unwrap()
            .with_status_url(Some("https://example.com/api/status".to_string()))
            .with_refresh_url(None);
        assert_eq!(endpoints.status_url, "https://example.com/api/status");
        assert_eq!(endpoints.refresh_url, "https://example.com/refresh_portfolio/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Endpoints::from_base("not a url").unwrap_err();
        assert_eq!(err.url, "not a url");
    }

    #[test]
    fn csrf_token_is_read_from_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("sessionid=abc; HttpOnly; Path=/"),
        );
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("csrftoken=tok%2Ben; Path=/; SameSite=Lax"),
        );
        assert_eq!(csrf_token_from_headers(&headers), Some("tok+en".to_string()));
    }

    #[test]
    fn missing_csrf_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("csrftoken=; Path=/"));
        assert_eq!(csrf_token_from_headers(&headers), None);
    }

    #[test]
    fn login_redirect_is_detected() {
        let landed =
            Url::parse("http://127.0.0.1:8000/dashboard/login/?next=/dashboard/status/").unwrap();
        assert!(redirected_to_login(
            "http://127.0.0.1:8000/dashboard/status/",
            &landed
        ));

        let status = Url::parse("http://127.0.0.1:8000/dashboard/status/").unwrap();
        assert!(!redirected_to_login(
            "http://127.0.0.1:8000/dashboard/status/",
            &status
        ));
        // An endpoint override that really is called `login` is not a redirect.
        let login = Url::parse("http://host/api/login/").unwrap();
        assert!(!redirected_to_login("http://host/api/login/", &login));
    }

    #[test]
    fn rebalance_gets_a_longer_timeout() {
        assert!(rebalance_timeout() > request_timeout());
        assert_eq!(request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn cookie_header_combines_session_and_csrf() {
        let client = StatusClient::new(Endpoints::from_base("http://localhost").unwrap())
            .unwrap()
            .with_session_cookie(Some("s3ss".to_string()));
        assert_eq!(
            client.cookie_header(Some("tok")),
            Some("sessionid=s3ss; csrftoken=tok".to_string())
        );
        assert_eq!(client.cookie_header(None), Some("sessionid=s3ss".to_string()));

        let anonymous =
            StatusClient::new(Endpoints::from_base("http://localhost").unwrap()).unwrap();
        assert_eq!(anonymous.cookie_header(None), None);
    }
}
