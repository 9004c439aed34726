//! Single egress path for backend calls.
//!
//! Every request goes through [`Gateway::send`], which attaches the
//! current access credential, detects credential expiry (401) and
//! performs at most one renewal round-trip followed by one redispatch
//! of the original call. Renewal is serialized so that concurrent 401s
//! share a single refresh instead of racing the persisted credential.

use anyhow::{anyhow, Result};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info_span, warn, Instrument};
use url::Url;

use crate::session::SessionStore;
use crate::APP_USER_AGENT;

/// Routes that authenticate by themselves; the bearer header is never
/// attached to them and a 401 from them is final.
const AUTH_EXEMPT: [&str; 3] = ["/auth/login", "/auth/registro", "/auth/refresh"];

/// Outbound call description, retained so the same call can be
/// redispatched once after a credential renewal.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body: Some(body),
        }
    }

    fn exempt(&self) -> bool {
        AUTH_EXEMPT.contains(&self.path.as_str())
    }
}

pub struct Gateway {
    http: Client,
    base_url: String,
    store: Arc<SessionStore>,
    renewal: Mutex<()>,
}

impl Gateway {
    /// # Errors
    /// Returns an error if `base_url` is not a valid http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Result<Self> {
        let base_url = base_url.into();
        endpoint_url(&base_url, "/")?;

        let http = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            http,
            base_url,
            store,
            renewal: Mutex::new(()),
        })
    }

    /// Dispatch a request, renewing the access credential once on 401.
    ///
    /// # Errors
    /// Network-level failures on the original call or the renewal call
    /// propagate to the caller; they are not retried. Non-success
    /// statuses are not errors here, the response is returned as-is.
    pub async fn send(&self, request: ApiRequest) -> Result<Response> {
        let token = if request.exempt() {
            None
        } else {
            self.store.access_token()
        };

        let response = self.dispatch(&request, token.as_ref()).await?;

        if request.exempt() || response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        self.renew_and_retry(request, token, response).await
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&SecretString>) -> Result<Response> {
        let url = endpoint_url(&self.base_url, &request.path)?;

        let mut builder = self.http.request(request.method.clone(), &url);

        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let span = info_span!(
            "api.send",
            http.method = %request.method,
            url = %url
        );
        Ok(builder.send().instrument(span).await?)
    }

    async fn renew_and_retry(
        &self,
        request: ApiRequest,
        stale: Option<SecretString>,
        original: Response,
    ) -> Result<Response> {
        let guard = self.renewal.lock().await;

        // Another caller may have already renewed while we waited on
        // the lock; in that case the fresh credential is enough.
        if let Some(current) = self.store.access_token() {
            let renewed = match &stale {
                Some(stale) => current.expose_secret() != stale.expose_secret(),
                None => true,
            };
            if renewed {
                debug!("credential already renewed, redispatching");
                drop(guard);
                return self.dispatch(&request, Some(&current)).await;
            }
        }

        let Some(refresh_token) = self.store.refresh_token() else {
            warn!("401 with no renewal credential, destroying session");
            self.store.clear()?;
            return Ok(original);
        };

        match self.renew(&refresh_token).await? {
            Some(access_token) => {
                self.store.replace_access_token(access_token.clone())?;
                drop(guard);
                self.dispatch(&request, Some(&access_token)).await
            }
            None => {
                warn!("credential renewal rejected, destroying session");
                self.store.clear()?;
                Ok(original)
            }
        }
    }

    /// One renewal round-trip. `Ok(None)` means the backend rejected
    /// the renewal credential; transport errors bubble up and leave the
    /// session untouched.
    async fn renew(&self, refresh_token: &SecretString) -> Result<Option<SecretString>> {
        let url = endpoint_url(&self.base_url, "/auth/refresh")?;

        let payload = json!({
            "refreshToken": refresh_token.expose_secret()
        });

        let span = info_span!(
            "api.refresh",
            http.method = "POST",
            url = %url
        );
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            debug!("refresh rejected: {}", response.status());
            return Ok(None);
        }

        let json_response: Value = response.json().await?;

        let access_token = json_response
            .get("accessToken")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Error parsing JSON response: no accessToken found"))?;

        Ok(Some(SecretString::from(access_token.to_string())))
    }
}

/// # Errors
/// Returns an error if `base` cannot be parsed, has no host, or uses an
/// unsupported scheme.
pub fn endpoint_url(base: &str, path: &str) -> Result<String> {
    let url = Url::parse(base)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
    }

    if url.host().is_none() {
        return Err(anyhow!("Error parsing URL: no host specified"));
    }

    Ok(format!("{}{}", base.trim_end_matches('/'), path))
}
