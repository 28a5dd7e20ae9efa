//! Client layer: request assembly, per-attempt timeout, retry with backoff and
//! response classification, plus the resource facades built on top of it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{Deleted, ListOptions, ValidationError};
use crate::error::SendlyError;
use crate::transport::{self, DeletedWire};

mod account;
mod campaigns;
mod config;
mod contacts;
mod http_transport;
mod messages;
mod rate_limit;
mod request;
mod retry;
#[cfg(test)]
pub(crate) mod testing;
mod webhooks;

pub use account::AccountApi;
pub use campaigns::Campaigns;
pub use config::{
    ApiKey, ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT,
    KeyEnvironment, env,
};
pub use contacts::{ContactLists, Contacts};
pub use http_transport::{
    BoxFuture, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};
pub use messages::Messages;
pub use rate_limit::RateLimitInfo;
pub use request::RequestOptions;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use webhooks::Webhooks;

use rate_limit::RateLimitState;

/// `User-Agent` sent unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("sendly-rust/", env!("CARGO_PKG_VERSION"));

const JSON: &str = "application/json";
const INTERNAL_ERROR: &str = "internal_error";

#[derive(Clone)]
/// Builder for [`SendlyClient`].
///
/// Use this when you need a custom base URL, timeout, retry budget, or an
/// injected transport.
pub struct SendlyClientBuilder {
    api_key: ApiKey,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    user_agent: Option<String>,
    retry_policy: RetryPolicy,
    transport: Option<Arc<dyn HttpTransport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl SendlyClientBuilder {
    /// Create a builder with the default base URL, a 30 second timeout and 3 retries.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: None,
            retry_policy: RetryPolicy::default(),
            transport: None,
            sleeper: None,
        }
    }

    /// Configure from `SENDLY_*` environment variables.
    ///
    /// `SENDLY_API_KEY` is required. `SENDLY_BASE_URL`, `SENDLY_TIMEOUT_MS` and
    /// `SENDLY_MAX_RETRIES` override the defaults when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`SendlyClientBuilder::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = read(env::API_KEY).ok_or(ConfigError::MissingEnv { name: env::API_KEY })?;
        let mut builder = Self::new(ApiKey::new(api_key)?);

        if let Some(base_url) = read(env::BASE_URL) {
            builder = builder.base_url(base_url);
        }
        if let Some(value) = read(env::TIMEOUT_MS) {
            let millis: u64 = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: env::TIMEOUT_MS,
                value: value.clone(),
            })?;
            builder = builder.timeout(Duration::from_millis(millis));
        }
        if let Some(value) = read(env::MAX_RETRIES) {
            let retries: u32 = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: env::MAX_RETRIES,
                value: value.clone(),
            })?;
            builder = builder.max_retries(retries);
        }

        Ok(builder)
    }

    /// Override the API root. Must be `https`, or `http` for `localhost`/`127.0.0.1`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-attempt timeout. Must be non-zero.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retries after the first attempt. `0` disables retrying.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the backoff schedule between retries.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Use a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use a custom sleeper between retries.
    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Some(Arc::new(sleeper));
        self
    }

    /// Validate the configuration and build a [`SendlyClient`].
    pub fn build(self) -> Result<SendlyClient, ConfigError> {
        let config = ClientConfig::new(
            self.api_key,
            &self.base_url,
            self.timeout,
            self.max_retries,
        )?;

        let user_agent = match self.user_agent {
            Some(user_agent) => http::HeaderValue::from_str(&user_agent)
                .map_err(|_| ConfigError::InvalidUserAgent(user_agent))?,
            None => http::HeaderValue::from_static(DEFAULT_USER_AGENT),
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(ConfigError::HttpClient)?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(SendlyClient {
            config: Arc::new(config),
            user_agent,
            retry_policy: self.retry_policy,
            http: transport,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            rate_limit: Arc::default(),
        })
    }
}

impl fmt::Debug for SendlyClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendlyClientBuilder")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("user_agent", &self.user_agent)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
/// High-level Sendly client.
///
/// Every call goes through [`SendlyClient::request`], which:
/// - joins the path onto the base URL and appends query parameters,
/// - sends bearer auth and JSON headers,
/// - bounds each attempt by the configured timeout,
/// - retries transient failures with exponential backoff,
/// - maps error responses to [`SendlyError`].
///
/// Clones share the transport and the rate-limit snapshot.
pub struct SendlyClient {
    config: Arc<ClientConfig>,
    user_agent: http::HeaderValue,
    retry_policy: RetryPolicy,
    http: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    rate_limit: Arc<RateLimitState>,
}

impl SendlyClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`SendlyClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            config: Arc::new(ClientConfig::with_defaults(api_key)),
            user_agent: http::HeaderValue::from_static(DEFAULT_USER_AGENT),
            retry_policy: RetryPolicy::default(),
            http: Arc::new(ReqwestTransport::new(reqwest::Client::new())),
            sleeper: Arc::new(TokioSleeper),
            rate_limit: Arc::default(),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> SendlyClientBuilder {
        SendlyClientBuilder::new(api_key)
    }

    /// Build a client from `SENDLY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        SendlyClientBuilder::from_env()?.build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Last rate-limit state reported by the API, if any response carried it.
    pub fn rate_limit(&self) -> Option<RateLimitInfo> {
        self.rate_limit.get()
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    pub fn contact_lists(&self) -> ContactLists<'_> {
        ContactLists::new(self)
    }

    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self)
    }

    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    /// Perform one logical API call and decode the JSON response into `T`.
    ///
    /// Attempts run strictly one after another, at most `max_retries + 1` times.
    /// HTTP 400, 401, 402, 403, 404 and rate-limit errors are returned without
    /// retrying. An undecodable success body is retried like a server error.
    pub async fn request<T: DeserializeOwned>(
        &self,
        options: RequestOptions,
    ) -> Result<T, SendlyError> {
        let request = self.build_request(&options)?;
        let max_retries = self.config.max_retries();
        let mut last_error = None;

        for attempt in 0..=max_retries {
            tracing::debug!(
                method = %request.method,
                path = %options.path,
                attempt,
                "sending request"
            );

            match self.attempt(request.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    if attempt < max_retries {
                        let delay = self.retry_policy.backoff(attempt);
                        tracing::warn!(
                            method = %request.method,
                            path = %options.path,
                            attempt,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            error = %err,
                            "request failed; retrying"
                        );
                        self.sleeper.sleep(delay).await;
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SendlyError::network("request failed after retries", None)))
    }

    /// `DELETE path`, accepting either a `{id, deleted}` body or an empty `204`.
    async fn delete_resource(&self, path: String, id: &str) -> Result<Deleted, SendlyError> {
        let ack: Option<DeletedWire> = self.request(RequestOptions::delete(path)).await?;
        Ok(match ack {
            Some(ack) => Deleted {
                id: ack.id.unwrap_or_else(|| id.to_owned()),
                deleted: ack.deleted,
            },
            None => Deleted {
                id: id.to_owned(),
                deleted: true,
            },
        })
    }

    async fn attempt<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, SendlyError> {
        let timeout = self.config.timeout();
        let response = match tokio::time::timeout(timeout, self.http.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(SendlyError::network(err.to_string(), Some(err))),
            Err(_) => return Err(SendlyError::Timeout { timeout }),
        };

        if let Some(info) = self.rate_limit.observe(&response.headers) {
            tracing::debug!(
                limit = info.limit,
                remaining = info.remaining,
                reset = info.reset,
                "rate limit updated"
            );
        }

        let status = response.status.as_u16();
        if !response.status.is_success() {
            return Err(SendlyError::from_wire(status, error_body(&response)));
        }

        decode_success(&response).map_err(|source| SendlyError::Decode { status, source })
    }

    fn build_request(&self, options: &RequestOptions) -> Result<HttpRequest, SendlyError> {
        let invalid_path = || ValidationError::InvalidPath {
            input: options.path.clone(),
        };
        let path = options.path.strip_prefix('/').unwrap_or(&options.path);
        // Queries must be added with `RequestOptions::query`.
        if path.contains(['?', '#']) || path.chars().any(char::is_control) {
            return Err(invalid_path().into());
        }
        let mut url = url::Url::parse(&format!("{}/{path}", self.config.base_url()))
            .map_err(|_| invalid_path())?;
        if !options.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &options.query {
                pairs.append_pair(name, value);
            }
        }

        let mut headers = http::HeaderMap::new();
        let mut authorization =
            http::HeaderValue::from_str(&format!("Bearer {}", self.config.api_key().expose()))
                .map_err(|_| ConfigError::InvalidApiKey)?;
        authorization.set_sensitive(true);
        headers.insert(http::header::AUTHORIZATION, authorization);
        headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static(JSON));
        headers.insert(http::header::ACCEPT, http::HeaderValue::from_static(JSON));
        headers.insert(http::header::USER_AGENT, self.user_agent.clone());

        for (name, value) in &options.headers {
            let invalid = || ValidationError::InvalidHeader { name: name.clone() };
            let header_name =
                http::HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = http::HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        Ok(HttpRequest {
            method: options.method.clone(),
            url,
            headers,
            body: options
                .body
                .as_ref()
                .map(|body| body.to_string().into_bytes()),
        })
    }
}

impl fmt::Debug for SendlyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendlyClient")
            .field("config", &self.config)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

fn with_page(mut options: RequestOptions, page: &ListOptions) -> RequestOptions {
    for (name, value) in transport::encode_list_query(page) {
        options = options.query(name, value);
    }
    options
}

/// Decode a 2xx body. JSON bodies are read from the raw bytes; an empty body
/// decodes as `null` and any other body as a JSON string.
fn decode_success<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, serde_json::Error> {
    if response.is_json() && !is_blank(&response.body) {
        serde_json::from_slice(&response.body)
    } else {
        serde_json::from_value(text_body(response))
    }
}

/// Error body normalized to `{error, message, ...}` for [`SendlyError::from_wire`].
fn error_body(response: &HttpResponse) -> Value {
    let fallback_message = format!("HTTP {}", response.status.as_u16());
    let parsed = if response.is_json() && !is_blank(&response.body) {
        serde_json::from_slice(&response.body).unwrap_or_else(|_| text_body(response))
    } else {
        text_body(response)
    };

    match parsed {
        Value::Object(mut map) => {
            map.entry("error")
                .or_insert_with(|| Value::from(INTERNAL_ERROR));
            map.entry("message")
                .or_insert_with(|| Value::from(fallback_message));
            Value::Object(map)
        }
        other => {
            let mut map = Map::new();
            map.insert("error".to_owned(), Value::from(INTERNAL_ERROR));
            map.insert("message".to_owned(), Value::from(fallback_message));
            if !other.is_null() {
                map.insert("raw".to_owned(), other);
            }
            Value::Object(map)
        }
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn text_body(response: &HttpResponse) -> Value {
    let text = String::from_utf8_lossy(&response.body);
    let text = text.trim();
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::{
        FakeTransport, RecordingSleeper, TEST_KEY, client, client_with, json_response,
        text_response,
    };
    use super::*;
    use crate::error::ErrorKind;

    fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn request_builds_url_query_and_default_headers() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({"ok": true}));
        let client = client(&transport);

        let value: Value = client
            .request(
                RequestOptions::get("/v1/messages")
                    .query("limit", 10)
                    .query_opt("status", None::<&str>)
                    .query("to", "+15551234567"),
            )
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));

        let request = transport.last_request();
        assert_eq!(request.method, http::Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://api.test/api/v1/messages?limit=10&to=%2B15551234567"
        );
        assert_eq!(
            header(&request, "authorization"),
            Some(format!("Bearer {TEST_KEY}").as_str())
        );
        assert_eq!(header(&request, "content-type"), Some("application/json"));
        assert_eq!(header(&request, "accept"), Some("application/json"));
        assert_eq!(header(&request, "user-agent"), Some(DEFAULT_USER_AGENT));
        assert!(DEFAULT_USER_AGENT.starts_with("sendly-rust/"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn path_without_leading_slash_joins_the_same_way() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({}));
        let client = SendlyClient::builder(ApiKey::new(TEST_KEY).unwrap())
            .base_url("https://api.test/api/")
            .transport(transport.clone())
            .build()
            .unwrap();

        let _: Value = client.request(RequestOptions::get("credits")).await.unwrap();
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://api.test/api/credits"
        );
    }

    #[tokio::test]
    async fn caller_headers_override_defaults_and_body_is_json() {
        let transport = FakeTransport::new();
        transport.push_json(201, json!({"id": "msg_1"}));
        let client = client(&transport);

        let _: Value = client
            .request(
                RequestOptions::post("/v1/messages")
                    .header("Accept", "application/vnd.sendly+json")
                    .header("X-Request-Id", "abc")
                    .body(json!({"to": "+15551234567", "text": "hi"})),
            )
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(header(&request, "accept"), Some("application/vnd.sendly+json"));
        assert_eq!(header(&request, "x-request-id"), Some("abc"));
        assert_eq!(
            super::testing::body_json(&request),
            json!({"to": "+15551234567", "text": "hi"})
        );
    }

    #[tokio::test]
    async fn path_with_query_or_control_characters_fails_before_sending() {
        let transport = FakeTransport::new();
        let client = client(&transport);

        for path in ["/v1/messages?limit=5", "/contacts#top", "/contacts/c_1\n"] {
            let err = client
                .request::<Value>(RequestOptions::get(path))
                .await
                .unwrap_err();
            assert!(
                matches!(
                    &err,
                    SendlyError::InvalidInput(ValidationError::InvalidPath { input }) if input == path
                ),
                "unexpected {err:?}"
            );
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_caller_header_fails_before_sending() {
        let transport = FakeTransport::new();
        let client = client(&transport);

        let err = client
            .request::<Value>(RequestOptions::get("/credits").header("bad header", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn retries_server_errors_with_growing_backoff() {
        let transport = FakeTransport::new();
        transport
            .push_json(500, json!({"error": "internal_error", "message": "boom"}))
            .push_json(500, json!({"error": "internal_error", "message": "boom"}))
            .push_json(200, json!({"balance": 10}));
        let sleeper = RecordingSleeper::default();
        let client = client_with(&transport, &sleeper, 3);

        let value: Value = client.request(RequestOptions::get("/credits")).await.unwrap();
        assert_eq!(value, json!({"balance": 10}));
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn jittered_backoff_still_grows() {
        let transport = FakeTransport::new();
        transport
            .push_json(502, json!({}))
            .push_json(502, json!({}))
            .push_json(200, json!({}));
        let sleeper = RecordingSleeper::default();
        let client = SendlyClient::builder(ApiKey::new(TEST_KEY).unwrap())
            .transport(transport.clone())
            .sleeper(sleeper.clone())
            .build()
            .unwrap();

        let _: Value = client.request(RequestOptions::get("/credits")).await.unwrap();
        let delays = sleeper.delays();
        assert_eq!(delays.len(), 2);
        assert!(delays[0] >= Duration::from_secs(1));
        assert!(delays[0] < Duration::from_millis(1500));
        assert!(delays[1] > delays[0]);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        for (status, code) in [
            (400, "invalid_request"),
            (401, "invalid_api_key"),
            (402, "insufficient_credits"),
            (403, "insufficient_permissions"),
            (404, "not_found"),
        ] {
            let transport = FakeTransport::new();
            transport.push_json(status, json!({"error": code, "message": "no"}));
            let sleeper = RecordingSleeper::default();
            let client = client_with(&transport, &sleeper, 3);

            let err = client
                .request::<Value>(RequestOptions::get("/credits"))
                .await
                .unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.code(), code);
            assert_eq!(transport.calls(), 1, "status {status}");
            assert!(sleeper.delays().is_empty());
        }
    }

    #[tokio::test]
    async fn unauthorized_is_a_single_attempt_authentication_error() {
        let transport = FakeTransport::new();
        transport.push_json(401, json!({"error": "invalid_api_key", "message": "bad key"}));
        let client = client_with(&transport, &RecordingSleeper::default(), 3);

        let err = client
            .request::<Value>(RequestOptions::get("/account"))
            .await
            .unwrap_err();
        assert!(matches!(err, SendlyError::Authentication(_)));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn rate_limit_is_returned_without_retry() {
        let transport = FakeTransport::new();
        transport.push_json(
            429,
            json!({"error": "rate_limit_exceeded", "message": "slow down", "retryAfter": 45}),
        );
        let sleeper = RecordingSleeper::default();
        let client = client_with(&transport, &sleeper, 3);

        let err = client
            .request::<Value>(RequestOptions::post("/v1/messages").body(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SendlyError::RateLimit {
                retry_after_seconds: 45,
                ..
            }
        ));
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_error() {
        let transport = FakeTransport::new();
        for _ in 0..3 {
            transport.push_json(503, json!({"error": "service_unavailable"}));
        }
        let sleeper = RecordingSleeper::default();
        let client = client_with(&transport, &sleeper, 2);

        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        assert_eq!(transport.calls(), 3);
        assert_eq!(sleeper.delays().len(), 2);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.code(), "service_unavailable");
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let transport = FakeTransport::new();
        transport.push_json(500, json!({}));
        let client = client_with(&transport, &RecordingSleeper::default(), 0);

        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        assert_eq!(transport.calls(), 1);
        assert_eq!(err.kind(), ErrorKind::Generic);
    }

    #[tokio::test]
    async fn network_errors_are_retried() {
        let transport = FakeTransport::new();
        transport
            .push_error("connection reset")
            .push_json(200, json!({"ok": true}));
        let sleeper = RecordingSleeper::default();
        let client = client_with(&transport, &sleeper, 3);

        let value: Value = client.request(RequestOptions::get("/credits")).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
        assert_eq!(transport.calls(), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn network_error_keeps_source_message() {
        let transport = FakeTransport::new();
        transport.push_error("dns failure");
        let client = client(&transport);

        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.to_string().contains("dns failure"));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_attempt_times_out() {
        let transport = FakeTransport::new();
        transport.push_hang();
        let client = SendlyClient::builder(ApiKey::new(TEST_KEY).unwrap())
            .timeout(Duration::from_secs(5))
            .max_retries(0)
            .transport(transport.clone())
            .build()
            .unwrap();

        let start = tokio::time::Instant::now();
        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_secs(5) + Duration::from_millis(50));
        assert!(matches!(err, SendlyError::Timeout { timeout } if timeout == Duration::from_secs(5)));
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_attempt_is_retried() {
        let transport = FakeTransport::new();
        transport.push_hang().push_json(200, json!({"ok": true}));
        let sleeper = RecordingSleeper::default();
        let client = SendlyClient::builder(ApiKey::new(TEST_KEY).unwrap())
            .timeout(Duration::from_secs(1))
            .retry_policy(RetryPolicy::new().with_max_jitter(Duration::ZERO))
            .transport(transport.clone())
            .sleeper(sleeper.clone())
            .build()
            .unwrap();

        let value: Value = client.request(RequestOptions::get("/credits")).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn rate_limit_snapshot_survives_responses_without_headers() {
        let transport = FakeTransport::new();
        transport.push(json_response(
            200,
            &json!({}),
            &[
                ("X-RateLimit-Limit", "100"),
                ("X-RateLimit-Remaining", "42"),
                ("X-RateLimit-Reset", "30"),
            ],
        ));
        transport.push_json(200, json!({}));
        let client = client(&transport);
        assert_eq!(client.rate_limit(), None);

        let _: Value = client.request(RequestOptions::get("/credits")).await.unwrap();
        assert_eq!(
            client.rate_limit(),
            Some(RateLimitInfo {
                limit: 100,
                remaining: 42,
                reset: 30
            })
        );

        let clone = client.clone();
        let _: Value = clone.request(RequestOptions::get("/credits")).await.unwrap();
        assert_eq!(client.rate_limit().map(|info| info.remaining), Some(42));
    }

    #[tokio::test]
    async fn rate_limit_snapshot_updates_on_error_responses() {
        let transport = FakeTransport::new();
        transport.push(json_response(
            429,
            &json!({"error": "rate_limit_exceeded"}),
            &[
                ("X-RateLimit-Limit", "100"),
                ("X-RateLimit-Remaining", "0"),
                ("X-RateLimit-Reset", "12"),
            ],
        ));
        let client = client(&transport);

        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
        assert_eq!(client.rate_limit().map(|info| info.remaining), Some(0));
    }

    #[tokio::test]
    async fn non_json_error_body_gets_default_code_and_message() {
        let transport = FakeTransport::new();
        transport.push(text_response(500, "upstream exploded"));
        let client = client(&transport);

        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.code, "internal_error");
        assert_eq!(api.message, "HTTP 500");
        assert_eq!(err.body().and_then(|body| body.get("raw")), Some(&json!("upstream exploded")));
    }

    #[tokio::test]
    async fn json_error_body_missing_message_uses_status() {
        let transport = FakeTransport::new();
        transport.push_json(409, json!({"error": "conflict"}));
        let client = client(&transport);

        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "conflict");
        assert_eq!(err.api_error().unwrap().message, "HTTP 409");
    }

    #[tokio::test]
    async fn undecodable_success_body_is_retried() {
        let transport = FakeTransport::new();
        transport
            .push(HttpResponse::new(
                http::StatusCode::OK,
                json_response(200, &json!({}), &[]).headers,
                b"{ not json".to_vec(),
            ))
            .push_json(200, json!({"balance": 5}));
        let sleeper = RecordingSleeper::default();
        let client = client_with(&transport, &sleeper, 3);

        let body: Value = client
            .request(RequestOptions::get("/credits"))
            .await
            .unwrap();
        assert_eq!(body, json!({"balance": 5}));
        assert_eq!(transport.calls(), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn undecodable_success_body_is_returned_once_retries_run_out() {
        let transport = FakeTransport::new();
        transport.push(HttpResponse::new(
            http::StatusCode::OK,
            json_response(200, &json!({}), &[]).headers,
            b"{ not json".to_vec(),
        ));
        let client = client(&transport);

        let err = client
            .request::<Value>(RequestOptions::get("/credits"))
            .await
            .unwrap_err();
        assert!(matches!(err, SendlyError::Decode { status: 200, .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn empty_success_body_decodes_as_null() {
        let transport = FakeTransport::new();
        transport.push(HttpResponse::new(
            http::StatusCode::NO_CONTENT,
            http::HeaderMap::new(),
            Vec::new(),
        ));
        let client = client(&transport);

        let value: Option<Value> = client
            .request(RequestOptions::delete("/contacts/c_1"))
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn build_rejects_invalid_configuration() {
        let key = || ApiKey::new(TEST_KEY).unwrap();

        let err = SendlyClient::builder(key())
            .base_url("http://api.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let err = SendlyClient::builder(key())
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));

        let err = SendlyClient::builder(key())
            .user_agent("bad\nagent")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUserAgent(_)));
    }

    #[test]
    fn new_uses_defaults() {
        let client = SendlyClient::new(ApiKey::new(TEST_KEY).unwrap());
        assert_eq!(client.config().base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.config().timeout(), DEFAULT_TIMEOUT);
        assert_eq!(client.config().max_retries(), DEFAULT_MAX_RETRIES);
        assert!(!format!("{client:?}").contains("abc123"));
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let builder = SendlyClientBuilder::from_lookup(|name| match name {
            "SENDLY_API_KEY" => Some(TEST_KEY.to_owned()),
            "SENDLY_BASE_URL" => Some("http://localhost:3000/api".to_owned()),
            "SENDLY_TIMEOUT_MS" => Some("2500".to_owned()),
            "SENDLY_MAX_RETRIES" => Some("1".to_owned()),
            _ => None,
        })
        .unwrap();
        let client = builder.transport(FakeTransport::new()).build().unwrap();
        assert_eq!(client.config().base_url(), "http://localhost:3000/api");
        assert_eq!(client.config().timeout(), Duration::from_millis(2500));
        assert_eq!(client.config().max_retries(), 1);
    }

    #[test]
    fn from_lookup_reports_missing_and_invalid_values() {
        let err = SendlyClientBuilder::from_lookup(|_| None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnv {
                name: "SENDLY_API_KEY"
            }
        ));

        let err = SendlyClientBuilder::from_lookup(|name| match name {
            "SENDLY_API_KEY" => Some(TEST_KEY.to_owned()),
            "SENDLY_TIMEOUT_MS" => Some("soon".to_owned()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: "SENDLY_TIMEOUT_MS",
                ..
            }
        ));

        let err = SendlyClientBuilder::from_lookup(|name| match name {
            "SENDLY_API_KEY" => Some("not-a-key".to_owned()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiKey));
    }
}
