//! Outbound JSON GET with bounded, manually-followed redirects.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, LOCATION, USER_AGENT};
use reqwest::{Client, Url};

use crate::error::FetchError;

pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";
const DEFAULT_ACCEPT: &str = "application/json,text/plain,*/*";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(12_000);
pub const DEFAULT_MAX_REDIRECTS: u32 = 3;

/// Maximum number of body characters quoted in status and parse errors.
const SNIPPET_MAX_CHARS: usize = 300;

/// Per-call request settings.
///
/// `headers` are applied on top of the browser-like defaults and replace
/// any default with the same name.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub headers: HeaderMap,
    pub timeout: Duration,
    pub max_redirects: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn new(timeout: Duration, max_redirects: u32) -> Self {
        Self {
            headers: HeaderMap::new(),
            timeout,
            max_redirects,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Stateless JSON fetcher shared by every source adapter.
///
/// The underlying client never follows redirects on its own; [`Self::fetch_json`]
/// walks `Location` headers itself so the hop budget and relative-URL
/// resolution stay under our control.
#[derive(Debug, Clone)]
pub struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the `reqwest::Client` cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// GETs `url` and parses the body as JSON.
    ///
    /// 3xx responses carrying a `Location` header are followed while the
    /// redirect budget lasts. Once it runs out, the 3xx itself is reported
    /// as [`FetchError::HttpStatus`]. The timeout applies to each hop.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `url` or a redirect target cannot be parsed.
    /// - [`FetchError::Timeout`] if a hop exceeds `options.timeout`.
    /// - [`FetchError::Network`] on connection-level failure.
    /// - [`FetchError::HttpStatus`] if the final status is not 2xx.
    /// - [`FetchError::Parse`] if the body is not valid JSON.
    pub async fn fetch_json(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<serde_json::Value, FetchError> {
        let mut current = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let headers = Self::request_headers(options);
        let mut redirects_left = options.max_redirects;

        loop {
            let response = self
                .client
                .get(current.clone())
                .headers(headers.clone())
                .timeout(options.timeout)
                .send()
                .await
                .map_err(|e| classify(e, &current, options.timeout))?;

            let status = response.status();

            if status.is_redirection() && redirects_left > 0 {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                if let Some(location) = location {
                    let next = current.join(&location).map_err(|e| FetchError::InvalidUrl {
                        url: location.clone(),
                        reason: e.to_string(),
                    })?;
                    tracing::debug!(from = %current, to = %next, redirects_left, "following redirect");
                    current = next;
                    redirects_left -= 1;
                    continue;
                }
            }

            let body = response
                .text()
                .await
                .map_err(|e| classify(e, &current, options.timeout))?;

            if !status.is_success() {
                return Err(FetchError::HttpStatus {
                    status: status.as_u16(),
                    url: current.to_string(),
                    snippet: snippet(&body),
                });
            }

            return serde_json::from_str(&body).map_err(|_| FetchError::Parse {
                url: current.to_string(),
                snippet: snippet(&body),
            });
        }
    }

    fn request_headers(options: &FetchOptions) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }
}

fn classify(err: reqwest::Error, url: &Url, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: err,
        }
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_MAX_CHARS).collect()
}
