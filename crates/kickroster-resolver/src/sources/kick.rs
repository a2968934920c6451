use async_trait::async_trait;
use kickroster_core::{Profile, SourceTag};
use reqwest::Url;

use crate::error::{FetchError, SourceError};
use crate::extract::{extract_profile, KICK_SHAPE};
use crate::fetch::{FetchOptions, JsonFetcher};

use super::ProfileSource;

pub const DEFAULT_BASE_URL: &str = "https://kick.com/";

/// Channel endpoint variants, most specific first.
const CHANNEL_ENDPOINTS: &[&[&str]] = &[&["api", "v2", "channels"], &["api", "v1", "channels"]];

/// Primary source: the platform's public channel API.
///
/// Each endpoint variant is tried once, in order; the first one returning
/// 2xx JSON wins.
pub struct KickSource {
    fetcher: JsonFetcher,
    base_url: Url,
    options: FetchOptions,
}

impl KickSource {
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` cannot be parsed or
    /// cannot carry a path.
    pub fn new(
        fetcher: JsonFetcher,
        base_url: &str,
        options: FetchOptions,
    ) -> Result<Self, FetchError> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            fetcher,
            base_url,
            options,
        })
    }

    /// Candidate URLs for `slug`, in trial order. The slug is percent-encoded
    /// as a single path segment.
    pub fn endpoint_urls(&self, slug: &str) -> Vec<Url> {
        CHANNEL_ENDPOINTS
            .iter()
            .filter_map(|segments| {
                let mut url = self.base_url.clone();
                {
                    let mut path = url.path_segments_mut().ok()?;
                    path.pop_if_empty().extend(segments.iter().copied()).push(slug);
                }
                Some(url)
            })
            .collect()
    }
}

#[async_trait]
impl ProfileSource for KickSource {
    fn name(&self) -> &'static str {
        "kick"
    }

    async fn fetch_profile(&self, slug: &str) -> Result<Option<Profile>, SourceError> {
        let mut last_err = None;

        for url in self.endpoint_urls(slug) {
            match self.fetcher.fetch_json(url.as_str(), &self.options).await {
                Ok(payload) => {
                    // v2 responses may wrap the channel in a top-level `channel` object.
                    let body = payload
                        .get("channel")
                        .filter(|v| v.is_object())
                        .unwrap_or(&payload);
                    let profile = extract_profile(body, slug, &KICK_SHAPE, SourceTag::Primary);
                    return Ok(Some(profile));
                }
                Err(e) => {
                    tracing::debug!(slug, url = %url, error = %e, "kick endpoint failed; trying next");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.map_or_else(
            || SourceError::Exhausted {
                slug: slug.to_owned(),
            },
            SourceError::Fetch,
        ))
    }
}

/// Parses a source origin, ensuring it can be extended with path segments.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl {
            url: raw.to_owned(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}
