use async_trait::async_trait;
use kickroster_core::{Profile, SourceTag};
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Url;

use crate::error::{FetchError, SourceError};
use crate::extract::{extract_profile, PILOTERR_SHAPE};
use crate::fetch::{FetchOptions, JsonFetcher};

use super::kick::parse_base_url;
use super::ProfileSource;

pub const DEFAULT_BASE_URL: &str = "https://piloterr.com/";

const API_KEY_HEADER: &str = "x-api-key";

/// Secondary enrichment source (Piloterr's Kick user-info endpoint).
///
/// Disabled when constructed without an API key: lookups return `Ok(None)`
/// without touching the network.
pub struct PiloterrSource {
    fetcher: JsonFetcher,
    base_url: Url,
    options: Option<FetchOptions>,
}

impl PiloterrSource {
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` cannot be parsed, or
    /// [`FetchError::InvalidHeader`] if the API key is not a valid header value.
    pub fn new(
        fetcher: JsonFetcher,
        base_url: &str,
        api_key: Option<&str>,
        options: FetchOptions,
    ) -> Result<Self, FetchError> {
        let base_url = parse_base_url(base_url)?;
        let options = api_key
            .map(|key| {
                let mut value =
                    HeaderValue::from_str(key).map_err(|e| FetchError::InvalidHeader {
                        name: API_KEY_HEADER.to_string(),
                        reason: e.to_string(),
                    })?;
                value.set_sensitive(true);
                Ok::<_, FetchError>(
                    options
                        .with_header(HeaderName::from_static(API_KEY_HEADER), value)
                        .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json")),
                )
            })
            .transpose()?;

        Ok(Self {
            fetcher,
            base_url,
            options,
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.options.is_some()
    }

    pub fn user_info_url(&self, slug: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v2", "kick", "user", "info"]);
        }
        url.query_pairs_mut().append_pair("query", slug);
        url
    }
}

#[async_trait]
impl ProfileSource for PiloterrSource {
    fn name(&self) -> &'static str {
        "piloterr"
    }

    async fn fetch_profile(&self, slug: &str) -> Result<Option<Profile>, SourceError> {
        let Some(options) = &self.options else {
            return Ok(None);
        };

        let url = self.user_info_url(slug);
        let payload = self.fetcher.fetch_json(url.as_str(), options).await?;
        Ok(Some(extract_profile(
            &payload,
            slug,
            &PILOTERR_SHAPE,
            SourceTag::Secondary,
        )))
    }
}
