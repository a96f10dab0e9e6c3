//! Address autocomplete across several geocoders.
//!
//! Every query variation is sent to every provider at once. Failing
//! providers are skipped; the surviving candidates are ranked with
//! [`jolananas_core::geo::rank`] and cached for 10 minutes.

mod providers;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use moka::future::Cache;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use jolananas_core::geo::{self, Candidate, Ranked, SuggestionSource};

use crate::config::GeocodeConfig;
use crate::services::retry::{RetryPolicy, Retryable, with_retry};

/// Queries shorter than this return nothing without network calls.
pub const MIN_QUERY_CHARS: usize = 3;

/// Queries longer than this are rejected.
pub const MAX_QUERY_CHARS: usize = 200;

/// Suggestions returned when the caller does not ask for a count.
pub const DEFAULT_LIMIT: usize = 8;

/// Most suggestions returned.
pub const MAX_LIMIT: usize = 15;

const CACHE_CAPACITY: u64 = 2000;
const CACHE_TTL: Duration = Duration::from_secs(600);

const PROVIDERS: [SuggestionSource; 3] = [
    SuggestionSource::Gouv,
    SuggestionSource::Photon,
    SuggestionSource::Nominatim,
];

/// Errors from address autocomplete.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Query exceeds [`MAX_QUERY_CHARS`].
    #[error("query must be at most {MAX_QUERY_CHARS} characters")]
    QueryTooLong,

    /// Every provider call failed.
    #[error("all {0} geocoding calls failed")]
    AllProvidersFailed(usize),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("{source_name} returned HTTP {status}")]
    Status {
        source_name: &'static str,
        status: u16,
    },

    /// Provider response could not be decoded.
    #[error("{source_name} response could not be parsed: {message}")]
    Parse {
        source_name: &'static str,
        message: String,
    },

    /// Provider did not answer in time.
    #[error("{0} timed out")]
    Timeout(&'static str),
}

impl Retryable for GeocodeError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::QueryTooLong | Self::AllProvidersFailed(_) | Self::Parse { .. } => false,
        }
    }
}

/// One ranked address suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressSuggestion {
    pub label: String,
    pub house_number: Option<String>,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source: SuggestionSource,
    pub score: i32,
}

impl From<Ranked> for AddressSuggestion {
    fn from(ranked: Ranked) -> Self {
        let c = ranked.candidate;
        Self {
            label: c.label,
            house_number: c.house_number,
            street: c.street,
            postcode: c.postcode,
            city: c.city,
            country_code: c.country_code,
            latitude: c.latitude,
            longitude: c.longitude,
            source: c.source,
            score: ranked.score,
        }
    }
}

/// Clamp a requested count to `1..=MAX_LIMIT`.
#[must_use]
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.map_or(DEFAULT_LIMIT, |n| n.clamp(1, MAX_LIMIT))
}

/// Address autocomplete aggregator.
#[derive(Clone)]
pub struct AddressAutocomplete {
    inner: Arc<AddressAutocompleteInner>,
}

struct AddressAutocompleteInner {
    client: reqwest::Client,
    config: GeocodeConfig,
    retry: RetryPolicy,
    cache: Cache<String, Arc<Vec<AddressSuggestion>>>,
}

impl AddressAutocomplete {
    /// Create the aggregator.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: GeocodeConfig, retry: RetryPolicy) -> Result<Self, GeocodeError> {
        // Nominatim's usage policy requires an identifying User-Agent
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AddressAutocompleteInner {
                client,
                config,
                retry,
                cache,
            }),
        })
    }

    /// Ranked suggestions for `query`.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::QueryTooLong` for oversized queries and
    /// `GeocodeError::AllProvidersFailed` when no provider answered.
    #[instrument(skip(self, query), fields(query_len = query.chars().count()))]
    pub async fn suggest(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AddressSuggestion>, GeocodeError> {
        let query = query.trim();
        let length = query.chars().count();
        if length > MAX_QUERY_CHARS {
            return Err(GeocodeError::QueryTooLong);
        }
        if length < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let limit = clamp_limit(limit);
        let cache_key = format!("{}:{limit}", geo::normalize(query));
        if let Some(cached) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for address suggestions");
            return Ok(cached.as_ref().clone());
        }

        let variations = geo::query_variations(query);
        let calls = variations.iter().enumerate().flat_map(|(i, variation)| {
            PROVIDERS
                .iter()
                .map(move |source| self.fetch(*source, variation, limit, i > 0))
        });

        let results = join_all(calls).await;
        let total = results.len();

        let mut candidates: Vec<Candidate> = Vec::new();
        let mut failures = 0usize;
        for result in results {
            match result {
                Ok(found) => candidates.extend(found),
                Err(e) => {
                    failures += 1;
                    warn!(error = %e, "Geocoding provider failed");
                }
            }
        }

        if total > 0 && failures == total {
            return Err(GeocodeError::AllProvidersFailed(total));
        }

        let suggestions: Vec<AddressSuggestion> = geo::rank(query, candidates, limit)
            .into_iter()
            .map(AddressSuggestion::from)
            .collect();

        self.inner
            .cache
            .insert(cache_key, Arc::new(suggestions.clone()))
            .await;

        Ok(suggestions)
    }

    async fn fetch(
        &self,
        source: SuggestionSource,
        query: &str,
        limit: usize,
        from_variation: bool,
    ) -> Result<Vec<Candidate>, GeocodeError> {
        let url = providers::request_url(&self.inner.config, source, query, limit)?;

        with_retry(self.inner.retry, source.as_str(), || {
            let url = url.clone();
            async move {
                let request = async {
                    let response = self.inner.client.get(url).send().await?;
                    let status = response.status();
                    if !status.is_success() {
                        return Err(GeocodeError::Status {
                            source_name: source.as_str(),
                            status: status.as_u16(),
                        });
                    }
                    let body = response.text().await?;
                    providers::parse(source, &body, from_variation)
                };

                tokio::time::timeout(self.inner.config.timeout, request)
                    .await
                    .map_err(|_| GeocodeError::Timeout(source.as_str()))?
            }
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(5)), 5);
        assert_eq!(clamp_limit(Some(100)), MAX_LIMIT);
    }

    #[test]
    fn test_retryable_classification() {
        assert!(GeocodeError::Timeout("photon").is_retryable());
        assert!(
            GeocodeError::Status {
                source_name: "gouv",
                status: 503
            }
            .is_retryable()
        );
        assert!(
            !GeocodeError::Status {
                source_name: "gouv",
                status: 400
            }
            .is_retryable()
        );
        assert!(!GeocodeError::QueryTooLong.is_retryable());
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let config = GeocodeConfig {
            gouv_url: "http://127.0.0.1:9".to_string(),
            photon_url: "http://127.0.0.1:9".to_string(),
            nominatim_url: "http://127.0.0.1:9".to_string(),
            ..GeocodeConfig::default()
        };
        let autocomplete = AddressAutocomplete::new(config, RetryPolicy::NONE).unwrap();

        assert!(autocomplete.suggest("  ab ", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_query_rejected() {
        let autocomplete =
            AddressAutocomplete::new(GeocodeConfig::default(), RetryPolicy::NONE).unwrap();

        let query = "a".repeat(MAX_QUERY_CHARS + 1);
        assert!(matches!(
            autocomplete.suggest(&query, None).await,
            Err(GeocodeError::QueryTooLong)
        ));
    }
}
