use crate::domain::GeocodeCandidate;
use crate::ports::GeocodeFetcher;
use shared::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Uncached pass-through to the geocoding upstream.
///
/// Free-text queries key too poorly to be worth a cache row; coordinates
/// are cheap to recompute and every call goes straight to the provider.
pub struct GeocodeService {
    fetcher: Arc<dyn GeocodeFetcher>,
}

impl GeocodeService {
    pub fn new(fetcher: Arc<dyn GeocodeFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidKey(
                "geocode query must not be empty".to_string(),
            ));
        }

        debug!(%query, "geocoding");
        self.fetcher.fetch(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeocodeFetcher for StubFetcher {
        async fn fetch(&self, _query: &str) -> Result<Vec<GeocodeCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![GeocodeCandidate {
                place_id: 1,
                lat: -23.5505,
                lon: -46.6333,
                display_name: "Praça da Sé, São Paulo".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_the_upstream() {
        let fetcher = Arc::new(StubFetcher {
            calls: AtomicUsize::new(0),
        });
        let service = GeocodeService::new(fetcher.clone());

        let err = service.search("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_search_goes_to_the_upstream() {
        let fetcher = Arc::new(StubFetcher {
            calls: AtomicUsize::new(0),
        });
        let service = GeocodeService::new(fetcher.clone());

        service.search("Avenida Paulista, 1500").await.unwrap();
        service.search("Avenida Paulista, 1500").await.unwrap();

        // Deliberately uncached: two identical queries, two live fetches.
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
