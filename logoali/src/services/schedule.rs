use crate::domain::{CacheStats, ScheduleEntry, Sourced};
use crate::normalize::CoordKey;
use crate::ports::{CacheStore, ScheduleFetcher};
use shared::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-through lookup for the Cata-Bagulho schedule domain, keyed by a
/// coordinate pair rounded to 8 decimal places.
pub struct ScheduleLookupService {
    store: Arc<dyn CacheStore<Vec<ScheduleEntry>>>,
    fetcher: Arc<dyn ScheduleFetcher>,
}

impl ScheduleLookupService {
    pub fn new(
        store: Arc<dyn CacheStore<Vec<ScheduleEntry>>>,
        fetcher: Arc<dyn ScheduleFetcher>,
    ) -> Self {
        Self { store, fetcher }
    }

    pub async fn lookup(&self, lat: f64, lng: f64) -> Result<Sourced<Vec<ScheduleEntry>>> {
        let key = CoordKey::new(lat, lng);

        match self.store.get(key.as_str()).await {
            Ok(Some(entries)) => {
                debug!(coords = %key, "schedule cache hit");
                return Ok(Sourced::cache(entries));
            }
            Ok(None) => debug!(coords = %key, "schedule cache miss"),
            Err(e) => warn!(coords = %key, error = %e, "schedule cache read failed, fetching live"),
        }

        let entries = self.fetcher.fetch(lat, lng).await?;

        // An empty result set means "no data here", not an answer worth
        // remembering: caching it would pin the miss for 24 hours.
        if entries.is_empty() {
            debug!(coords = %key, "upstream returned no entries, not caching");
        } else if let Err(e) = self.store.put(key.as_str(), &entries).await {
            warn!(coords = %key, error = %e, "failed to cache schedule entries");
        }

        Ok(Sourced::api(entries))
    }

    /// Write directly into the store, bypassing the fetch path. Test
    /// fixtures only. Returns the composite lookup key.
    pub async fn seed(&self, lat: f64, lng: f64, entries: Vec<ScheduleEntry>) -> Result<String> {
        let key = CoordKey::new(lat, lng);
        self.store.put(key.as_str(), &entries).await?;
        Ok(key.as_str().to_string())
    }

    pub async fn cache_stats(&self) -> Result<CacheStats> {
        self.store.stats().await
    }

    pub async fn sweep_expired(&self) -> Result<u64> {
        self.store.sweep_expired().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;
    use crate::persistence::SledCacheStore;
    use async_trait::async_trait;
    use shared::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        entries: Vec<ScheduleEntry>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn returning(entries: Vec<ScheduleEntry>) -> Self {
            Self {
                entries,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ScheduleFetcher for StubFetcher {
        async fn fetch(&self, _lat: f64, _lng: f64) -> Result<Vec<ScheduleEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entries.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ScheduleFetcher for FailingFetcher {
        async fn fetch(&self, _lat: f64, _lng: f64) -> Result<Vec<ScheduleEntry>> {
            Err(Error::ParseError("results page changed".to_string()))
        }
    }

    fn entry(street: &str) -> ScheduleEntry {
        ScheduleEntry {
            street: street.to_string(),
            start_stretch: "R. Direita".to_string(),
            end_stretch: "R. Quinze de Novembro".to_string(),
            dates: vec!["12/09".to_string(), "26/09".to_string()],
            frequency: "Quinzenal".to_string(),
            shift: "Diurno".to_string(),
            schedule: "06:00 às 14:00".to_string(),
        }
    }

    fn service(
        fetcher: Arc<dyn ScheduleFetcher>,
    ) -> (tempfile::TempDir, ScheduleLookupService) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn CacheStore<Vec<ScheduleEntry>>> =
            Arc::new(SledCacheStore::open(temp_dir.path().join("catabagulho.sled")).unwrap());
        (temp_dir, ScheduleLookupService::new(store, fetcher))
    }

    #[tokio::test]
    async fn jittered_coordinates_share_one_cache_row() {
        let fetcher = Arc::new(StubFetcher::returning(vec![entry("Praça da Sé")]));
        let (_dir, service) = service(fetcher.clone());

        let first = service.lookup(-23.5505, -46.6333).await.unwrap();
        assert_eq!(first.source, Source::Api);

        // Trailing float noise rounds away to the same key.
        let second = service
            .lookup(-23.55050000000001, -46.63330000000001)
            .await
            .unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.value, vec![entry("Praça da Sé")]);

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.cache_stats().await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn empty_result_is_returned_but_never_persisted() {
        let fetcher = Arc::new(StubFetcher::returning(Vec::new()));
        let (_dir, service) = service(fetcher.clone());

        let first = service.lookup(-23.5505, -46.6333).await.unwrap();
        assert_eq!(first.source, Source::Api);
        assert!(first.value.is_empty());
        assert_eq!(service.cache_stats().await.unwrap().total, 0);

        // No empty-miss was pinned: the next call retries the upstream.
        let second = service.lookup(-23.5505, -46.6333).await.unwrap();
        assert_eq!(second.source, Source::Api);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_failure_propagates_and_writes_nothing() {
        let (_dir, service) = service(Arc::new(FailingFetcher));

        let err = service.lookup(-23.5505, -46.6333).await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
        assert_eq!(service.cache_stats().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn seeded_entries_serve_as_cache_hits() {
        let fetcher = Arc::new(StubFetcher::returning(vec![entry("live street")]));
        let (_dir, service) = service(fetcher.clone());

        let key = service
            .seed(-23.5505, -46.6333, vec![entry("seeded street")])
            .await
            .unwrap();
        assert_eq!(key, "-23.55050000,-46.63330000");

        let result = service.lookup(-23.5505, -46.6333).await.unwrap();
        assert_eq!(result.source, Source::Cache);
        assert_eq!(result.value, vec![entry("seeded street")]);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
