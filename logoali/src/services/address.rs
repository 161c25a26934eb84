use crate::domain::{Address, CacheStats, Sourced};
use crate::normalize::CepKey;
use crate::ports::{AddressFetcher, CacheStore};
use shared::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-through lookup for the CEP address domain.
pub struct AddressLookupService {
    store: Arc<dyn CacheStore<Address>>,
    fetcher: Arc<dyn AddressFetcher>,
}

impl AddressLookupService {
    pub fn new(store: Arc<dyn CacheStore<Address>>, fetcher: Arc<dyn AddressFetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Resolve a raw postal code to an address, serving from cache when a
    /// valid row exists and refreshing it from the registry otherwise.
    pub async fn lookup(&self, raw_cep: &str) -> Result<Sourced<Address>> {
        let key = CepKey::parse(raw_cep)?;

        match self.store.get(key.as_str()).await {
            Ok(Some(address)) => {
                debug!(cep = %key, "address cache hit");
                return Ok(Sourced::cache(address));
            }
            Ok(None) => debug!(cep = %key, "address cache miss"),
            // A storage fault is a miss: go fetch live rather than fail.
            Err(e) => warn!(cep = %key, error = %e, "address cache read failed, fetching live"),
        }

        let address = self.fetcher.fetch(&key).await?;

        if let Err(e) = self.store.put(key.as_str(), &address).await {
            // The live value is already in hand; a failed write must not
            // fail the read.
            warn!(cep = %key, error = %e, "failed to cache address");
        }

        Ok(Sourced::api(address))
    }

    /// Write directly into the store, bypassing the fetch path. Test
    /// fixtures only. Returns the normalized lookup key.
    pub async fn seed(&self, raw_cep: &str, address: Address) -> Result<String> {
        let key = CepKey::parse(raw_cep)?;
        self.store.put(key.as_str(), &address).await?;
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
        response: std::result::Result<Address, &'static str>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn ok(address: Address) -> Self {
            Self {
                response: Ok(address),
                calls: AtomicUsize::new(0),
            }
        }

        fn unavailable() -> Self {
            Self {
                response: Err("registry is down"),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AddressFetcher for StubFetcher {
        async fn fetch(&self, _cep: &CepKey) -> Result<Address> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(|msg| Error::UpstreamUnavailable(msg.to_string()))
        }
    }

    fn praca_da_se() -> Address {
        Address {
            cep: "01001-000".to_string(),
            logradouro: Some("Praça da Sé".to_string()),
            complemento: Some("lado ímpar".to_string()),
            unidade: None,
            bairro: Some("Sé".to_string()),
            localidade: Some("São Paulo".to_string()),
            uf: Some("SP".to_string()),
        }
    }

    fn service(fetcher: StubFetcher) -> (tempfile::TempDir, AddressLookupService, Arc<StubFetcher>) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn CacheStore<Address>> =
            Arc::new(SledCacheStore::open(temp_dir.path().join("viacep.sled")).unwrap());
        let fetcher = Arc::new(fetcher);
        let service = AddressLookupService::new(store, fetcher.clone());
        (temp_dir, service, fetcher)
    }

    #[tokio::test]
    async fn miss_fetches_live_then_hit_serves_from_cache() {
        let (_dir, service, fetcher) = service(StubFetcher::ok(praca_da_se()));

        let first = service.lookup("01001-000").await.unwrap();
        assert_eq!(first.source, Source::Api);
        assert_eq!(first.value, praca_da_se());

        // Same key, different spelling: must hit the cached row.
        let second = service.lookup("01001000").await.unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.value, praca_da_se());

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_cep_short_circuits_before_cache_and_fetch() {
        let (_dir, service, fetcher) = service(StubFetcher::ok(praca_da_se()));

        let err = service.lookup("123").await.unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_failure_propagates_and_writes_nothing() {
        let (_dir, service, _fetcher) = service(StubFetcher::unavailable());

        let err = service.lookup("01001-000").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));

        assert_eq!(service.cache_stats().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn seed_writes_under_the_normalized_key() {
        let (_dir, service, fetcher) = service(StubFetcher::ok(praca_da_se()));

        let key = service.seed("01001-000", praca_da_se()).await.unwrap();
        assert_eq!(key, "01001000");

        let result = service.lookup("01001000").await.unwrap();
        assert_eq!(result.source, Source::Cache);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
