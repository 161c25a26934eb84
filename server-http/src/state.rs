use logoali::domain::{Address, ScheduleEntry};
use logoali::persistence::SledCacheStore;
use logoali::ports::CacheStore;
use logoali::services::{AddressLookupService, GeocodeService, ScheduleLookupService};
use shared::config::Config;
use shared::Result;
use std::path::Path;
use std::sync::Arc;
use upstream::{LocatClient, NominatimClient, ViaCepClient};

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub addresses: Arc<AddressLookupService>,
    pub schedules: Arc<ScheduleLookupService>,
    pub geocoder: Arc<GeocodeService>,
}

impl AppState {
    /// Wire the sled stores and upstream clients into the three lookup
    /// services. The stores are opened once here and live for the whole
    /// process; sled closes them cleanly on drop at shutdown.
    pub fn new(config: &Config) -> Result<Self> {
        let data_dir = Path::new(&config.data_dir);

        let address_store: Arc<dyn CacheStore<Address>> =
            Arc::new(SledCacheStore::open(data_dir.join("viacep.sled"))?);
        let schedule_store: Arc<dyn CacheStore<Vec<ScheduleEntry>>> =
            Arc::new(SledCacheStore::open(data_dir.join("catabagulho.sled"))?);

        let viacep = Arc::new(ViaCepClient::new(config.viacep_url.clone())?);
        let nominatim = Arc::new(NominatimClient::new(config.nominatim_url.clone())?);
        let locat = Arc::new(LocatClient::new(config.locat_url.clone())?);

        Ok(Self {
            addresses: Arc::new(AddressLookupService::new(address_store, viacep)),
            schedules: Arc::new(ScheduleLookupService::new(schedule_store, locat)),
            geocoder: Arc::new(GeocodeService::new(nominatim)),
        })
    }
}
