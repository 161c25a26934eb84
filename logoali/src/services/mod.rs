//! The read-through lookup services, one per domain.
//!
//! Each request walks the same path: normalize the key, consult the cache,
//! fall through to a live fetch on a miss, persist what came back, answer
//! tagged with its provenance. Storage faults degrade to a live fetch;
//! fetch faults propagate verbatim because there is no other data source.

mod address;
mod geocode;
mod schedule;

pub use address::AddressLookupService;
pub use geocode::GeocodeService;
pub use schedule::ScheduleLookupService;
