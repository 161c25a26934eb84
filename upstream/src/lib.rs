//! Adapters for the three third-party data sources.
//!
//! Each client implements one fetcher port from `logoali::ports` and maps
//! its upstream's responses (or failures) into the shared error taxonomy
//! at this boundary, so nothing downstream has to trust an arbitrary JSON
//! or HTML shape.

mod catabagulho;
mod nominatim;
mod viacep;

pub use catabagulho::LocatClient;
pub use nominatim::NominatimClient;
pub use viacep::ViaCepClient;

/// User-Agent sent to the JSON upstreams. Nominatim's usage policy
/// requires an identifying agent.
pub(crate) const USER_AGENT: &str = "LogoAli-App/1.0.0";
