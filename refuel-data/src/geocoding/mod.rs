//! Geocoding through a Nominatim-compatible search service.

mod nominatim;

pub use nominatim::{
    DEFAULT_COUNTRY_CODES, DEFAULT_NOMINATIM_URL, DEFAULT_RESULT_LIMIT, NominatimGeocoder,
    NominatimGeocoderConfig,
};
