//! Geocoder trait and coordinate parsing helpers.

use geo::Coord;

use super::error::GeocodeError;

/// A candidate location returned by a geocoder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Human-readable name.
    pub display_name: String,
    /// Position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
}

/// Resolve free text into candidate places.
pub trait Geocoder {
    /// Return zero or more candidates for `query`, best match first.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Unavailable`] when the service cannot answer
    /// and [`GeocodeError::EmptyQuery`] for blank queries.
    fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        (**self).geocode(query)
    }
}

/// Parse a `"latitude,longitude"` literal.
///
/// Returns `None` unless the text holds exactly two finite numbers within
/// WGS84 bounds.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use refuel_core::geocoding::parse_coordinate_pair;
///
/// assert_eq!(
///     parse_coordinate_pair("39.74, -104.99"),
///     Some(Coord { x: -104.99, y: 39.74 })
/// );
/// assert_eq!(parse_coordinate_pair("Denver"), None);
/// ```
#[must_use]
pub fn parse_coordinate_pair(text: &str) -> Option<Coord<f64>> {
    let (lat_text, lon_text) = text.split_once(',')?;
    let lat: f64 = lat_text.trim().parse().ok()?;
    let lon: f64 = lon_text.trim().parse().ok()?;
    let valid = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);
    valid.then_some(Coord { x: lon, y: lat })
}

/// Resolve `text` to a single coordinate.
///
/// Literal coordinate pairs bypass the geocoder; anything else takes the
/// geocoder's first candidate.
///
/// # Errors
///
/// Returns [`GeocodeError::EmptyQuery`] for blank text,
/// [`GeocodeError::NotFound`] when the geocoder has no candidates, and
/// propagates geocoder failures.
pub fn resolve_location<G: Geocoder + ?Sized>(
    geocoder: &G,
    text: &str,
) -> Result<Place, GeocodeError> {
    let query = text.trim();
    if query.is_empty() {
        return Err(GeocodeError::EmptyQuery);
    }
    if let Some(location) = parse_coordinate_pair(query) {
        return Ok(Place {
            display_name: query.to_owned(),
            location,
        });
    }
    geocoder
        .geocode(query)?
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound {
            query: query.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGeocoder;
    use rstest::rstest;

    #[rstest]
    #[case("40.0,-100.0", Some(Coord { x: -100.0, y: 40.0 }))]
    #[case(" 40.0 , -100.0 ", Some(Coord { x: -100.0, y: 40.0 }))]
    #[case("95.0,-100.0", None)]
    #[case("40.0", None)]
    #[case("40.0,-100.0,3", None)]
    #[case("Amarillo, TX", None)]
    fn parses_coordinate_literals(#[case] text: &str, #[case] expected: Option<Coord<f64>>) {
        assert_eq!(parse_coordinate_pair(text), expected);
    }

    #[rstest]
    fn literals_skip_the_geocoder() {
        let geocoder = StubGeocoder::with_error(GeocodeError::Unavailable {
            message: "offline".to_owned(),
        });
        let place = resolve_location(&geocoder, "35.2,-101.8").expect("literal resolves");
        assert_eq!(place.location, Coord { x: -101.8, y: 35.2 });
    }

    #[rstest]
    fn takes_the_first_candidate() {
        let geocoder = StubGeocoder::with_places(vec![
            Place {
                display_name: "Amarillo, Texas".to_owned(),
                location: Coord { x: -101.83, y: 35.22 },
            },
            Place {
                display_name: "Amarillo, Peru".to_owned(),
                location: Coord { x: -77.0, y: -12.0 },
            },
        ]);
        let place = resolve_location(&geocoder, "Amarillo").expect("place resolves");
        assert_eq!(place.display_name, "Amarillo, Texas");
    }

    #[rstest]
    #[case("   ", GeocodeError::EmptyQuery)]
    #[case("Nowhere", GeocodeError::NotFound { query: "Nowhere".to_owned() })]
    fn reports_unresolvable_text(#[case] text: &str, #[case] expected: GeocodeError) {
        let geocoder = StubGeocoder::with_places(Vec::new());
        assert_eq!(resolve_location(&geocoder, text), Err(expected));
    }
}
