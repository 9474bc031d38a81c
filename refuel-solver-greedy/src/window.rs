//! Lookahead window selection.

use std::cmp::Ordering;

use refuel_core::{FUEL_EPSILON, ProjectedStation};

/// Stations after `from` (exclusive) whose position lies within `limit`.
///
/// `from == None` means the vehicle is still at the route start and every
/// station is ahead of it.
pub(crate) fn reachable(
    stations: &[ProjectedStation],
    from: Option<usize>,
    limit_miles: f64,
) -> impl Iterator<Item = (usize, &ProjectedStation)> {
    let first = from.map_or(0, |index| index + 1);
    stations
        .iter()
        .enumerate()
        .skip(first)
        .take_while(move |(_, station)| station.distance_along_route_miles <= limit_miles + FUEL_EPSILON)
}

/// Pick the next station from a reachable window.
///
/// The nearest station strictly cheaper than `reference_price` wins;
/// otherwise `None`, leaving the caller to decide between finishing and
/// settling for [`cheapest`].
pub(crate) fn first_cheaper<'a>(
    mut window: impl Iterator<Item = (usize, &'a ProjectedStation)>,
    reference_price: f64,
) -> Option<usize> {
    window
        .find(|(_, station)| station.price() < reference_price)
        .map(|(index, _)| index)
}

/// The cheapest station in a window, ties broken by position then id.
pub(crate) fn cheapest<'a>(
    window: impl Iterator<Item = (usize, &'a ProjectedStation)>,
) -> Option<usize> {
    window
        .min_by(|(_, a), (_, b)| compare_offers(a, b))
        .map(|(index, _)| index)
}

fn compare_offers(a: &ProjectedStation, b: &ProjectedStation) -> Ordering {
    a.price()
        .total_cmp(&b.price())
        .then_with(|| {
            a.distance_along_route_miles
                .total_cmp(&b.distance_along_route_miles)
        })
        .then_with(|| a.id().cmp(&b.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refuel_core::test_support::{projected_station, projected_stations};
    use rstest::rstest;

    #[rstest]
    fn window_starts_after_the_current_station() {
        let stations = projected_stations(&[(10.0, 3.0), (20.0, 3.0), (40.0, 3.0)]);
        let from_start: Vec<_> = reachable(&stations, None, 20.0).map(|(i, _)| i).collect();
        let from_first: Vec<_> = reachable(&stations, Some(0), 40.0).map(|(i, _)| i).collect();
        assert_eq!(from_start, vec![0, 1]);
        assert_eq!(from_first, vec![1, 2]);
    }

    #[rstest]
    fn nearest_cheaper_station_wins_over_the_cheapest() {
        let stations = projected_stations(&[(10.0, 3.4), (20.0, 2.9), (30.0, 3.2)]);
        assert_eq!(first_cheaper(reachable(&stations, None, 50.0), 3.5), Some(0));
        assert_eq!(first_cheaper(reachable(&stations, None, 50.0), 2.9), None);
    }

    #[rstest]
    fn cheapest_breaks_ties_by_position_then_id() {
        let stations = vec![
            projected_station(9, 10.0, 3.0),
            projected_station(4, 20.0, 3.0),
            projected_station(2, 20.0, 3.0),
        ];
        let window = stations.iter().enumerate().skip(1);
        assert_eq!(cheapest(window), Some(2));
        assert_eq!(cheapest(stations.iter().enumerate()), Some(0));
    }
}
