//! In-memory station store backed by an R\*-tree.

use std::fmt;

use geo::Rect;
use rstar::{AABB, RTree, RTreeObject};

use crate::FuelStation;

use super::StationStore;

impl RTreeObject for FuelStation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.x, self.location.y])
    }
}

/// Station store holding every station in a bulk-loaded R\*-tree.
///
/// # Examples
///
/// ```rust
/// use geo::{Coord, Rect};
/// use refuel_core::FuelStation;
/// use refuel_core::store::{StationIndex, StationStore};
///
/// # fn main() -> Result<(), refuel_core::StationError> {
/// let station = FuelStation::new(1, "Loves", "", Coord { x: 0.0, y: 0.0 }, 3.1)?;
/// let store = StationIndex::new(vec![station.clone()]);
/// let bbox = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 });
///
/// let found: Vec<_> = store.stations_in_rect(&bbox).collect();
/// assert_eq!(found, vec![station]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct StationIndex {
    index: RTree<FuelStation>,
}

impl fmt::Debug for StationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationIndex")
            .field("entries", &self.index.size())
            .finish_non_exhaustive()
    }
}

impl StationIndex {
    /// Bulk-load an index from `stations`.
    #[must_use]
    pub fn new(stations: Vec<FuelStation>) -> Self {
        Self {
            index: RTree::bulk_load(stations),
        }
    }

    /// Number of stations held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Whether the index holds no stations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    /// Iterate over every station in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &FuelStation> {
        self.index.iter()
    }
}

impl FromIterator<FuelStation> for StationIndex {
    fn from_iter<I: IntoIterator<Item = FuelStation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl StationStore for StationIndex {
    fn stations_in_rect(
        &self,
        bbox: &Rect<f64>,
    ) -> Box<dyn Iterator<Item = FuelStation> + Send + '_> {
        let envelope =
            AABB::from_corners([bbox.min().x, bbox.min().y], [bbox.max().x, bbox.max().y]);
        let mut stations: Vec<_> = self
            .index
            .locate_in_envelope_intersecting(&envelope)
            .cloned()
            .collect();
        stations.sort_unstable_by_key(|station| station.id);
        Box::new(stations.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::station_at;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index() -> StationIndex {
        [
            station_at(3, Coord { x: 0.4, y: 0.4 }, 3.0),
            station_at(1, Coord { x: -0.2, y: -0.2 }, 3.0),
            station_at(2, Coord { x: 2.0, y: 2.0 }, 3.0),
        ]
        .into_iter()
        .collect()
    }

    #[rstest]
    fn returns_stations_inside_the_box_sorted_by_id(index: StationIndex) {
        let bbox = Rect::new(Coord { x: -0.3, y: -0.3 }, Coord { x: 0.6, y: 0.6 });
        let ids: Vec<_> = index.stations_in_rect(&bbox).map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[rstest]
    fn includes_boundary_points(index: StationIndex) {
        let bbox = Rect::new(Coord { x: 2.0, y: 2.0 }, Coord { x: 3.0, y: 3.0 });
        assert_eq!(index.stations_in_rect(&bbox).count(), 1);
    }

    #[rstest]
    fn empty_index_yields_nothing() {
        let index = StationIndex::default();
        let bbox = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 });
        assert!(index.is_empty());
        assert_eq!(index.stations_in_rect(&bbox).count(), 0);
    }
}
