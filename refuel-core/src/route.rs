//! Route geometry: an ordered polyline with cumulative road distance.

use std::collections::BTreeSet;

use geo::{Coord, Distance, Haversine, Point, Rect};

use crate::PlanError;

/// Metres in one statute mile, used for geodesic distances.
pub const METRES_PER_MILE: f64 = 1609.344;

/// Kilometres per mile used when converting corridor distances.
pub const KM_PER_MILE: f64 = 1.60934;

/// Approximate kilometres spanned by one degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Default upper bound on retained points after [`RoutePolyline::simplify`].
pub const DEFAULT_MAX_ROUTE_POINTS: usize = 300;

/// Turns sharper than this survive simplification regardless of sampling.
const TURN_THRESHOLD_DEGREES: f64 = 15.0;

const DISTANCE_EPSILON: f64 = 1e-9;

/// Ordered route geometry from start to destination.
///
/// Coordinates use WGS84 with `x = longitude` and `y = latitude`. Each point
/// carries the road distance in miles from the start; the first value is
/// zero and values never decrease.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use refuel_core::RoutePolyline;
///
/// # fn main() -> Result<(), refuel_core::PlanError> {
/// let route = RoutePolyline::new(
///     vec![Coord { x: -100.0, y: 40.0 }, Coord { x: -99.0, y: 40.0 }],
///     vec![0.0, 53.0],
/// )?;
/// assert_eq!(route.total_miles(), 53.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawRoute", into = "RawRoute")
)]
pub struct RoutePolyline {
    points: Vec<Coord<f64>>,
    cumulative_miles: Vec<f64>,
}

/// Unvalidated wire form of a [`RoutePolyline`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawRoute {
    points: Vec<Coord<f64>>,
    cumulative_miles: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRoute> for RoutePolyline {
    type Error = PlanError;

    fn try_from(raw: RawRoute) -> Result<Self, Self::Error> {
        Self::new(raw.points, raw.cumulative_miles)
    }
}

#[cfg(feature = "serde")]
impl From<RoutePolyline> for RawRoute {
    fn from(route: RoutePolyline) -> Self {
        Self {
            points: route.points,
            cumulative_miles: route.cumulative_miles,
        }
    }
}

/// A straight piece of the polyline between two consecutive points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSegment {
    /// First endpoint.
    pub start: Coord<f64>,
    /// Second endpoint.
    pub end: Coord<f64>,
    /// Cumulative miles at `start`.
    pub start_miles: f64,
    /// Cumulative miles at `end`.
    pub end_miles: f64,
}

impl RoutePolyline {
    /// Build a route from points and their cumulative distances in miles.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidGeometry`] when fewer than two points are
    /// supplied, when the two sequences differ in length, when a coordinate
    /// is not a valid WGS84 position, or when the distances do not start at
    /// zero, decrease, or sum to a zero-length route.
    pub fn new(points: Vec<Coord<f64>>, cumulative_miles: Vec<f64>) -> Result<Self, PlanError> {
        if points.len() < 2 {
            return Err(geometry("route needs at least two points"));
        }
        if points.len() != cumulative_miles.len() {
            return Err(geometry("every point needs a cumulative distance"));
        }
        if !points.iter().all(is_valid_coord) {
            return Err(geometry("coordinates must be finite WGS84 positions"));
        }
        validate_cumulative(&cumulative_miles)?;
        Ok(Self {
            points,
            cumulative_miles,
        })
    }

    /// Build a route whose cumulative distances follow the haversine length
    /// of each segment.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`RoutePolyline::new`].
    pub fn from_coords(points: Vec<Coord<f64>>) -> Result<Self, PlanError> {
        let cumulative = cumulative_haversine_miles(&points);
        Self::new(points, cumulative)
    }

    /// Ordered route coordinates.
    #[must_use]
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Cumulative distance in miles for each point.
    #[must_use]
    pub fn cumulative_miles(&self) -> &[f64] {
        &self.cumulative_miles
    }

    /// Total route length in miles.
    #[must_use]
    pub fn total_miles(&self) -> f64 {
        self.cumulative_miles.last().copied().unwrap_or_default()
    }

    /// First coordinate of the route.
    #[must_use]
    pub fn start(&self) -> Coord<f64> {
        self.points.first().copied().unwrap_or_default()
    }

    /// Last coordinate of the route.
    #[must_use]
    pub fn end(&self) -> Coord<f64> {
        self.points.last().copied().unwrap_or_default()
    }

    /// Iterate over consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = RouteSegment> + '_ {
        self.points
            .windows(2)
            .zip(self.cumulative_miles.windows(2))
            .filter_map(|(points, miles)| match (points, miles) {
                ([start, end], [start_miles, end_miles]) => Some(RouteSegment {
                    start: *start,
                    end: *end,
                    start_miles: *start_miles,
                    end_miles: *end_miles,
                }),
                _ => None,
            })
    }

    /// Rescale cumulative distances so the route ends at `total_miles`.
    ///
    /// Routing services report a road distance that is longer than the sum
    /// of straight polyline segments; stations are then positioned against
    /// the road distance.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidGeometry`] when `total_miles` is not a
    /// positive finite number.
    pub fn scaled_to_total(self, total_miles: f64) -> Result<Self, PlanError> {
        if !(total_miles.is_finite() && total_miles > 0.0) {
            return Err(geometry("route distance must be positive"));
        }
        let factor = total_miles / self.total_miles();
        let mut cumulative: Vec<f64> = self
            .cumulative_miles
            .iter()
            .map(|miles| miles * factor)
            .collect();
        if let Some(last) = cumulative.last_mut() {
            *last = total_miles;
        }
        Self::new(self.points, cumulative)
    }

    /// Reduce the polyline to at most `max_points` points.
    ///
    /// The first and last points are always kept, along with regularly
    /// sampled points and turns sharper than 15 degrees. Retained points
    /// keep their original cumulative distances so the route length does not
    /// shrink.
    #[must_use]
    pub fn simplify(&self, max_points: usize) -> Self {
        let len = self.points.len();
        if len <= max_points || max_points < 2 {
            return self.clone();
        }

        let last = len - 1;
        let stride = len.div_ceil(max_points).max(1);
        let mut keep: BTreeSet<usize> = (0..len).step_by(stride).collect();
        keep.insert(last);
        keep.extend(
            self.points
                .windows(3)
                .enumerate()
                .filter(|(_, window)| match window {
                    [a, b, c] => turn_degrees(*a, *b, *c) > TURN_THRESHOLD_DEGREES,
                    _ => false,
                })
                .map(|(index, _)| index + 1),
        );

        let mut indices: Vec<usize> = keep.into_iter().collect();
        if indices.len() > max_points {
            indices = downsample(&indices, max_points);
        }

        let (points, cumulative_miles) = indices
            .iter()
            .filter_map(|&index| {
                Some((*self.points.get(index)?, *self.cumulative_miles.get(index)?))
            })
            .unzip();
        Self {
            points,
            cumulative_miles,
        }
    }

    /// Axis-aligned bounding rectangle of the route.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect<f64> {
        let start = self.start();
        let (min, max) = self.points.iter().fold((start, start), |(lo, hi), p| {
            (
                Coord {
                    x: lo.x.min(p.x),
                    y: lo.y.min(p.y),
                },
                Coord {
                    x: hi.x.max(p.x),
                    y: hi.y.max(p.y),
                },
            )
        });
        Rect::new(min, max)
    }

    /// Bounding rectangle expanded by `max_corridor_km` on every side.
    ///
    /// Longitude padding is widened by the cosine of the mean latitude so the
    /// rectangle contains every point within the corridor.
    #[must_use]
    pub fn corridor_rect(&self, max_corridor_km: f64) -> Rect<f64> {
        let rect = self.bounding_rect();
        let mean_latitude = (rect.min().y + rect.max().y) / 2.0;
        let lat_pad = max_corridor_km / KM_PER_DEGREE;
        let cos_lat = mean_latitude.to_radians().cos().abs().max(0.01);
        let lon_pad = max_corridor_km / (KM_PER_DEGREE * cos_lat);
        Rect::new(
            Coord {
                x: rect.min().x - lon_pad,
                y: rect.min().y - lat_pad,
            },
            Coord {
                x: rect.max().x + lon_pad,
                y: rect.max().y + lat_pad,
            },
        )
    }
}

/// Great-circle distance between two coordinates in miles.
#[must_use]
pub fn haversine_miles(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to)) / METRES_PER_MILE
}

fn cumulative_haversine_miles(points: &[Coord<f64>]) -> Vec<f64> {
    let mut total = 0.0;
    let mut cumulative = Vec::with_capacity(points.len());
    if !points.is_empty() {
        cumulative.push(0.0);
    }
    for pair in points.windows(2) {
        if let [from, to] = pair {
            total += haversine_miles(*from, *to);
            cumulative.push(total);
        }
    }
    cumulative
}

fn validate_cumulative(cumulative_miles: &[f64]) -> Result<(), PlanError> {
    if !cumulative_miles.iter().all(|miles| miles.is_finite()) {
        return Err(geometry("cumulative distances must be finite"));
    }
    if cumulative_miles
        .first()
        .is_none_or(|first| first.abs() > DISTANCE_EPSILON)
    {
        return Err(geometry("cumulative distances must start at zero"));
    }
    if cumulative_miles.windows(2).any(|pair| match pair {
        [previous, next] => next < previous,
        _ => false,
    }) {
        return Err(geometry("cumulative distances must not decrease"));
    }
    if cumulative_miles
        .last()
        .is_none_or(|last| *last <= DISTANCE_EPSILON)
    {
        return Err(geometry("route has zero length"));
    }
    Ok(())
}

fn is_valid_coord(coord: &Coord<f64>) -> bool {
    coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y)
}

/// Heading change at `b` in degrees, measured on a local flat projection.
fn turn_degrees(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    let cos_lat = b.y.to_radians().cos();
    let first = ((b.x - a.x) * cos_lat, b.y - a.y);
    let second = ((c.x - b.x) * cos_lat, c.y - b.y);
    if first == (0.0, 0.0) || second == (0.0, 0.0) {
        return 0.0;
    }
    let heading_a = first.1.atan2(first.0);
    let heading_b = second.1.atan2(second.0);
    let delta = (heading_b - heading_a).to_degrees().abs() % 360.0;
    if delta > 180.0 { 360.0 - delta } else { delta }
}

/// Pick `target` evenly spread entries from `indices`, keeping both ends.
fn downsample(indices: &[usize], target: usize) -> Vec<usize> {
    let Some(last_slot) = indices.len().checked_sub(1) else {
        return Vec::new();
    };
    let spans = target.saturating_sub(1).max(1);
    let mut picked: Vec<usize> = (0..target)
        .filter_map(|slot| {
            let position = (slot * last_slot).div_ceil(spans).min(last_slot);
            indices.get(position).copied()
        })
        .collect();
    picked.dedup();
    picked
}

const fn geometry(reason: &'static str) -> PlanError {
    PlanError::InvalidGeometry { reason }
}
