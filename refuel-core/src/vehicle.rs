//! Vehicle tank and economy parameters.

use crate::PlanError;

/// Default tank capacity in gallons.
pub const DEFAULT_TANK_CAPACITY_GALLONS: f64 = 50.0;

/// Default fuel economy in miles per gallon.
pub const DEFAULT_MILES_PER_GALLON: f64 = 10.0;

/// Tank capacity, fuel economy and starting fuel of the vehicle.
///
/// # Examples
///
/// ```
/// use refuel_core::VehicleProfile;
///
/// # fn main() -> Result<(), refuel_core::PlanError> {
/// let vehicle = VehicleProfile::new(20.0, 10.0, Some(10.0))?;
/// assert_eq!(vehicle.range_miles(), 200.0);
/// assert_eq!(vehicle.initial_range_miles(), 100.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawVehicle", into = "RawVehicle")
)]
pub struct VehicleProfile {
    tank_capacity_gallons: f64,
    miles_per_gallon: f64,
    initial_fuel_gallons: f64,
}

#[cfg(feature = "serde")]
#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
struct RawVehicle {
    tank_capacity_gallons: f64,
    miles_per_gallon: f64,
    #[serde(default)]
    initial_fuel_gallons: Option<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawVehicle> for VehicleProfile {
    type Error = PlanError;

    fn try_from(raw: RawVehicle) -> Result<Self, Self::Error> {
        Self::new(
            raw.tank_capacity_gallons,
            raw.miles_per_gallon,
            raw.initial_fuel_gallons,
        )
    }
}

#[cfg(feature = "serde")]
impl From<VehicleProfile> for RawVehicle {
    fn from(vehicle: VehicleProfile) -> Self {
        Self {
            tank_capacity_gallons: vehicle.tank_capacity_gallons,
            miles_per_gallon: vehicle.miles_per_gallon,
            initial_fuel_gallons: Some(vehicle.initial_fuel_gallons),
        }
    }
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            tank_capacity_gallons: DEFAULT_TANK_CAPACITY_GALLONS,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
            initial_fuel_gallons: DEFAULT_TANK_CAPACITY_GALLONS,
        }
    }
}

impl VehicleProfile {
    /// Validate and construct a profile. A missing initial fuel level means
    /// the tank starts full.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidParameters`] when the capacity or economy
    /// is not positive, or the initial fuel lies outside `[0, capacity]`.
    pub fn new(
        tank_capacity_gallons: f64,
        miles_per_gallon: f64,
        initial_fuel_gallons: Option<f64>,
    ) -> Result<Self, PlanError> {
        if !is_positive(tank_capacity_gallons) {
            return Err(PlanError::invalid(
                "tank_capacity_gallons",
                "must be positive",
            ));
        }
        if !is_positive(miles_per_gallon) {
            return Err(PlanError::invalid("miles_per_gallon", "must be positive"));
        }
        let initial = initial_fuel_gallons.unwrap_or(tank_capacity_gallons);
        if !(initial.is_finite() && (0.0..=tank_capacity_gallons).contains(&initial)) {
            return Err(PlanError::invalid(
                "initial_fuel_gallons",
                "must lie between zero and the tank capacity",
            ));
        }
        Ok(Self {
            tank_capacity_gallons,
            miles_per_gallon,
            initial_fuel_gallons: initial,
        })
    }

    /// Tank capacity in gallons.
    #[must_use]
    pub const fn tank_capacity_gallons(&self) -> f64 {
        self.tank_capacity_gallons
    }

    /// Fuel economy in miles per gallon.
    #[must_use]
    pub const fn miles_per_gallon(&self) -> f64 {
        self.miles_per_gallon
    }

    /// Fuel in the tank at the route start.
    #[must_use]
    pub const fn initial_fuel_gallons(&self) -> f64 {
        self.initial_fuel_gallons
    }

    /// Distance covered on a full tank.
    #[must_use]
    pub fn range_miles(&self) -> f64 {
        self.tank_capacity_gallons * self.miles_per_gallon
    }

    /// Distance covered on the initial fuel.
    #[must_use]
    pub fn initial_range_miles(&self) -> f64 {
        self.initial_fuel_gallons * self.miles_per_gallon
    }

    /// Gallons burnt driving `miles`.
    #[must_use]
    pub fn gallons_for(&self, miles: f64) -> f64 {
        miles / self.miles_per_gallon
    }

    /// Copy of the profile with a different starting fuel level.
    ///
    /// # Errors
    ///
    /// Fails when the level lies outside `[0, capacity]`.
    pub fn with_initial_fuel(self, initial_fuel_gallons: f64) -> Result<Self, PlanError> {
        Self::new(
            self.tank_capacity_gallons,
            self.miles_per_gallon,
            Some(initial_fuel_gallons),
        )
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_to_a_full_tank() {
        let vehicle = VehicleProfile::new(20.0, 8.0, None).expect("valid profile");
        assert_eq!(vehicle.initial_fuel_gallons(), 20.0);
        assert_eq!(VehicleProfile::default().range_miles(), 500.0);
    }

    #[rstest]
    #[case::zero_capacity(0.0, 10.0, None, "tank_capacity_gallons")]
    #[case::negative_economy(20.0, -1.0, None, "miles_per_gallon")]
    #[case::nan_economy(20.0, f64::NAN, None, "miles_per_gallon")]
    #[case::overfilled(20.0, 10.0, Some(21.0), "initial_fuel_gallons")]
    #[case::negative_fuel(20.0, 10.0, Some(-0.5), "initial_fuel_gallons")]
    fn rejects_invalid_profiles(
        #[case] capacity: f64,
        #[case] mpg: f64,
        #[case] initial: Option<f64>,
        #[case] expected: &str,
    ) {
        let err = VehicleProfile::new(capacity, mpg, initial).expect_err("profile should fail");
        match err {
            PlanError::InvalidParameters { parameter, .. } => assert_eq!(parameter, expected),
            other => panic!("expected InvalidParameters, got {other:?}"),
        }
    }

    #[rstest]
    fn empty_tank_is_allowed() {
        let vehicle = VehicleProfile::new(20.0, 10.0, Some(0.0)).expect("valid profile");
        assert_eq!(vehicle.initial_range_miles(), 0.0);
        assert_eq!(vehicle.gallons_for(25.0), 2.5);
    }
}
