//! Vehicle enrollment rules.
//!
//! Vehicles are created once with their initial odometer reading. The
//! reading is the floor for every trip and never changes afterwards.

use serde::{Deserialize, Serialize};

use crate::ledger::{LedgerError, MAX_ODOMETER};

/// Fields supplied when enrolling a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVehicle {
    /// Display name, e.g. "Company Golf".
    pub name: String,
    /// Optional license plate.
    pub license_plate: Option<String>,
    /// Odometer reading at enrollment, in whole kilometres.
    pub initial_mileage: i64,
}

/// Stateless vehicle service.
pub struct VehicleService;

impl VehicleService {
    /// Validates and normalizes a new vehicle.
    ///
    /// Name and plate are trimmed; a blank plate is dropped.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyVehicleName` for a blank name,
    /// `LedgerError::NegativeInitialMileage` for a negative reading and
    /// `LedgerError::OdometerOutOfRange` above `MAX_ODOMETER`.
    pub fn validate_new(vehicle: NewVehicle) -> Result<NewVehicle, LedgerError> {
        let name = vehicle.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::EmptyVehicleName);
        }
        if vehicle.initial_mileage < 0 {
            return Err(LedgerError::NegativeInitialMileage);
        }
        if vehicle.initial_mileage > MAX_ODOMETER {
            return Err(LedgerError::OdometerOutOfRange { max: MAX_ODOMETER });
        }

        let license_plate = vehicle
            .license_plate
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(NewVehicle {
            name,
            license_plate,
            initial_mileage: vehicle.initial_mileage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vehicle(name: &str, plate: Option<&str>, initial_mileage: i64) -> NewVehicle {
        NewVehicle {
            name: name.to_string(),
            license_plate: plate.map(str::to_string),
            initial_mileage,
        }
    }

    #[test]
    fn test_valid_vehicle_is_normalized() {
        let result = VehicleService::validate_new(vehicle("  Golf ", Some(" B-MB 123 "), 10_000));
        let v = result.unwrap();
        assert_eq!(v.name, "Golf");
        assert_eq!(v.license_plate.as_deref(), Some("B-MB 123"));
        assert_eq!(v.initial_mileage, 10_000);
    }

    #[test]
    fn test_blank_plate_is_dropped() {
        let v = VehicleService::validate_new(vehicle("Golf", Some("   "), 0)).unwrap();
        assert!(v.license_plate.is_none());
    }

    #[rstest]
    #[case("", 0, LedgerError::EmptyVehicleName)]
    #[case("   ", 100, LedgerError::EmptyVehicleName)]
    #[case("Golf", -1, LedgerError::NegativeInitialMileage)]
    #[case("Golf", MAX_ODOMETER + 1, LedgerError::OdometerOutOfRange { max: MAX_ODOMETER })]
    fn test_invalid_vehicle(
        #[case] name: &str,
        #[case] initial_mileage: i64,
        #[case] expected: LedgerError,
    ) {
        let result = VehicleService::validate_new(vehicle(name, None, initial_mileage));
        assert_eq!(result, Err(expected));
    }
}
