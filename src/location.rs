// src/location.rs

use crate::error::MapError;
use crate::shape::Shape;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A named geographic point as stored in the backing table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub long: f64,
}

/// Column names used to read a [`Location`] out of a stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFields {
    pub name: String,
    pub lat: String,
    pub long: String,
}

impl Default for LocationFields {
    fn default() -> Self {
        LocationFields {
            name: "name".to_string(),
            lat: "lat".to_string(),
            long: "long".to_string(),
        }
    }
}

impl LocationFields {
    /// Comma-separated key list, suitable for a `keys` query parameter.
    pub fn as_keys(&self) -> String {
        format!("{},{},{}", self.name, self.lat, self.long)
    }
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, long: f64) -> Self {
        Location {
            name: name.into(),
            lat,
            long,
        }
    }

    /// Checks that both coordinates are finite numbers.
    pub fn validate(&self) -> Result<(), MapError> {
        if !self.lat.is_finite() || !self.long.is_finite() {
            return Err(MapError::InvalidRecord(format!(
                "location '{}' has non-finite coordinates ({}, {})",
                self.name, self.lat, self.long
            )));
        }
        Ok(())
    }

    /// Builds the labeled marker for this location: `x = lat`, `y = long`, `text = name`.
    pub fn to_marker(&self) -> Shape {
        Shape::banner(self.lat, self.long, self.name.clone())
    }

    /// Reads one stored row using the given field names.
    ///
    /// # Errors
    /// Returns `MapError::InvalidRecord` if the name is not a string or a coordinate
    /// is missing or not a finite number.
    pub fn from_row(row: &Value, fields: &LocationFields) -> Result<Self, MapError> {
        let name = row
            .get(&fields.name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                MapError::InvalidRecord(format!(
                    "field '{}' is missing or not a string in row {}",
                    fields.name, row
                ))
            })?;
        let lat = numeric_field(row, &fields.lat)?;
        let long = numeric_field(row, &fields.long)?;

        let location = Location::new(name, lat, long);
        location.validate()?;
        Ok(location)
    }
}

fn numeric_field(row: &Value, key: &str) -> Result<f64, MapError> {
    row.get(key).and_then(|v| v.as_f64()).ok_or_else(|| {
        MapError::InvalidRecord(format!(
            "field '{}' is missing or not a number in row {}",
            key, row
        ))
    })
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.name,
            self.lat.trunc() as i64,
            self.long.trunc() as i64
        )
    }
}

/// One banner per location, in the same order.
pub fn markers_from_locations(locations: &[Location]) -> Vec<Shape> {
    locations.iter().map(Location::to_marker).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_row_with_default_fields() {
        let row = json!({"objectId": "x1", "name": "Boise", "lat": 43.6, "long": -116.2});
        let location = Location::from_row(&row, &LocationFields::default()).unwrap();
        assert_eq!(location, Location::new("Boise", 43.6, -116.2));
    }

    #[test]
    fn reads_row_with_custom_fields_and_integer_coordinates() {
        let fields = LocationFields {
            name: "city".to_string(),
            lat: "latitude".to_string(),
            long: "longitude".to_string(),
        };
        let row = json!({"city": "Null Island", "latitude": 0, "longitude": 0});
        let location = Location::from_row(&row, &fields).unwrap();
        assert_eq!(location.lat, 0.0);
        assert_eq!(location.long, 0.0);
        assert_eq!(fields.as_keys(), "city,latitude,longitude");
    }

    #[test]
    fn rejects_rows_with_bad_fields() {
        let fields = LocationFields::default();
        let missing = json!({"name": "Nowhere", "lat": 1.0});
        assert!(matches!(
            Location::from_row(&missing, &fields),
            Err(MapError::InvalidRecord(_))
        ));

        let textual = json!({"name": "Here", "lat": "12", "long": 3.0});
        assert!(matches!(
            Location::from_row(&textual, &fields),
            Err(MapError::InvalidRecord(_))
        ));

        let unnamed = json!({"name": 5, "lat": 1.0, "long": 2.0});
        assert!(matches!(
            Location::from_row(&unnamed, &fields),
            Err(MapError::InvalidRecord(_))
        ));
    }

    #[test]
    fn validate_rejects_non_finite() {
        assert!(Location::new("nan", f64::NAN, 0.0).validate().is_err());
        assert!(Location::new("inf", 0.0, f64::INFINITY).validate().is_err());
        assert!(Location::new("ok", -90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn display_truncates() {
        assert_eq!(Location::new("Paris", 48.85, 2.35).to_string(), "Paris 48 2");
    }
}
