//! Caller input validation: coordinates, children's ages and CLI age lists.

use crate::model::Coordinates;

/// Oldest age the adventure content is written for.
pub const MAX_CHILD_AGE: u8 = 17;

/// Input validation errors with helpful messages
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Age {age} is above the supported maximum of {max}")]
    AgeOutOfRange { age: u8, max: u8 },

    #[error("Could not parse age list '{input}': {reason}")]
    InvalidAgeList { input: String, reason: String },
}

/// Check that a coordinate pair is finite and within WGS84 bounds.
pub fn validate_coordinates(coords: Coordinates) -> Result<Coordinates, InputError> {
    if !coords.latitude.is_finite() || !(-90.0..=90.0).contains(&coords.latitude) {
        return Err(InputError::LatitudeOutOfRange(coords.latitude));
    }
    if !coords.longitude.is_finite() || !(-180.0..=180.0).contains(&coords.longitude) {
        return Err(InputError::LongitudeOutOfRange(coords.longitude));
    }
    Ok(coords)
}

/// Reject ages beyond [`MAX_CHILD_AGE`].
pub fn validate_ages(ages: &[u8]) -> Result<(), InputError> {
    match ages.iter().find(|&&age| age > MAX_CHILD_AGE) {
        Some(&age) => Err(InputError::AgeOutOfRange {
            age,
            max: MAX_CHILD_AGE,
        }),
        None => Ok(()),
    }
}

/// Empty age lists fall back to `default`; averaging nothing has no meaning.
pub fn normalize_ages(ages: &[u8], default: &[u8]) -> Vec<u8> {
    if ages.is_empty() {
        default.to_vec()
    } else {
        ages.to_vec()
    }
}

/// Parse a comma separated age list such as `"6,8"` or `"5, 9"`.
pub fn parse_ages(input: &str) -> Result<Vec<u8>, InputError> {
    let mut ages = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let age = part.parse::<u8>().map_err(|e| InputError::InvalidAgeList {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        ages.push(age);
    }
    validate_ages(&ages)?;
    Ok(ages)
}

/// Average age, or 0.0 for an empty slice.
pub fn average_age(ages: &[u8]) -> f64 {
    if ages.is_empty() {
        return 0.0;
    }
    ages.iter().map(|&a| a as f64).sum::<f64>() / ages.len() as f64
}
