use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::workout::{Coords, Workout, WorkoutType};

pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";

/// Raw text of the workout form fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub kind: WorkoutType,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Cycling elevation is only checked for finiteness unless this is set.
    pub require_positive_elevation: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
}

impl ValidationError {
    /// The message shown to the user; the form has no per-field errors.
    pub fn alert_message(&self) -> &'static str {
        INVALID_INPUT_MESSAGE
    }
}

/// Validated numbers, ready to become a `Workout`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidForm {
    pub kind: WorkoutType,
    pub distance_km: f64,
    pub duration_min: f64,
    pub extra: f64,
}

impl ValidForm {
    pub fn into_workout(self, coords: Coords) -> Workout {
        match self.kind {
            WorkoutType::Running => Workout::running(coords, self.distance_km, self.duration_min, self.extra),
            WorkoutType::Cycling => Workout::cycling(coords, self.distance_km, self.duration_min, self.extra),
        }
    }
}

impl WorkoutForm {
    pub fn validate(&self, policy: &ValidationPolicy) -> Result<ValidForm, ValidationError> {
        let distance_km = finite("distance", &self.distance)?;
        let duration_min = finite("duration", &self.duration)?;

        let extra = match self.kind {
            WorkoutType::Running => {
                let cadence = finite("cadence", &self.cadence)?;
                positive("cadence", cadence)?;
                cadence
            }
            WorkoutType::Cycling => {
                let elevation = finite("elevation", &self.elevation)?;
                if policy.require_positive_elevation {
                    positive("elevation", elevation)?;
                }
                elevation
            }
        };

        positive("distance", distance_km)?;
        positive("duration", duration_min)?;

        // Extreme but finite inputs can still overflow the pace or speed,
        // which would then be stored as `null`.
        let metric = match self.kind {
            WorkoutType::Running => ("pace", duration_min / distance_km),
            WorkoutType::Cycling => ("speed", distance_km / (duration_min / 60.0)),
        };
        if !metric.1.is_finite() {
            return Err(ValidationError::NotFinite { field: metric.0 });
        }

        Ok(ValidForm {
            kind: self.kind,
            distance_km,
            duration_min,
            extra,
        })
    }
}

// Unparseable text is treated like NaN.
fn finite(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

/// Parses `"lat,lng"`.
pub fn parse_coords(input: &str) -> Option<Coords> {
    let (lat, lng) = input.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some(Coords::new(lat, lng))
}
