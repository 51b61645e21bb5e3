use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use uuid::Uuid;
use std::fmt;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// A latitude/longitude pair in degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// Tag selecting the workout variant, as chosen in the form.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            WorkoutType::Running => WorkoutType::Cycling,
            WorkoutType::Cycling => WorkoutType::Running,
        }
    }
}

impl std::str::FromStr for WorkoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" | "run" | "r" => Ok(WorkoutType::Running),
            "cycling" | "cycle" | "c" => Ok(WorkoutType::Cycling),
            _ => Err(format!("Unknown workout type: {}", s)),
        }
    }
}

/// Variant-specific fields. Serialized flat next to the common fields with a
/// `type` discriminant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    #[serde(flatten)]
    pub kind: WorkoutKind,
    pub description: String,

    // Never read back for logic.
    #[serde(default)]
    pub clicks: u32,
}

impl Workout {
    pub fn running(coords: Coords, distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::recorded_at(Utc::now(), coords, distance_km, duration_min, WorkoutType::Running, cadence_spm)
    }

    pub fn cycling(coords: Coords, distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self::recorded_at(Utc::now(), coords, distance_km, duration_min, WorkoutType::Cycling, elevation_gain_m)
    }

    /// Builds a workout with an explicit creation time. `extra` is the cadence
    /// for running and the elevation gain for cycling.
    ///
    /// No validation happens here: non-positive inputs yield NaN or infinite
    /// metrics.
    pub fn recorded_at(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        workout_type: WorkoutType,
        extra: f64,
    ) -> Self {
        let kind = match workout_type {
            WorkoutType::Running => WorkoutKind::Running {
                cadence_spm: extra,
                pace_min_per_km: duration_min / distance_km,
            },
            WorkoutType::Cycling => WorkoutKind::Cycling {
                elevation_gain_m: extra,
                speed_km_per_h: distance_km / (duration_min / 60.0),
            },
        };
        let local_date = created_at.with_timezone(&Local).date_naive();

        Self {
            id: Uuid::new_v4(),
            created_at,
            coords,
            distance_km,
            duration_min,
            description: describe(workout_type, local_date),
            kind,
            clicks: 0,
        }
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    pub fn click(&mut self) {
        self.clicks += 1;
    }
}

/// `"{Kind} on {Month} {Day}"` with a fixed English month table.
pub fn describe(workout_type: WorkoutType, date: NaiveDate) -> String {
    format!(
        "{} on {} {}",
        workout_type.label(),
        MONTHS[date.month0() as usize],
        date.day()
    )
}
