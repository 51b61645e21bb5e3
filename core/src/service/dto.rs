use serde::{Serialize, Deserialize};
use uuid::Uuid;
use crate::model::workout::{Workout, WorkoutKind, WorkoutType};
use crate::surface::{Popup, PopupOptions};

/// One row of the workout list, already formatted for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: Uuid,
    pub kind: WorkoutType,
    pub title: String,
    pub icon: String,

    pub distance_km: f64,
    pub duration_min: f64,

    // Pace for running, speed for cycling
    pub metric: f64,
    pub metric_unit: String,

    // Cadence for running, elevation gain for cycling
    pub extra_icon: String,
    pub extra: f64,
    pub extra_unit: String,
}

impl ListEntry {
    pub fn from_entity(workout: &Workout) -> Self {
        let (metric, metric_unit, extra_icon, extra, extra_unit) = match &workout.kind {
            WorkoutKind::Running { cadence_spm, pace_min_per_km } => {
                (*pace_min_per_km, "min/km", "🦶🏼", *cadence_spm, "spm")
            }
            WorkoutKind::Cycling { elevation_gain_m, speed_km_per_h } => {
                (*speed_km_per_h, "km/h", "⛰", *elevation_gain_m, "m")
            }
        };

        Self {
            id: workout.id,
            kind: workout.workout_type(),
            title: workout.description.clone(),
            icon: workout.workout_type().icon().to_string(),
            distance_km: workout.distance_km,
            duration_min: workout.duration_min,
            metric,
            metric_unit: metric_unit.to_string(),
            extra_icon: extra_icon.to_string(),
            extra,
            extra_unit: extra_unit.to_string(),
        }
    }

    /// Derived metric rounded to one decimal.
    pub fn metric_display(&self) -> String {
        format!("{:.1}", self.metric)
    }

    /// The fields shown under the title, as `(icon, value, unit)`.
    pub fn details(&self) -> Vec<(String, String, String)> {
        vec![
            (self.icon.clone(), fmt_number(self.distance_km), "km".to_string()),
            ("⏱".to_string(), fmt_number(self.duration_min), "min".to_string()),
            ("⚡️".to_string(), self.metric_display(), self.metric_unit.clone()),
            (self.extra_icon.clone(), fmt_number(self.extra), self.extra_unit.clone()),
        ]
    }
}

// Whole numbers without a trailing ".0", like the form shows them.
fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

pub fn popup_for(workout: &Workout) -> Popup {
    let kind = workout.workout_type();
    Popup {
        content: format!("{} {}", kind.icon(), workout.description),
        options: PopupOptions {
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            class_name: format!("{}-popup", kind.label().to_lowercase()),
        },
    }
}
