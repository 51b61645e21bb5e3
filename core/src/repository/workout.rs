use anyhow::Result;
use tracing::{debug, warn};

use crate::model::workout::Workout;
use crate::repository::traits::KeyValueStore;

pub const WORKOUTS_KEY: &str = "workouts";

/// What the storage held for the workout list.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Empty,
    Valid(Vec<Workout>),
    Malformed(String),
}

/// Saves and loads the whole workout list under a single key.
pub struct WorkoutRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> WorkoutRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        let json = serde_json::to_string_pretty(workouts)?;
        self.store.set(WORKOUTS_KEY, &json)?;
        debug!(count = workouts.len(), "saved workouts");
        Ok(())
    }

    pub fn load(&self) -> Result<Snapshot> {
        let Some(raw) = self.store.get(WORKOUTS_KEY)? else {
            return Ok(Snapshot::Empty);
        };

        match serde_json::from_str::<Vec<Workout>>(&raw) {
            Ok(workouts) => Ok(Snapshot::Valid(workouts)),
            Err(e) => {
                warn!(error = %e, "stored workouts could not be parsed");
                Ok(Snapshot::Malformed(e.to_string()))
            }
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(WORKOUTS_KEY)
    }
}
