use anyhow::Result;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, DEFAULT_ZOOM};
use crate::input::{ValidationPolicy, WorkoutForm};
use crate::model::workout::{Coords, Workout, WorkoutType};
use crate::repository::{KeyValueStore, Snapshot, WorkoutRepository};
use crate::service::dto::{popup_for, ListEntry};
use crate::surface::{Geolocation, GeolocationError, MapSurface, PanOptions, UiSurface};

pub const POSITION_UNAVAILABLE_MESSAGE: &str = "Could not get your position";
pub const MALFORMED_STORAGE_MESSAGE: &str = "Stored workouts could not be read and were ignored";
pub const SAVE_FAILED_MESSAGE: &str = "Your workouts could not be saved";

const PAN_DURATION_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapState {
    /// Waiting for the position.
    Pending,
    Ready,
    /// The position could not be read; stays this way for the session.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Idle,
    AwaitingInput { pending: Coords },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    NoData,
    Restored(usize),
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOptions {
    pub zoom: u8,
    pub validation: ValidationPolicy,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            validation: ValidationPolicy::default(),
        }
    }
}

impl From<&AppConfig> for ControllerOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            zoom: config.map.zoom,
            validation: config.validation,
        }
    }
}

/// Owns the workout list and keeps the map, the list UI and storage in step
/// with it. Every event handler takes `&mut self`.
pub struct Controller<S: KeyValueStore, M: MapSurface, U: UiSurface> {
    repo: WorkoutRepository<S>,
    map: M,
    ui: U,
    options: ControllerOptions,
    workouts: Vec<Workout>,
    map_state: MapState,
    form_state: FormState,
}

impl<S: KeyValueStore, M: MapSurface, U: UiSurface> Controller<S, M, U> {
    pub fn new(store: S, map: M, ui: U, options: ControllerOptions) -> Self {
        Self {
            repo: WorkoutRepository::new(store),
            map,
            ui,
            options,
            workouts: Vec::new(),
            map_state: MapState::Pending,
            form_state: FormState::Idle,
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    pub fn map_state(&self) -> MapState {
        self.map_state
    }

    pub fn form_state(&self) -> FormState {
        self.form_state
    }

    // --- Map lifecycle ---

    pub fn request_location<G: Geolocation>(&mut self, geolocation: &mut G) {
        let position = geolocation.current_position();
        self.on_position(position);
    }

    /// Completes a position request. Markers for everything already in the
    /// list (restored workouts included) are placed once the map is loaded.
    pub fn on_position(&mut self, position: Result<Coords, GeolocationError>) {
        if self.map_state != MapState::Pending {
            debug!(state = ?self.map_state, "position already resolved");
            return;
        }

        match position {
            Ok(coords) => {
                info!(%coords, zoom = self.options.zoom, "map ready");
                self.map.load(coords, self.options.zoom);
                self.map_state = MapState::Ready;
                for i in 0..self.workouts.len() {
                    self.render_marker_at(i);
                }
            }
            Err(e) => {
                warn!(error = %e, "could not get position");
                self.map_state = MapState::Unavailable;
                self.ui.alert(POSITION_UNAVAILABLE_MESSAGE);
            }
        }
    }

    // --- Form ---

    pub fn on_map_clicked(&mut self, coords: Coords) {
        if self.map_state != MapState::Ready {
            return;
        }
        debug!(%coords, "map clicked");
        self.form_state = FormState::AwaitingInput { pending: coords };
        self.ui.show_form();
        self.ui.focus_distance();
    }

    pub fn on_type_changed(&mut self, kind: WorkoutType) {
        self.ui.show_extra_field(kind);
    }

    pub fn cancel_form(&mut self) {
        self.form_state = FormState::Idle;
        self.ui.hide_form();
    }

    /// Validates the form and logs a new workout at the pending location.
    /// Invalid input leaves the form open with its location. A failed save
    /// keeps the workout in memory and is reported through an alert.
    pub fn on_form_submitted(&mut self, form: &WorkoutForm) -> Option<&Workout> {
        let FormState::AwaitingInput { pending } = self.form_state else {
            warn!("form submitted without a selected location");
            return None;
        };

        let valid = match form.validate(&self.options.validation) {
            Ok(valid) => valid,
            Err(e) => {
                debug!(error = %e, "rejected form input");
                self.ui.alert(e.alert_message());
                return None;
            }
        };

        let workout = valid.into_workout(pending);
        info!(id = %workout.id, description = %workout.description, "workout created");
        self.render_marker(&workout);
        self.render_list_entry(&workout);
        self.workouts.push(workout);

        self.form_state = FormState::Idle;
        self.ui.hide_form();

        if let Err(e) = self.persist() {
            warn!(error = %e, "could not save workouts");
            self.ui.alert(SAVE_FAILED_MESSAGE);
        }
        self.workouts.last()
    }

    // --- Rendering ---

    pub fn render_marker(&mut self, workout: &Workout) {
        self.map.place_marker(workout.coords, &popup_for(workout));
    }

    fn render_marker_at(&mut self, index: usize) {
        let workout = &self.workouts[index];
        let popup = popup_for(workout);
        self.map.place_marker(workout.coords, &popup);
    }

    pub fn render_list_entry(&mut self, workout: &Workout) {
        self.ui.insert_entry(ListEntry::from_entity(workout));
    }

    /// `id` is `None` when the click landed outside any list entry.
    pub fn on_list_entry_clicked(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };
        if self.map_state != MapState::Ready {
            debug!(id, "list entry clicked before the map is ready");
            return;
        }
        let Ok(id) = Uuid::parse_str(id) else {
            return;
        };
        let Some(workout) = self.workouts.iter_mut().find(|w| w.id == id) else {
            return;
        };

        workout.click();
        let coords = workout.coords;
        self.map.pan_to(
            coords,
            PanOptions {
                zoom: self.options.zoom,
                animate: true,
                duration_secs: PAN_DURATION_SECS,
            },
        );
    }

    // --- Storage ---

    pub fn persist(&mut self) -> Result<()> {
        self.repo.save(&self.workouts)
    }

    pub fn restore(&mut self) -> Result<RestoreOutcome> {
        match self.repo.load()? {
            Snapshot::Empty => Ok(RestoreOutcome::NoData),
            Snapshot::Malformed(reason) => {
                self.ui.alert(MALFORMED_STORAGE_MESSAGE);
                Ok(RestoreOutcome::Malformed(reason))
            }
            Snapshot::Valid(workouts) => {
                info!(count = workouts.len(), "restored workouts");
                self.workouts = workouts;
                for i in 0..self.workouts.len() {
                    let entry = ListEntry::from_entity(&self.workouts[i]);
                    self.ui.insert_entry(entry);
                    if self.map_state == MapState::Ready {
                        self.render_marker_at(i);
                    }
                }
                Ok(RestoreOutcome::Restored(self.workouts.len()))
            }
        }
    }

    /// Drops every stored workout and reloads the application.
    pub fn reset_all(&mut self) -> Result<()> {
        self.repo.clear()?;
        info!("all workouts cleared");
        self.ui.reload();
        Ok(())
    }
}
