//! Host surfaces the controller drives: the map, the position source and the
//! form/list UI.

use thiserror::Error;

use crate::model::workout::{Coords, WorkoutType};
use crate::service::dto::ListEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct PopupOptions {
    pub max_width: u16,
    pub min_width: u16,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

/// Content of a marker popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub content: String,
    pub options: PopupOptions,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub zoom: u8,
    pub animate: bool,
    pub duration_secs: f64,
}

pub trait MapSurface {
    /// Creates the map view centred on `center`.
    fn load(&mut self, center: Coords, zoom: u8);
    fn place_marker(&mut self, coords: Coords, popup: &Popup);
    fn pan_to(&mut self, coords: Coords, options: PanOptions);
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("geolocation is not available")]
    Unavailable,

    #[error("permission to read the position was denied")]
    Denied,
}

pub trait Geolocation {
    fn current_position(&mut self) -> Result<Coords, GeolocationError>;
}

/// Always answers with the same position, or `Unavailable` when none is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGeolocation {
    position: Option<Coords>,
}

impl FixedGeolocation {
    pub fn new(position: Option<Coords>) -> Self {
        Self { position }
    }
}

impl Geolocation for FixedGeolocation {
    fn current_position(&mut self) -> Result<Coords, GeolocationError> {
        self.position.ok_or(GeolocationError::Unavailable)
    }
}

pub trait UiSurface {
    /// Blocking, user-facing message.
    fn alert(&mut self, message: &str);
    fn show_form(&mut self);
    /// Hides the form and clears its input fields.
    fn hide_form(&mut self);
    fn focus_distance(&mut self);
    /// Shows the cadence field for running, the elevation field for cycling.
    fn show_extra_field(&mut self, kind: WorkoutType);
    /// Inserts an entry right after the form, so newest entries come first.
    fn insert_entry(&mut self, entry: ListEntry);
    /// Reloads the whole application.
    fn reload(&mut self);
}
