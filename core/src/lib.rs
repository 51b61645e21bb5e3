pub mod config;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod surface;

pub use config::{load_config, AppConfig, ConfigError};
pub use input::{parse_coords, ValidationError, ValidationPolicy, WorkoutForm};
pub use model::workout::{Coords, Workout, WorkoutKind, WorkoutType};
pub use repository::{FileStore, KeyValueStore, MemoryStore, Snapshot, WorkoutRepository};
pub use service::controller::{Controller, ControllerOptions, FormState, MapState, RestoreOutcome};
pub use service::dto::ListEntry;
pub use surface::{FixedGeolocation, Geolocation, GeolocationError, MapSurface, PanOptions, Popup, UiSurface};
