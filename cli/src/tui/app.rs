use anyhow::Result;
use ratatui::widgets::ListState;
use tracing::debug;
use mapty_core::{
    AppConfig, Controller, ControllerOptions, Coords, FileStore, FixedGeolocation, ListEntry,
    MapSurface, PanOptions, Popup, UiSurface, WorkoutForm, WorkoutType,
};

const MIN_ZOOM: u8 = 2;
const MAX_ZOOM: u8 = 18;
// Fraction of the visible span moved by one arrow key press.
const PAN_STEP: f64 = 0.1;

pub struct Marker {
    pub coords: Coords,
    pub label: String,
    pub kind: WorkoutType,
    pub max_width: u16,
}

/// Canvas-backed map. The crosshair always sits at the centre of the view.
#[derive(Default)]
pub struct TuiMap {
    pub center: Option<Coords>,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl TuiMap {
    /// Visible (longitude, latitude) span in degrees. Zoom 2 shows the whole world.
    pub fn span(&self) -> (f64, f64) {
        let lng_span = 360.0 / 2f64.powi(self.zoom.saturating_sub(MIN_ZOOM) as i32);
        (lng_span, lng_span / 2.0)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (lng_span, lat_span) = self.span();
        if let Some(center) = self.center.as_mut() {
            center.lng = (center.lng + dx * lng_span * PAN_STEP).clamp(-180.0, 180.0);
            center.lat = (center.lat + dy * lat_span * PAN_STEP).clamp(-90.0, 90.0);
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}

impl MapSurface for TuiMap {
    fn load(&mut self, center: Coords, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn place_marker(&mut self, coords: Coords, popup: &Popup) {
        let kind = if popup.options.class_name.starts_with("cycling") {
            WorkoutType::Cycling
        } else {
            WorkoutType::Running
        };
        self.markers.push(Marker {
            coords,
            label: popup.content.clone(),
            kind,
            max_width: popup.options.max_width,
        });
    }

    // A terminal redraw is the whole animation.
    fn pan_to(&mut self, coords: Coords, options: PanOptions) {
        self.center = Some(coords);
        self.zoom = options.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Kind,
    Distance,
    Duration,
    Extra,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Kind => FormField::Distance,
            FormField::Distance => FormField::Duration,
            FormField::Duration => FormField::Extra,
            FormField::Extra => FormField::Kind,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::Kind => FormField::Extra,
            FormField::Distance => FormField::Kind,
            FormField::Duration => FormField::Distance,
            FormField::Extra => FormField::Duration,
        }
    }
}

/// Form, list and alert state of the terminal UI.
pub struct TuiUi {
    pub form_visible: bool,
    pub form: WorkoutForm,
    pub focused_field: FormField,
    pub extra_field: WorkoutType,
    pub entries: Vec<ListEntry>,
    pub alert: Option<String>,
    pub reload_requested: bool,
}

impl TuiUi {
    fn new() -> Self {
        Self {
            form_visible: false,
            form: WorkoutForm::default(),
            focused_field: FormField::Distance,
            extra_field: WorkoutType::Running,
            entries: Vec::new(),
            alert: None,
            reload_requested: false,
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focused_field {
            FormField::Kind => None,
            FormField::Distance => Some(&mut self.form.distance),
            FormField::Duration => Some(&mut self.form.duration),
            FormField::Extra => match self.extra_field {
                WorkoutType::Running => Some(&mut self.form.cadence),
                WorkoutType::Cycling => Some(&mut self.form.elevation),
            },
        }
    }

    pub fn input_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '.' || c == '-') {
            return;
        }
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn previous_field(&mut self) {
        self.focused_field = self.focused_field.previous();
    }
}

impl UiSurface for TuiUi {
    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }

    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
        let kind = self.form.kind;
        self.form = WorkoutForm { kind, ..Default::default() };
    }

    fn focus_distance(&mut self) {
        self.focused_field = FormField::Distance;
    }

    fn show_extra_field(&mut self, kind: WorkoutType) {
        self.extra_field = kind;
    }

    fn insert_entry(&mut self, entry: ListEntry) {
        self.entries.insert(0, entry);
    }

    fn reload(&mut self) {
        self.reload_requested = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Map,
    List,
    Form,
}

pub struct App {
    pub controller: Controller<FileStore, TuiMap, TuiUi>,
    pub focus: Focus,
    pub list_state: ListState,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<App> {
        let store = FileStore::new(Some(config.data_dir()?))?;
        let mut controller = Controller::new(
            store,
            TuiMap::default(),
            TuiUi::new(),
            ControllerOptions::from(config),
        );

        // Restore first: the list must not depend on the position arriving.
        controller.restore()?;
        let mut geolocation = FixedGeolocation::new(config.geolocation.map(|g| g.coords()));
        controller.request_location(&mut geolocation);

        let mut list_state = ListState::default();
        if !controller.ui().entries.is_empty() {
            list_state.select(Some(0));
        }

        Ok(App {
            controller,
            focus: Focus::Map,
            list_state,
        })
    }

    pub fn map(&self) -> &TuiMap {
        self.controller.map()
    }

    pub fn ui(&self) -> &TuiUi {
        self.controller.ui()
    }

    pub fn reload_requested(&self) -> bool {
        self.controller.ui().reload_requested
    }

    pub fn dismiss_alert(&mut self) -> bool {
        self.controller.ui_mut().alert.take().is_some()
    }

    // --- Map ---

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.controller.map_mut().pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.controller.map_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.controller.map_mut().zoom_out();
    }

    pub fn click_map(&mut self) {
        if let Some(center) = self.map().center {
            self.controller.on_map_clicked(center);
            if self.ui().form_visible {
                self.focus = Focus::Form;
            }
        }
    }

    pub fn reset_all(&mut self) -> Result<()> {
        self.controller.reset_all()
    }

    // --- List ---

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Map => Focus::List,
            Focus::List => Focus::Map,
            Focus::Form => Focus::Form,
        };
    }

    pub fn next(&mut self) {
        let len = self.ui().entries.len();
        if len == 0 { return; }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.ui().entries.len();
        if len == 0 { return; }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn open_selected(&mut self) {
        let id = self
            .list_state
            .selected()
            .and_then(|i| self.ui().entries.get(i))
            .map(|e| e.id.to_string());
        debug!(?id, "list entry selected");
        self.controller.on_list_entry_clicked(id.as_deref());
    }

    // --- Form ---

    pub fn input_char(&mut self, c: char) {
        self.controller.ui_mut().input_char(c);
    }

    pub fn delete_char(&mut self) {
        self.controller.ui_mut().delete_char();
    }

    pub fn next_field(&mut self) {
        self.controller.ui_mut().next_field();
    }

    pub fn previous_field(&mut self) {
        self.controller.ui_mut().previous_field();
    }

    pub fn change_kind(&mut self) {
        let ui = self.controller.ui_mut();
        if ui.focused_field != FormField::Kind {
            return;
        }
        ui.form.kind = ui.form.kind.toggle();
        let kind = ui.form.kind;
        self.controller.on_type_changed(kind);
    }

    pub fn submit_form(&mut self) {
        let form = self.ui().form.clone();
        let created = self.controller.on_form_submitted(&form).is_some();
        if created {
            self.focus = Focus::Map;
            self.list_state.select(Some(0));
        }
    }

    pub fn cancel_form(&mut self) {
        self.controller.cancel_form();
        self.focus = Focus::Map;
    }
}
