use anyhow::{anyhow, Error};
use tracing::debug;
use mapty_core::{Coords, ListEntry, MapSurface, PanOptions, Popup, UiSurface, WorkoutType};

/// Map surface for commands that run without a screen.
#[derive(Default)]
pub struct HeadlessMap;

impl MapSurface for HeadlessMap {
    fn load(&mut self, center: Coords, zoom: u8) {
        debug!(%center, zoom, "headless map loaded");
    }

    fn place_marker(&mut self, coords: Coords, popup: &Popup) {
        debug!(%coords, popup = %popup.content, "marker");
    }

    fn pan_to(&mut self, coords: Coords, _options: PanOptions) {
        debug!(%coords, "pan");
    }
}

/// Collects alerts and entries so the caller decides how to report them.
#[derive(Default)]
pub struct ConsoleUi {
    pub entries: Vec<ListEntry>,
    pub alerts: Vec<String>,
}

impl ConsoleUi {
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

/// The error a command exits with when nothing was created.
pub fn alerts_error(alerts: &[String]) -> Error {
    match alerts {
        [] => anyhow!("No workout was added"),
        _ => anyhow!("{}", alerts.join("; ")),
    }
}

impl UiSurface for ConsoleUi {
    fn alert(&mut self, message: &str) {
        debug!(message, "alert");
        self.alerts.push(message.to_string());
    }

    fn show_form(&mut self) {}

    fn hide_form(&mut self) {}

    fn focus_distance(&mut self) {}

    fn show_extra_field(&mut self, _kind: WorkoutType) {}

    fn insert_entry(&mut self, entry: ListEntry) {
        self.entries.insert(0, entry);
    }

    // Every command is a fresh process already.
    fn reload(&mut self) {}
}

pub fn print_entry(entry: &ListEntry) {
    println!("{} {} (ID: {})", entry.icon, entry.title, entry.id);
    for (icon, value, unit) in entry.details() {
        println!("  {} {} {}", icon, value, unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerts_are_collected_not_printed() {
        let mut ui = ConsoleUi::default();
        ui.alert("Inputs have to be positive numbers!");
        ui.alert("Your workouts could not be saved");

        let alerts = ui.take_alerts();
        assert_eq!(alerts.len(), 2);
        assert!(ui.alerts.is_empty());
        assert_eq!(
            alerts_error(&alerts).to_string(),
            "Inputs have to be positive numbers!; Your workouts could not be saved"
        );
    }

    #[test]
    fn test_no_alerts_still_explains_failure() {
        assert_eq!(alerts_error(&[]).to_string(), "No workout was added");
    }
}
