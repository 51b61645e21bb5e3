
#[cfg(test)]
mod tests {
    use crate::service::controller::{Controller, ControllerOptions, FormState, MapState, RestoreOutcome};
    use crate::service::controller::{MALFORMED_STORAGE_MESSAGE, POSITION_UNAVAILABLE_MESSAGE, SAVE_FAILED_MESSAGE};
    use crate::service::dto::ListEntry;
    use crate::surface::{FixedGeolocation, GeolocationError, MapSurface, PanOptions, Popup, UiSurface};
    use crate::repository::{KeyValueStore, MemoryStore, WorkoutRepository, WORKOUTS_KEY};
    use crate::input::{ValidationPolicy, WorkoutForm};
    use crate::model::workout::{Coords, Workout, WorkoutKind, WorkoutType, describe};
    use chrono::{Local, Utc};

    #[derive(Default)]
    struct MockMap {
        loaded: Option<(Coords, u8)>,
        markers: Vec<(Coords, Popup)>,
        pans: Vec<(Coords, PanOptions)>,
    }

    impl MapSurface for MockMap {
        fn load(&mut self, center: Coords, zoom: u8) { self.loaded = Some((center, zoom)); }
        fn place_marker(&mut self, coords: Coords, popup: &Popup) { self.markers.push((coords, popup.clone())); }
        fn pan_to(&mut self, coords: Coords, options: PanOptions) { self.pans.push((coords, options)); }
    }

    #[derive(Default)]
    struct MockUi {
        alerts: Vec<String>,
        form_visible: bool,
        distance_focused: bool,
        extra_field: Option<WorkoutType>,
        entries: Vec<ListEntry>,
        reloads: usize,
    }

    impl UiSurface for MockUi {
        fn alert(&mut self, message: &str) { self.alerts.push(message.to_string()); }
        fn show_form(&mut self) { self.form_visible = true; }
        fn hide_form(&mut self) { self.form_visible = false; self.distance_focused = false; }
        fn focus_distance(&mut self) { self.distance_focused = true; }
        fn show_extra_field(&mut self, kind: WorkoutType) { self.extra_field = Some(kind); }
        fn insert_entry(&mut self, entry: ListEntry) { self.entries.insert(0, entry); }
        fn reload(&mut self) { self.reloads += 1; }
    }

    type TestController = Controller<MemoryStore, MockMap, MockUi>;

    fn home() -> Coords {
        Coords::new(51.5, -0.09)
    }

    fn controller_with(store: MemoryStore, options: ControllerOptions) -> TestController {
        Controller::new(store, MockMap::default(), MockUi::default(), options)
    }

    fn ready_controller() -> TestController {
        let mut c = controller_with(MemoryStore::new(), ControllerOptions::default());
        c.request_location(&mut FixedGeolocation::new(Some(home())));
        c
    }

    fn form(kind: WorkoutType, distance: &str, duration: &str, extra: &str) -> WorkoutForm {
        let mut form = WorkoutForm {
            kind,
            distance: distance.to_string(),
            duration: duration.to_string(),
            ..Default::default()
        };
        match kind {
            WorkoutType::Running => form.cadence = extra.to_string(),
            WorkoutType::Cycling => form.elevation = extra.to_string(),
        }
        form
    }

    fn stored(c: &TestController) -> Vec<Workout> {
        let raw = c.store().get(WORKOUTS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_location_loads_map_at_zoom() {
        let c = ready_controller();
        assert_eq!(c.map_state(), MapState::Ready);
        assert_eq!(c.map().loaded, Some((home(), 13)));
        assert!(c.ui().alerts.is_empty());
    }

    #[test]
    fn test_location_failure_alerts_once_and_stays_unavailable() {
        let mut c = controller_with(MemoryStore::new(), ControllerOptions::default());
        c.request_location(&mut FixedGeolocation::new(None));

        assert_eq!(c.map_state(), MapState::Unavailable);
        assert_eq!(c.ui().alerts, vec![POSITION_UNAVAILABLE_MESSAGE.to_string()]);
        assert!(c.map().loaded.is_none());

        // No retry: a late success is ignored.
        c.on_position(Ok(home()));
        assert_eq!(c.map_state(), MapState::Unavailable);
        assert!(c.map().loaded.is_none());
    }

    #[test]
    fn test_map_click_opens_form() {
        let mut c = ready_controller();
        let spot = Coords::new(51.51, -0.1);
        c.on_map_clicked(spot);

        assert_eq!(c.form_state(), FormState::AwaitingInput { pending: spot });
        assert!(c.ui().form_visible);
        assert!(c.ui().distance_focused);
    }

    #[test]
    fn test_map_click_ignored_without_map() {
        let mut c = controller_with(MemoryStore::new(), ControllerOptions::default());
        c.on_map_clicked(home());
        assert_eq!(c.form_state(), FormState::Idle);
        assert!(!c.ui().form_visible);
    }

    #[test]
    fn test_type_change_only_toggles_field() {
        let mut c = ready_controller();
        c.on_type_changed(WorkoutType::Cycling);
        assert_eq!(c.ui().extra_field, Some(WorkoutType::Cycling));
        assert_eq!(c.form_state(), FormState::Idle);
        assert!(c.workouts().is_empty());
    }

    #[test]
    fn test_submit_running() {
        let mut c = ready_controller();
        let spot = Coords::new(51.51, -0.1);
        c.on_map_clicked(spot);

        let created = c
            .on_form_submitted(&form(WorkoutType::Running, "5", "30", "150"))
            .cloned()
            .unwrap();

        match created.kind {
            WorkoutKind::Running { pace_min_per_km, cadence_spm } => {
                assert_eq!(pace_min_per_km, 6.0);
                assert_eq!(cadence_spm, 150.0);
            }
            _ => panic!("expected running"),
        }
        let today = describe(WorkoutType::Running, Local::now().date_naive());
        assert_eq!(created.description, today);
        assert_eq!(created.coords, spot);

        assert_eq!(c.workouts().len(), 1);
        assert_eq!(c.map().markers.len(), 1);
        assert_eq!(c.map().markers[0].0, spot);
        assert!(c.map().markers[0].1.content.contains(&created.description));
        assert_eq!(c.ui().entries.len(), 1);
        assert_eq!(c.ui().entries[0].id, created.id);
        assert!(!c.ui().form_visible);
        assert_eq!(c.form_state(), FormState::Idle);
        assert_eq!(stored(&c), vec![created]);
    }

    #[test]
    fn test_submit_cycling() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        let created = c
            .on_form_submitted(&form(WorkoutType::Cycling, "20", "60", "400"))
            .cloned()
            .unwrap();

        match created.kind {
            WorkoutKind::Cycling { speed_km_per_h, elevation_gain_m } => {
                assert_eq!(speed_km_per_h, 20.0);
                assert_eq!(elevation_gain_m, 400.0);
            }
            _ => panic!("expected cycling"),
        }
    }

    #[test]
    fn test_negative_distance_rejected_and_form_kept() {
        for kind in [WorkoutType::Running, WorkoutType::Cycling] {
            let mut c = ready_controller();
            c.on_map_clicked(home());

            let created = c.on_form_submitted(&form(kind, "-1", "30", "150"));
            assert!(created.is_none());

            assert!(c.workouts().is_empty());
            assert_eq!(c.ui().alerts, vec!["Inputs have to be positive numbers!".to_string()]);
            assert_eq!(c.form_state(), FormState::AwaitingInput { pending: home() });
            assert!(c.ui().form_visible);
            assert!(c.store().get(WORKOUTS_KEY).unwrap().is_none());
        }
    }

    #[test]
    fn test_resubmit_after_correction() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        assert!(c.on_form_submitted(&form(WorkoutType::Running, "abc", "30", "150")).is_none());
        assert!(c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150")).is_some());
        assert_eq!(c.workouts().len(), 1);
    }

    #[test]
    fn test_cycling_negative_elevation_accepted() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        let created = c.on_form_submitted(&form(WorkoutType::Cycling, "10", "30", "-50"));
        assert!(created.is_some());
        assert!(c.ui().alerts.is_empty());
        assert_eq!(c.workouts().len(), 1);
    }

    #[test]
    fn test_cycling_negative_elevation_rejected_with_strict_policy() {
        let options = ControllerOptions {
            validation: ValidationPolicy { require_positive_elevation: true },
            ..Default::default()
        };
        let mut c = controller_with(MemoryStore::new(), options);
        c.on_position(Ok(home()));
        c.on_map_clicked(home());

        assert!(c.on_form_submitted(&form(WorkoutType::Cycling, "10", "30", "-50")).is_none());
        assert!(c.workouts().is_empty());
        assert_eq!(c.ui().alerts.len(), 1);
    }

    #[test]
    fn test_submit_without_location_is_ignored() {
        let mut c = ready_controller();
        assert!(c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150")).is_none());
        assert!(c.workouts().is_empty());
        assert!(c.ui().alerts.is_empty());
    }

    #[test]
    fn test_cancel_form() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        c.cancel_form();
        assert_eq!(c.form_state(), FormState::Idle);
        assert!(!c.ui().form_visible);
    }

    #[test]
    fn test_list_entries_newest_first() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150"));
        c.on_map_clicked(home());
        c.on_form_submitted(&form(WorkoutType::Cycling, "20", "60", "400"));

        assert_eq!(c.workouts()[0].workout_type(), WorkoutType::Running);
        assert_eq!(c.ui().entries[0].kind, WorkoutType::Cycling);
        assert_eq!(c.ui().entries[1].kind, WorkoutType::Running);
    }

    #[test]
    fn test_list_click_pans_to_workout() {
        let mut c = ready_controller();
        let spot = Coords::new(48.85, 2.35);
        c.on_map_clicked(spot);
        let id = c
            .on_form_submitted(&form(WorkoutType::Running, "5", "30", "150"))
            .unwrap()
            .id
            .to_string();

        c.on_list_entry_clicked(Some(&id));

        assert_eq!(c.map().pans.len(), 1);
        let (coords, options) = c.map().pans[0];
        assert_eq!(coords, spot);
        assert!(options.animate);
        assert_eq!(options.zoom, 13);
        assert_eq!(c.workouts()[0].clicks, 1);
    }

    #[test]
    fn test_list_click_outside_entry_is_noop() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150"));

        c.on_list_entry_clicked(None);
        c.on_list_entry_clicked(Some("not-an-id"));
        c.on_list_entry_clicked(Some("6f1c2b9e-8a7d-4c3e-9f00-000000000000"));

        assert!(c.map().pans.is_empty());
        assert_eq!(c.workouts()[0].clicks, 0);
    }

    #[test]
    fn test_restore_before_map_ready_renders_markers_later() {
        let workouts = vec![
            Workout::running(Coords::new(1.0, 2.0), 5.0, 30.0, 150.0),
            Workout::cycling(Coords::new(3.0, 4.0), 20.0, 60.0, 400.0),
        ];
        let mut repo = WorkoutRepository::new(MemoryStore::new());
        repo.save(&workouts).unwrap();
        let store = repo.store().clone();

        let mut c = controller_with(store, ControllerOptions::default());
        assert_eq!(c.restore().unwrap(), RestoreOutcome::Restored(2));
        assert_eq!(c.workouts(), &workouts[..]);
        assert_eq!(c.ui().entries.len(), 2);
        assert!(c.map().markers.is_empty());

        // Clicking a restored entry before the map exists does nothing.
        let id = workouts[0].id.to_string();
        c.on_list_entry_clicked(Some(&id));
        assert!(c.map().pans.is_empty());

        c.on_position(Ok(home()));
        assert_eq!(c.map().markers.len(), 2);
        assert_eq!(c.map().markers[0].0, Coords::new(1.0, 2.0));
        assert_eq!(c.map().markers[1].0, Coords::new(3.0, 4.0));

        c.on_list_entry_clicked(Some(&id));
        assert_eq!(c.map().pans.len(), 1);
    }

    #[test]
    fn test_restore_after_map_ready_renders_markers_immediately() {
        let workouts = vec![Workout::running(Coords::new(1.0, 2.0), 5.0, 30.0, 150.0)];
        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, &serde_json::to_string(&workouts).unwrap()).unwrap();

        let mut c = controller_with(store, ControllerOptions::default());
        c.on_position(Ok(home()));
        c.restore().unwrap();
        assert_eq!(c.map().markers.len(), 1);
    }

    #[test]
    fn test_restore_empty_and_malformed() {
        let mut c = controller_with(MemoryStore::new(), ControllerOptions::default());
        assert_eq!(c.restore().unwrap(), RestoreOutcome::NoData);
        assert!(c.ui().alerts.is_empty());

        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, "[{\"broken\": true}]").unwrap();
        let mut c = controller_with(store, ControllerOptions::default());
        assert!(matches!(c.restore().unwrap(), RestoreOutcome::Malformed(_)));
        assert!(c.workouts().is_empty());
        assert_eq!(c.ui().alerts, vec![MALFORMED_STORAGE_MESSAGE.to_string()]);
    }

    #[test]
    fn test_persist_restore_round_trip() {
        let mut c = ready_controller();
        c.on_map_clicked(Coords::new(10.0, 20.0));
        c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150"));
        c.on_map_clicked(Coords::new(-10.0, -20.0));
        c.on_form_submitted(&form(WorkoutType::Cycling, "12.5", "45", "-50"));
        let before = c.workouts().to_vec();

        let mut reloaded = controller_with(c.store().clone(), ControllerOptions::default());
        reloaded.restore().unwrap();
        assert_eq!(reloaded.workouts(), &before[..]);
    }

    #[test]
    fn test_reset_all_clears_storage_and_reloads() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150"));

        c.reset_all().unwrap();
        assert_eq!(c.ui().reloads, 1);

        let mut reloaded = controller_with(c.store().clone(), ControllerOptions::default());
        assert_eq!(reloaded.restore().unwrap(), RestoreOutcome::NoData);
    }

    #[test]
    fn test_late_position_error_after_ready_is_ignored() {
        let mut c = ready_controller();
        c.on_position(Err(GeolocationError::Denied));
        assert_eq!(c.map_state(), MapState::Ready);
        assert!(c.ui().alerts.is_empty());
    }

    #[test]
    fn test_created_at_is_recent() {
        let mut c = ready_controller();
        c.on_map_clicked(home());
        let before = Utc::now();
        let created = c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150")).unwrap();
        assert!(created.created_at >= before);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> { Ok(None) }
        fn set(&mut self, key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("cannot write {}", key)
        }
        fn remove(&mut self, _key: &str) -> anyhow::Result<()> { Ok(()) }
    }

    #[test]
    fn test_failed_save_alerts_and_keeps_workout() {
        let mut c = Controller::new(ReadOnlyStore, MockMap::default(), MockUi::default(), ControllerOptions::default());
        c.request_location(&mut FixedGeolocation::new(Some(home())));
        c.on_map_clicked(home());

        let created = c.on_form_submitted(&form(WorkoutType::Cycling, "20", "60", "400")).cloned();

        assert!(created.is_some());
        assert_eq!(c.workouts().len(), 1);
        assert_eq!(c.ui().entries.len(), 1);
        assert_eq!(c.map().markers.len(), 1);
        assert_eq!(c.ui().alerts, vec![SAVE_FAILED_MESSAGE.to_string()]);
        assert_eq!(c.form_state(), FormState::Idle);

        // The session goes on: the next workout is still accepted.
        c.on_map_clicked(home());
        assert!(c.on_form_submitted(&form(WorkoutType::Running, "5", "30", "150")).is_some());
        assert_eq!(c.workouts().len(), 2);
    }
}
