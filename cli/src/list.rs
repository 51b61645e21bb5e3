use chrono::{DateTime, Local};
use mapty_core::{ListEntry, Workout};
use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;

// Helper struct for Table Row
#[derive(Tabled)]
struct WorkoutRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Workout")]
    title: String,
    #[tabled(rename = "Where")]
    coords: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Pace/Speed")]
    metric: String,
    #[tabled(rename = "Cadence/Elev.")]
    extra: String,
}

pub fn show_workouts(workouts: &[Workout]) {
    if workouts.is_empty() {
        println!("No workouts logged yet.");
        return;
    }

    // Newest first, like the list in the terminal UI.
    let rows: Vec<WorkoutRow> = workouts.iter().rev().map(row_for).collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    println!("{}", table);
}

fn row_for(workout: &Workout) -> WorkoutRow {
    let entry = ListEntry::from_entity(workout);
    let details = entry.details();
    let created: DateTime<Local> = DateTime::from(workout.created_at);

    WorkoutRow {
        date: created.format("%Y-%m-%d %H:%M").to_string(),
        id: workout.id.to_string()[..8].to_string(),
        title: format!("{} {}", entry.icon, entry.title),
        coords: workout.coords.to_string(),
        distance: format!("{} {}", details[0].1, details[0].2),
        duration: format!("{} {}", details[1].1, details[1].2),
        metric: format!("{} {}", details[2].1, details[2].2),
        extra: format!("{} {}", details[3].1, details[3].2),
    }
}
