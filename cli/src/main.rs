mod headless;
mod list;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Parser};
use mapty_core::config::default_config_path;
use mapty_core::{
    load_config, parse_coords, AppConfig, Controller, ControllerOptions, FileStore, RestoreOutcome,
    Snapshot, WorkoutForm, WorkoutRepository, WorkoutType,
};

use crate::headless::{alerts_error, print_entry, ConsoleUi, HeadlessMap};

const LOG_FILE_NAME: &str = "mapty.log";

#[derive(Parser)]
#[command(name = "mapty")]
#[command(about = "Log running and cycling workouts on a map", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.mapty/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease log verbosity (-q, -qq).
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log a workout (usage: add running --at 51.5,-0.09 --distance 5 --duration 30 --cadence 150)
    Add {
        /// running or cycling
        kind: WorkoutType,
        /// Where it happened, as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        at: String,
        /// Distance in km
        #[arg(long)]
        distance: String,
        /// Duration in minutes
        #[arg(long)]
        duration: String,
        /// Cadence in steps/min (running)
        #[arg(long, default_value = "")]
        cadence: String,
        /// Elevation gain in meters (cycling)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },
    /// List all workouts
    List,
    /// Delete every logged workout
    Reset,
    /// Open the Terminal User Interface
    Tui,
}

fn read_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let path = match path {
        Some(p) => p,
        None => default_config_path()?,
    };
    Ok(load_config(&path)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = read_config(cli.config)?;
    let data_dir = config.data_dir()?;

    match cli.command {
        Some(Commands::Add { kind, at, distance, duration, cadence, elevation }) => {
            logging::init_logging(cli.verbose, cli.quiet);
            let coords = parse_coords(&at)
                .ok_or_else(|| anyhow!("Invalid location '{}', expected LAT,LNG", at))?;

            let store = FileStore::new(Some(data_dir))?;
            let mut controller = Controller::new(
                store,
                HeadlessMap,
                ConsoleUi::default(),
                ControllerOptions::from(&config),
            );

            if let RestoreOutcome::Malformed(reason) = controller.restore()? {
                bail!("Stored workouts are unreadable ({}); run `mapty reset` first", reason);
            }

            controller.on_position(Ok(coords));
            controller.on_map_clicked(coords);
            controller.on_type_changed(kind);

            let form = WorkoutForm { kind, distance, duration, cadence, elevation };
            let created = controller.on_form_submitted(&form).map(|w| w.id);
            let alerts = controller.ui_mut().take_alerts();
            let Some(id) = created else {
                return Err(alerts_error(&alerts));
            };
            for alert in &alerts {
                eprintln!("Warning: {}", alert);
            }
            if let Some(entry) = controller.ui().entries.iter().find(|e| e.id == id) {
                println!("Workout added:");
                print_entry(entry);
            }
        },
        Some(Commands::List) => {
            logging::init_logging(cli.verbose, cli.quiet);
            let repo = WorkoutRepository::new(FileStore::new(Some(data_dir))?);
            match repo.load()? {
                Snapshot::Empty => list::show_workouts(&[]),
                Snapshot::Valid(workouts) => list::show_workouts(&workouts),
                Snapshot::Malformed(reason) => {
                    bail!("Stored workouts are unreadable: {}", reason);
                }
            }
        },
        Some(Commands::Reset) => {
            logging::init_logging(cli.verbose, cli.quiet);
            let store = FileStore::new(Some(data_dir))?;
            let mut controller = Controller::new(
                store,
                HeadlessMap,
                ConsoleUi::default(),
                ControllerOptions::from(&config),
            );
            controller.reset_all()?;
            println!("All workouts deleted.");
        },
        Some(Commands::Tui) | None => {
            logging::init_file_logging(cli.verbose, cli.quiet, &data_dir.join(LOG_FILE_NAME))?;
            tui::run(&config)?;
        }
    }
    Ok(())
}
