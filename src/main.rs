use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;
use towerspace::debug::FlightRecorder;
use towerspace::settings::loader as settings_loader;
use towerspace::vehicle::{FlightPlugin, step_vehicles};

mod app;
use app::{
    arena_obstacles,
    autopilot,
    log_collisions,
    spawn_demo_vehicle,
    stop_after_duration,
    SessionClock,
};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub(settings_loader::SETTINGS_DIR));

    let tick_rate = settings.simulation.tick_rate_hz;
    let mut app = App::new();

    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / tick_rate))))
        .add_plugins(LogPlugin::default())
        .add_plugins(FlightPlugin);

    app.insert_resource(Time::<Fixed>::from_hz(tick_rate));
    app.insert_resource(FlightRecorder::with_capacity(settings.simulation.recorder_capacity));
    app.insert_resource(arena_obstacles());
    app.insert_resource(SessionClock::new(&settings.simulation));
    app.insert_resource(settings.clone());
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, spawn_demo_vehicle);
    app.add_systems(FixedUpdate, autopilot.before(step_vehicles));
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, log_collisions);
    app.add_systems(Update, stop_after_duration);

    app.run();
}
