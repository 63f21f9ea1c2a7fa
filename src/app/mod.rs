pub mod demo;
pub mod session;

pub use demo::{arena_obstacles, autopilot, spawn_demo_vehicle};
pub use session::{log_collisions, stop_after_duration, SessionClock};
