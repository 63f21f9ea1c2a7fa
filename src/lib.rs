pub mod flight;
pub mod vehicle;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod debug;
