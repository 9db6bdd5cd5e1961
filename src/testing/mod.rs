pub mod fixtures;
pub mod scripted_driver;
pub mod synthetic;

pub use scripted_driver::{Answer, ScriptedDriver};
