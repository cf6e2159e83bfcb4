//! Headless 2D game demo built on the Ember entity-component runtime.

pub use app::{Application, Summary};
pub use camera::Camera;
pub use config::Config;
pub use error::{GameError, Result};
pub use input::InputScript;

pub mod app;
pub mod camera;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod systems;

/// Loads the demo level and runs it for the configured number of frames.
pub fn run(config: Config, input: InputScript) -> Result<Summary> {
    let mut application = Application::new(config, input)?;
    application.load_scene()?;
    application.run()
}
