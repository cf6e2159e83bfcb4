//! Configuration of the game and of the engine itself.

use std::path::{Path, PathBuf};

use log::LevelFilter;
use semver::Version;

/// Name of the engine.
pub const ENGINE_NAME: &str = env!("CARGO_CRATE_NAME", "library must be compiled by Cargo");

const ENGINE_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "library must be compiled by Cargo");

lazy_static::lazy_static! {
    /// Version of the engine.
    pub static ref ENGINE_VERSION: Version =
        Version::parse(ENGINE_VERSION_STR).unwrap_or_else(|_| Version::new(0, 0, 0));
}

/// Frame count of the default configuration.
pub const DEFAULT_FRAMES: u32 = 120;

/// Fixed frame duration of the default configuration: 60 frames per second.
pub const DEFAULT_DELTA_TIME: f32 = 1.0 / 60.0;

/// Size of the view of the default configuration, in pixels.
pub const DEFAULT_VIEWPORT: (f32, f32) = (800.0, 600.0);

/// Size of the map of the default configuration, in pixels.
pub const DEFAULT_MAP_SIZE: (f32, f32) = (1600.0, 1200.0);

/// Configuration of the game which runs on the engine.
#[derive(Debug, Clone)]
pub struct Config {
    name: String,
    version: Version,
    frames: u32,
    delta_time: f32,
    log_level: LevelFilter,
    log_directory: Option<PathBuf>,
    viewport: (f32, f32),
    map_size: (f32, f32),
    debug: bool,
}

impl Config {
    pub fn new(name: String, version: Version) -> Self {
        Self {
            name,
            version,
            frames: DEFAULT_FRAMES,
            delta_time: DEFAULT_DELTA_TIME,
            log_level: LevelFilter::Debug,
            log_directory: None,
            viewport: DEFAULT_VIEWPORT,
            map_size: DEFAULT_MAP_SIZE,
            debug: false,
        }
    }

    /// Sets how many frames the game will run before exit.
    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    /// Sets fixed duration of one frame in seconds.
    /// Non-positive or non-finite values are ignored.
    pub fn with_delta_time(mut self, delta_time: f32) -> Self {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.delta_time = delta_time;
        }
        self
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    /// Enables logging into a timestamped file in `directory` in addition to the console.
    pub fn with_log_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn with_map_size(mut self, width: f32, height: f32) -> Self {
        self.map_size = (width, height);
        self
    }

    /// Enables outlines of colliders in every rendered frame.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn log_directory(&self) -> Option<&Path> {
        self.log_directory.as_deref()
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn map_size(&self) -> (f32, f32) {
        self.map_size
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("Ember demo".to_string(), Version::new(0, 1, 0))
    }
}
