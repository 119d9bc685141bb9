//! Demo configuration
//!
//! Every demo starts from its own [`DemoConfig`] defaults. They are layered with
//! (lowest to highest priority):
//! 1. the demo's built-in defaults
//! 2. `flow-labs.toml` in the working directory (optional)
//! 3. environment variables (`FLOW_LABS_SECTION__KEY`)

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "flow-labs.toml";
pub const ENV_PREFIX: &str = "FLOW_LABS_";

/// Main demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub window: WindowConfig,
    /// Directory textures, meshes and point lists are resolved against.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Background colour [r, g, b, a]
    #[serde(default = "default_clear_colour")]
    pub clear_colour: [f64; 4],
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            assets_dir: default_assets_dir(),
            clear_colour: default_clear_colour(),
        }
    }
}

impl DemoConfig {
    /// Defaults for a demo with the given window title.
    pub fn titled(title: &str) -> Self {
        let mut config = Self::default();
        config.window.title = title.to_string();
        config
    }

    pub fn with_clear_colour(mut self, clear_colour: [f64; 4]) -> Self {
        self.clear_colour = clear_colour;
        self
    }

    pub fn with_max_fps(mut self, max_fps: f32) -> Self {
        self.window.max_fps = Some(max_fps);
        self
    }

    /// Layer `flow-labs.toml` from the working directory and the environment over `self`.
    pub fn load(self) -> Result<Self, ConfigError> {
        self.load_from(CONFIG_FILE)
    }

    /// Layer a specific config file (if it exists) and the environment over `self`.
    pub fn load_from<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut figment = Figment::from(Serialized::defaults(self));

        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        // FLOW_LABS_WINDOW__WIDTH=800 -> window.width = 800
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: DemoConfig = figment.extract()?;
        config.assets_dir = resolve_assets_dir(config.assets_dir);
        Ok(config)
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Upper bound for frames per second. `None` renders as fast as presenting allows.
    #[serde(default)]
    pub max_fps: Option<f32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "flow-labs".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            max_fps: None,
        }
    }
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_clear_colour() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

// Relative asset roots that don't exist fall back to the copy made by build.rs.
fn resolve_assets_dir(dir: PathBuf) -> PathBuf {
    let bundled = env!("FLOW_LABS_BUNDLED_ASSETS");
    if dir.is_relative() && !dir.exists() && !bundled.is_empty() {
        log::debug!("{:?} not found, using bundled assets at {}", dir, bundled);
        return PathBuf::from(bundled);
    }
    dir
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
