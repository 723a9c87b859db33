use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use blocksmith_geom::LatticePos;
use blocksmith_world::{Color, Palette, Swatch};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "blocksmith.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("active_color `{0}` is neither a palette name nor a hex color")]
    ActiveColor(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StarterBlock {
    #[serde(flatten)]
    pub pos: LatticePos,
    pub color: Color,
}

/// `blocksmith.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed the world with `starter` blocks on startup.
    pub starter_scene: bool,
    pub starter: Vec<StarterBlock>,
    pub palette: Vec<Swatch>,
    /// Palette name or hex; defaults to the first swatch.
    pub active_color: Option<String>,
    pub blueprint_dir: PathBuf,
    pub challenges: Vec<String>,
    pub wait_timeout_secs: u64,
    /// Structure requests that may be in flight at once.
    pub structure_workers: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let palette = Palette::default();
        let swatch = |name: &str| {
            palette
                .by_name(name)
                .cloned()
                .unwrap_or_else(Color::neutral_gray)
        };
        Self {
            starter_scene: true,
            starter: vec![
                StarterBlock {
                    pos: LatticePos::new(0, 0, 0),
                    color: swatch("Red"),
                },
                StarterBlock {
                    pos: LatticePos::new(1, 0, 0),
                    color: swatch("Blue"),
                },
            ],
            palette: Vec::new(),
            active_color: None,
            blueprint_dir: PathBuf::from("blueprints"),
            challenges: vec![
                "Build a dragon perched on a skyscraper.".to_string(),
                "Build a lighthouse on a rocky island.".to_string(),
                "Build a rocket ready for launch.".to_string(),
            ],
            wait_timeout_secs: 30,
            structure_workers: 2,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(s: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        if explicit.is_none() && !path.exists() {
            log::debug!("no {} found; using defaults", DEFAULT_CONFIG_PATH);
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&s, path)?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn palette(&self) -> Palette {
        Palette::from_swatches(self.palette.clone())
    }

    pub fn active_color(&self, palette: &Palette) -> Result<Color, ConfigError> {
        match &self.active_color {
            None => Ok(palette.first().clone()),
            Some(s) => palette
                .resolve(s)
                .map_err(|_| ConfigError::ActiveColor(s.clone())),
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs.max(1))
    }
}
