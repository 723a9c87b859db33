use std::fmt;
use std::str::FromStr;

use blocksmith_world::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToolMode {
    #[default]
    Build,
    Delete,
    Paint,
}

impl ToolMode {
    pub const ALL: [ToolMode; 3] = [ToolMode::Build, ToolMode::Delete, ToolMode::Paint];

    pub const fn label(self) -> &'static str {
        match self {
            ToolMode::Build => "build",
            ToolMode::Delete => "delete",
            ToolMode::Paint => "paint",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ToolMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" | "b" => Ok(ToolMode::Build),
            "delete" | "d" | "erase" => Ok(ToolMode::Delete),
            "paint" | "p" => Ok(ToolMode::Paint),
            other => Err(format!("unknown tool mode `{other}`")),
        }
    }
}

/// User-selected interaction state, handed to the dispatcher on every pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolState {
    pub mode: ToolMode,
    pub color: Color,
}

impl ToolState {
    pub fn new(color: Color) -> Self {
        Self {
            mode: ToolMode::Build,
            color,
        }
    }
}
