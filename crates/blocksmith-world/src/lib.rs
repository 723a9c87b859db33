//! Voxel world store: placed blocks, their identities, and their colors.
#![forbid(unsafe_code)]

pub mod color;
pub mod store;

pub use color::{Color, ColorParseError, NEUTRAL_GRAY, Palette, Swatch};
pub use store::{Block, BlockId, Insert, World, WorldStats};
