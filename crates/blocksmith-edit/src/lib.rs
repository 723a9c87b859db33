//! Tool modes, pick resolution, and the edit dispatch table.
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod placement;
pub mod tool;

pub use dispatch::{Action, EditOutcome, apply_pick, plan};
pub use placement::{Pick, Rejection, resolve_face, resolve_ground};
pub use tool::{ToolMode, ToolState};
