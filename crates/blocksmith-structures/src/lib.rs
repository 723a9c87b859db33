//! Bulk structure import: validate a generator's block list and install it.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use blocksmith_geom::{LatticePos, snap_axis};
use blocksmith_world::{Color, World};
use serde_json::{Map, Value};
use thiserror::Error;

pub const UNTITLED: &str = "Untitled structure";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),
    #[error("generator returned an empty response")]
    Empty,
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("response has no `blocks` field")]
    MissingBlocks,
    #[error("`blocks` is not a list")]
    BlocksNotAList,
    #[error("block {index}: {reason}")]
    BadDescriptor { index: usize, reason: String },
}

/// What validation had to fix up on the way in.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub descriptors: usize,
    /// Fractional coordinates snapped to the lattice.
    pub rounded: usize,
    /// Below-ground descriptors raised to y = 0.
    pub lifted: usize,
    /// Missing or unreadable colors replaced with gray.
    pub recolored: usize,
    /// Descriptors overwritten by a later one on the same cell.
    pub collapsed: usize,
}

/// A validated structure ready to replace the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub name: String,
    /// One entry per cell, in first-seen order, carrying the last color seen.
    pub cells: Vec<(LatticePos, Color)>,
    pub report: ImportReport,
}

impl Structure {
    /// Replace the whole world with this structure. Returns the block count.
    pub fn install(self, world: &mut World) -> usize {
        world.replace_all(self.cells)
    }
}

/// Validate a generator response. `None` means the generator sent nothing.
pub fn reconcile(response: Option<&str>) -> Result<Structure, ImportError> {
    let text = response.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ImportError::Empty);
    }
    let root: Value = serde_json::from_str(text)?;
    let Value::Object(obj) = root else {
        return Err(ImportError::NotAnObject);
    };
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();
    let list = match obj.get("blocks") {
        None | Some(Value::Null) => return Err(ImportError::MissingBlocks),
        Some(Value::Array(list)) => list,
        Some(_) => return Err(ImportError::BlocksNotAList),
    };

    let mut report = ImportReport {
        descriptors: list.len(),
        ..ImportReport::default()
    };
    let mut cells: Vec<(LatticePos, Color)> = Vec::with_capacity(list.len());
    let mut slot: HashMap<LatticePos, usize> = HashMap::with_capacity(list.len());
    for (index, item) in list.iter().enumerate() {
        let Value::Object(d) = item else {
            return Err(ImportError::BadDescriptor {
                index,
                reason: "not an object".into(),
            });
        };
        let (pos, color) = read_descriptor(d, &mut report)
            .map_err(|reason| ImportError::BadDescriptor { index, reason })?;
        match slot.get(&pos) {
            Some(&i) => {
                cells[i].1 = color;
                report.collapsed += 1;
            }
            None => {
                slot.insert(pos, cells.len());
                cells.push((pos, color));
            }
        }
    }
    if report.rounded + report.lifted + report.recolored + report.collapsed > 0 {
        log::debug!("import `{}` needed fixups: {:?}", name, report);
    }
    Ok(Structure {
        name,
        cells,
        report,
    })
}

fn read_descriptor(
    d: &Map<String, Value>,
    report: &mut ImportReport,
) -> Result<(LatticePos, Color), String> {
    let mut fractional = false;
    let mut axis = |key: &str| -> Result<i32, String> {
        let v = d
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| format!("`{key}` is missing or not a number"))?;
        let snapped = snap_axis(v).ok_or_else(|| format!("`{key}` = {v} is out of range"))?;
        if snapped as f64 != v {
            fractional = true;
        }
        Ok(snapped)
    };
    let x = axis("x")?;
    let mut y = axis("y")?;
    let z = axis("z")?;
    if fractional {
        report.rounded += 1;
    }
    if y < 0 {
        y = 0;
        report.lifted += 1;
    }
    let color = match d.get("color").and_then(Value::as_str).map(Color::parse) {
        Some(Ok(c)) => c,
        _ => {
            report.recolored += 1;
            Color::neutral_gray()
        }
    };
    Ok((LatticePos::new(x, y, z), color))
}
