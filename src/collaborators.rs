//! Local stand-ins for the generation services.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use blocksmith_runtime::{ChallengeSource, GeneratorError, StructureGenerator};

/// Serves `<dir>/<slug>.json` for a prompt, e.g. "Red Barn!" -> `red-barn.json`.
pub struct BlueprintDir {
    dir: PathBuf,
}

impl BlueprintDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, prompt: &str) -> Option<PathBuf> {
        let slug = slug(prompt);
        if slug.is_empty() {
            return None;
        }
        Some(self.dir.join(format!("{slug}.json")))
    }
}

pub fn slug(prompt: &str) -> String {
    let mut out = String::with_capacity(prompt.len());
    for ch in prompt.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

impl StructureGenerator for BlueprintDir {
    fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let path = self
            .path_for(prompt)
            .ok_or_else(|| GeneratorError::NotFound(prompt.to_string()))?;
        log::debug!("reading blueprint {}", path.display());
        match fs::read_to_string(&path) {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(GeneratorError::NotFound(prompt.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Cycles through a fixed list of challenges.
pub struct ChallengeDeck {
    lines: Vec<String>,
    next: usize,
}

impl ChallengeDeck {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, next: 0 }
    }
}

impl ChallengeSource for ChallengeDeck {
    fn challenge(&mut self) -> Result<String, GeneratorError> {
        if self.lines.is_empty() {
            return Ok(String::new());
        }
        let line = self.lines[self.next % self.lines.len()].clone();
        self.next = self.next.wrapping_add(1);
        Ok(line)
    }
}
