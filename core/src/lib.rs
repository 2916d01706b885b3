#![no_std]

extern crate alloc;

use alloc::string::ToString;
use serde::{Deserialize, Serialize};

pub use agent::*;
pub use error::*;
pub use inference::*;
pub use types::*;

mod agent;
mod error;
mod inference;
mod types;

/// How many extraction passes an observation triggers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionPolicy {
    /// Extract once per observation. Facts unlocked by applying that pass surface on the
    /// next observation.
    SinglePass,
    /// Repeat extract-and-mark until nothing new is proven.
    FixedPoint,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self::SinglePass
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// `(height, width)`
    pub size: Coord2,
    /// Seed for guess selection.
    pub seed: u64,
    pub extraction: ExtractionPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new_unchecked((8, 8), 0)
    }
}

impl AgentConfig {
    pub const fn new_unchecked(size: Coord2, seed: u64) -> Self {
        Self {
            size,
            seed,
            extraction: ExtractionPolicy::SinglePass,
        }
    }

    pub fn new((height, width): Coord2, seed: u64) -> Self {
        let height = height.clamp(1, Coord::MAX);
        let width = width.clamp(1, Coord::MAX);
        Self::new_unchecked((height, width), seed)
    }

    pub const fn with_extraction(mut self, extraction: ExtractionPolicy) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| EngineError::InvalidConfig(err.to_string()))
    }

    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}
