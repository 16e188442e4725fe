// file: src/pipeline/stage.rs
// description: the fixed reconstruction stage sequence and stage range selection
// reference: OpenMVG global structure-from-motion chain

use crate::error::{PipelineError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ListImages,
    ComputeFeatures,
    ComputePairs,
    ComputeMatches,
    FilterMatches,
    Reconstruct,
    Colorize,
    Export,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::ListImages,
        Stage::ComputeFeatures,
        Stage::ComputePairs,
        Stage::ComputeMatches,
        Stage::FilterMatches,
        Stage::Reconstruct,
        Stage::Colorize,
        Stage::Export,
    ];

    /// One-based position in the pipeline.
    pub fn index(self) -> usize {
        self as usize + 1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::ListImages => "list_images",
            Stage::ComputeFeatures => "compute_features",
            Stage::ComputePairs => "compute_pairs",
            Stage::ComputeMatches => "compute_matches",
            Stage::FilterMatches => "filter_matches",
            Stage::Reconstruct => "reconstruct",
            Stage::Colorize => "colorize",
            Stage::Export => "export",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::ListImages => "Intrinsics analysis",
            Stage::ComputeFeatures => "Compute features",
            Stage::ComputePairs => "Compute matching pairs",
            Stage::ComputeMatches => "Compute matches",
            Stage::FilterMatches => "Filter matches",
            Stage::Reconstruct => "Global reconstruction",
            Stage::Colorize => "Colorize structure",
            Stage::Export => "Export to openMVS",
        }
    }

    pub fn executable(self) -> &'static str {
        match self {
            Stage::ListImages => "openMVG_main_SfMInit_ImageListing",
            Stage::ComputeFeatures => "openMVG_main_ComputeFeatures",
            Stage::ComputePairs => "openMVG_main_PairGenerator",
            Stage::ComputeMatches => "openMVG_main_ComputeMatches",
            Stage::FilterMatches => "openMVG_main_GeometricFilter",
            Stage::Reconstruct => "openMVG_main_SfM",
            Stage::Colorize => "openMVG_main_ComputeSfM_DataColor",
            Stage::Export => "openMVG_main_openMVG2openMVS",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    /// Accepts a stage number (`1`-`8`) or a name with `_` or `-` separators.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(index) = trimmed.parse::<usize>() {
            return Stage::from_index(index)
                .ok_or_else(|| format!("stage number must be between 1 and 8, got {}", index));
        }

        let normalized = trimmed.to_ascii_lowercase().replace('-', "_");
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Stage::ALL.iter().map(|s| s.name()).collect();
                format!("unknown stage '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Inclusive, ordered range of stages to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageSelection {
    from: Stage,
    to: Stage,
}

impl StageSelection {
    pub fn new(from: Stage, to: Stage) -> Result<Self> {
        if from > to {
            return Err(PipelineError::Validation(format!(
                "stage range is reversed: {} comes after {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn all() -> Self {
        Self {
            from: Stage::ListImages,
            to: Stage::Export,
        }
    }

    pub fn only(stage: Stage) -> Self {
        Self {
            from: stage,
            to: stage,
        }
    }

    pub fn from(&self) -> Stage {
        self.from
    }

    pub fn to(&self) -> Stage {
        self.to
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.from <= stage && stage <= self.to
    }

    pub fn stages(&self) -> impl Iterator<Item = Stage> + use<> {
        let selection = *self;
        Stage::ALL
            .into_iter()
            .filter(move |stage| selection.contains(*stage))
    }

    pub fn len(&self) -> usize {
        self.stages().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StageSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for StageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}..={}", self.from, self.to)
        }
    }
}
