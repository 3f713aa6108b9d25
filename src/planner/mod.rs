//! Trim planning
//!
//! Turns a [`ClipSpec`] into the ordered list of encoder invocations that
//! produce the trimmed file, then runs them through an [`EncodePort`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::model::{ClipRange, ClipSpec, MediaFile};
use crate::ports::EncodePort;

/// Name of the file the segments are joined into
pub const TRIMMED_STEM: &str = "trimmed";

/// One encoder invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EncodeStep {
    /// Cut one range out of the source
    Extract {
        range: ClipRange,
        input: PathBuf,
        output: PathBuf,
    },
    /// Join extracted segments in order
    Concat {
        segments: Vec<PathBuf>,
        output: PathBuf,
    },
}

/// Ordered encoder steps plus the file they leave behind
#[derive(Debug, Clone, PartialEq)]
pub struct TrimPlan {
    pub steps: Vec<EncodeStep>,
    pub output: MediaFile,
}

impl TrimPlan {
    /// Plan that leaves the source untouched
    pub fn passthrough(source: &MediaFile) -> Self {
        Self {
            steps: Vec::new(),
            output: source.clone(),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.steps.is_empty()
    }

    /// Segment files that are intermediate once the concat step has run
    fn intermediate_segments(&self) -> Vec<PathBuf> {
        self.steps
            .iter()
            .find_map(|step| match step {
                EncodeStep::Concat { segments, .. } => Some(segments.clone()),
                EncodeStep::Extract { .. } => None,
            })
            .unwrap_or_default()
    }
}

/// Planner for trim operations
pub struct TrimPlanner;

impl TrimPlanner {
    /// Build the plan for `spec` without touching the filesystem
    ///
    /// Zero-length ranges produce no output and are left out.
    pub fn plan(source: &MediaFile, spec: &ClipSpec, work_dir: &Path) -> TrimPlan {
        let ranges: Vec<&ClipRange> = spec.ranges().iter().filter(|r| r.duration() > 0).collect();
        if ranges.is_empty() {
            return TrimPlan::passthrough(source);
        }

        let ext = source.extension().unwrap_or_else(|| "mp4".to_string());

        let mut steps = Vec::with_capacity(ranges.len() + 1);
        let mut segments = Vec::with_capacity(ranges.len());
        for (index, range) in ranges.into_iter().enumerate() {
            let output = work_dir.join(format!("segment-{:03}.{}", index, ext));
            steps.push(EncodeStep::Extract {
                range: *range,
                input: source.path.clone(),
                output: output.clone(),
            });
            segments.push(output);
        }

        let output_path = if segments.len() == 1 {
            segments.remove(0)
        } else {
            let joined = work_dir.join(format!("{}.{}", TRIMMED_STEM, ext));
            steps.push(EncodeStep::Concat {
                segments,
                output: joined.clone(),
            });
            joined
        };

        TrimPlan {
            steps,
            output: MediaFile::new(output_path, source.kind),
        }
    }

    /// Run every step in order; the first failure aborts the plan
    pub fn apply(plan: &TrimPlan, encoder: &dyn EncodePort) -> DomainResult<MediaFile> {
        if plan.is_passthrough() {
            debug!("No clip ranges, keeping {}", plan.output.path.display());
            return Ok(plan.output.clone());
        }

        info!("Trimming: {} encoder step(s)", plan.steps.len());

        for step in &plan.steps {
            match step {
                EncodeStep::Extract {
                    range,
                    input,
                    output,
                } => {
                    info!("Extracting {} -> {}", range, output.display());
                    encoder.extract_segment(input, range, output)?;
                }
                EncodeStep::Concat { segments, output } => {
                    info!("Joining {} segments -> {}", segments.len(), output.display());
                    encoder.concat(segments, output)?;
                }
            }
        }

        for segment in plan.intermediate_segments() {
            if let Err(e) = std::fs::remove_file(&segment) {
                warn!("Could not remove segment {}: {}", segment.display(), e);
            }
        }

        Ok(plan.output.clone())
    }
}
