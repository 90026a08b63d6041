//! Slice fan-out, shift-add evaluation and fan-in

use std::sync::Arc;

use cmvm_factor::{FactorTable, FactorTableSource, TableShape};
use cmvm_fixed_point::WordVector;
use rayon::prelude::*;

use crate::combiner::Combiner;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::processor::SliceProcessor;
use crate::slicer::Slicer;

/// Tables applied to one slice: a base R x C table, then optional
/// R x R correction stages, each refining the previous partial result.
#[derive(Debug, Clone)]
pub struct SlicePipeline {
    stages: Vec<Arc<FactorTable>>,
}

impl SlicePipeline {
    pub fn new(base: impl Into<Arc<FactorTable>>) -> Self {
        Self {
            stages: vec![base.into()],
        }
    }

    /// Append a correction stage
    pub fn with_correction(mut self, table: impl Into<Arc<FactorTable>>) -> Self {
        self.stages.push(table.into());
        self
    }

    pub fn base(&self) -> &FactorTable {
        &self.stages[0]
    }

    pub fn corrections(&self) -> impl Iterator<Item = &FactorTable> {
        self.stages[1..].iter().map(|t| t.as_ref())
    }

    pub fn stages(&self) -> impl Iterator<Item = &FactorTable> {
        self.stages.iter().map(|t| t.as_ref())
    }

    /// Shift-add operations per evaluation
    pub fn term_count(&self) -> usize {
        self.stages().map(FactorTable::term_count).sum()
    }
}

/// Multiplierless constant matrix-vector multiplier.
///
/// Holds one read-only pipeline per slice. `run` slices the input, evaluates
/// every slice independently (on the rayon pool when `parallel` is set) and
/// sums the partial results in slice order.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    slicer: Slicer,
    processor: SliceProcessor,
    combiner: Combiner,
    pipelines: Vec<SlicePipeline>,
}

impl Engine {
    /// Build from one base table per slice
    pub fn new(config: EngineConfig, tables: Vec<FactorTable>) -> Result<Self> {
        Self::with_pipelines(config, tables.into_iter().map(SlicePipeline::new).collect())
    }

    /// Load one base table per slice from `sources`
    pub fn from_sources<S: FactorTableSource>(config: EngineConfig, sources: &[S]) -> Result<Self> {
        let tables = sources
            .iter()
            .map(|s| s.load())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(config, tables)
    }

    /// Build from full per-slice pipelines, checking every table against the config
    pub fn with_pipelines(config: EngineConfig, pipelines: Vec<SlicePipeline>) -> Result<Self> {
        config.validate()?;

        if pipelines.len() != config.slice_count {
            return Err(EngineError::TableCount {
                expected: config.slice_count,
                got: pipelines.len(),
            });
        }

        let rows = config.output_width;
        for (slice, pipeline) in pipelines.iter().enumerate() {
            for (stage, table) in pipeline.stages().enumerate() {
                let got = table.shape();
                let expected = if stage == 0 {
                    config.table_shape()
                } else {
                    TableShape::new(got.planes, rows, rows)
                };
                if got != expected {
                    return Err(EngineError::TableShape {
                        slice,
                        stage,
                        expected,
                        got,
                    });
                }
                if table.width() != config.bit_width {
                    return Err(EngineError::TableWidth {
                        slice,
                        expected: config.bit_width.bits(),
                        got: table.width().bits(),
                    });
                }
            }
        }

        tracing::info!(
            slices = config.slice_count,
            shape = %config.table_shape(),
            width = config.bit_width.bits(),
            terms = pipelines.iter().map(SlicePipeline::term_count).sum::<usize>(),
            corrections = pipelines.iter().map(|p| p.corrections().count()).sum::<usize>(),
            "Engine initialised"
        );

        Ok(Self {
            slicer: Slicer::from_config(&config)?,
            processor: SliceProcessor::new(config.bit_width),
            combiner: Combiner::new(config.output_width, config.bit_width),
            config,
            pipelines,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pipelines(&self) -> &[SlicePipeline] {
        &self.pipelines
    }

    /// Per-slice partial results, indexed by slice position
    pub fn partials(&self, input: &WordVector) -> Result<Vec<WordVector>> {
        let width = self.config.bit_width;
        let input = if input.width == width {
            std::borrow::Cow::Borrowed(input)
        } else {
            std::borrow::Cow::Owned(WordVector::from_raw(input.data.clone(), width))
        };
        let slices = self.slicer.slice(&input)?;

        let evaluate = |(slice, pipeline): (&WordVector, &SlicePipeline)| {
            self.processor.process_stages(slice, pipeline.base(), pipeline.corrections())
        };
        let parts: Vec<WordVector> = if self.config.parallel {
            slices
                .par_iter()
                .zip(self.pipelines.par_iter())
                .map(evaluate)
                .collect()
        } else {
            slices.iter().zip(self.pipelines.iter()).map(evaluate).collect()
        };
        Ok(parts)
    }

    /// Multiply `input` by the engine's constant matrix.
    ///
    /// Fails only with `SliceWidthMismatch` when `input` is not `m * K` long.
    pub fn run(&self, input: &WordVector) -> Result<WordVector> {
        let parts = self.partials(input)?;
        let output = self.combiner.combine(&parts);
        tracing::debug!(
            input_len = input.len(),
            slices = parts.len(),
            parallel = self.config.parallel,
            "Shift-add run complete"
        );
        Ok(output)
    }

    /// `run` on plain integers, wrapped to the engine width
    pub fn run_raw(&self, input: &[i64]) -> Result<Vec<i64>> {
        let input = WordVector::from_raw(input.to_vec(), self.config.bit_width);
        Ok(self.run(&input)?.data)
    }
}
