//! CMVM Shift-Add Engine
//!
//! Multiplies a runtime vector by a constant matrix using only shifts,
//! additions and subtractions. The matrix is supplied as one factor table
//! per input slice:
//!
//! ```text
//! input -> Slicer -> [slice_0 .. slice_K) -> SliceProcessor (per slice) -> Combiner -> output
//! ```
//!
//! All arithmetic is W-bit two's complement with silent wraparound. Errors
//! are confined to construction and input-length checks; the compute path
//! itself never fails.

mod combiner;
mod config;
mod engine;
mod error;
mod processor;
mod slicer;

pub use combiner::{combine, Combiner};
pub use config::EngineConfig;
pub use engine::{Engine, SlicePipeline};
pub use error::{EngineError, Result};
pub use processor::{process, SliceProcessor};
pub use slicer::{slice, Slicer};
