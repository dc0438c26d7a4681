//! Pipeline orchestration.

pub mod pipeline;

pub use pipeline::TipsPipeline;
