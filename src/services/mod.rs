//! Service layer
//!
//! - HumanizationLoop: rewrite/score refinement against the collaborator ports
//! - QualityChecker: thesis validation against length and source requirements
//! - GenerationPipeline: draft, extract citations, validate

pub mod generation_pipeline;
pub mod humanization_loop;
pub mod quality_checker;

pub use generation_pipeline::GenerationPipeline;
pub use humanization_loop::{HumanizationLoop, LoopPhase, LoopSettings};
pub use quality_checker::QualityChecker;
