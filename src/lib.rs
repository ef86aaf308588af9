//! Cadre - a multi-agent analysis and review orchestrator.
//!
//! Two workflows share one model boundary: a cyclic dataset analysis
//! pipeline (planner, executor, reporter, senior, finalizer) and a
//! multi-specialist scientific paper review crew.

pub mod artifacts;
pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod exec;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod review;

pub use error::{CadreError, Result};
