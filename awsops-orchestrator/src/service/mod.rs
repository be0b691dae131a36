//! Service Module
//!
//! Batch orchestration and the per-service update task it fans out.

mod batch;
mod update;

pub use batch::ClusterUpdateOrchestrator;
