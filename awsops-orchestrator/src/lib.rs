//! Awsops Orchestrator
//!
//! Applies one update to many ECS services at once and waits for all of
//! them to settle.
//!
//! Every service gets its own task: the update call, then a stability wait
//! bounded by the configured [`StabilityPolicy`]. Tasks run in parallel, so
//! a batch takes as long as its slowest service. A failing service never
//! stops the others; the batch result lists every failure.
//!
//! [`StabilityPolicy`]: awsops_client::StabilityPolicy

pub mod service;

pub use service::ClusterUpdateOrchestrator;
