//! Awsops Core
//!
//! Core types shared by the awsops crates.
//!
//! This crate contains:
//! - Service update types: options, per-service requests and outcomes, batch results
//! - Service snapshots as reported by the cluster control service
//! - The custom metric data model

pub mod domain;
