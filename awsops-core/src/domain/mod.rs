//! Core domain types
//!
//! These types are shared between the client crate (which talks to AWS) and
//! the orchestrator (which fans updates out across services). They carry no
//! behavior beyond construction, validation and reporting helpers.

pub mod metric;
pub mod outcome;
pub mod service;
