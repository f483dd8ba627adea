//! Closing workflow management for Deedflow.
//!
//! This module implements the closing pipeline: a case advances through
//! seven fixed stages, each exit gated by blocking work items and approved
//! documents, each entry seeding new work items from a data-driven plan.
//! Every transition and domain event is recorded in the case's append-only
//! history. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
