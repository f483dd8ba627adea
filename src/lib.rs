//! Deedflow: real-estate closing workflow engine.
//!
//! This crate provides the core orchestration for moving a closing case
//! through a fixed seven-stage pipeline: gating stage exits on business
//! requirements, seeding stage-specific work items on entry, and keeping an
//! append-only audit history with progress and timeline views.
//!
//! # Architecture
//!
//! Deedflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, etc.)
//!
//! # Modules
//!
//! - [`closing`]: Case aggregate, stage graph, and workflow services

pub mod closing;
