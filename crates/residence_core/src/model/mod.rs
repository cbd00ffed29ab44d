//! Domain model for buildings, residents and pending alerts.
//!
//! # Responsibility
//! - Define the structured documents persisted by the store.
//! - Provide lifecycle helpers for the soft-remove/restore workflow.
//!
//! # Invariants
//! - Every building and resident is identified by a stable UUID.
//! - Cross-document references are optional ids with no enforced integrity.

pub mod alert;
pub mod building;
pub mod resident;
