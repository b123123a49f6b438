//! Shared types for the vitrine frame loop.
//!
//! # Invariants
//! - Ids are minted by whoever creates the underlying object; the driver
//!   never invents them.
//! - The sync copy direction is simulation -> render, so `Transform` flows
//!   from bodies to nodes and never back.

pub mod types;

pub use types::{BodyId, NodeId, Transform};
