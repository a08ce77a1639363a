// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Adjutant agent.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Adjutant workspace. Capability and model
//! adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AdjutantError;
pub use types::{
    CapabilityContext, ConversationTurn, ModelRole, ModelTurn, ToolPayload, ToolReport, TurnRole,
};

// Re-export adapter traits at crate root.
pub use traits::{CapabilityAdapter, ModelAdapter};
