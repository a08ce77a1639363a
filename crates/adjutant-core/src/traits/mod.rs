// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Adjutant agent.
//!
//! All adapters use `#[async_trait]` for dynamic dispatch compatibility and
//! are handed to consumers through constructor injection.

pub mod capability;
pub mod model;

// Re-export all traits at the traits module level for convenience.
pub use capability::CapabilityAdapter;
pub use model::ModelAdapter;
