// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message-handling pipeline for the Adjutant agent.
//!
//! The [`Orchestrator`] is the central coordinator that:
//! - Retrieves remembered facts relevant to the incoming message
//! - Routes the message to a capability action when a trigger matches
//! - Grounds the model call with memory context and tool results
//! - Extracts and persists new facts from the exchange
//!
//! Each stage degrades on failure, so handling a message always produces a
//! response string.

pub mod orchestrator;
pub mod stage;
pub mod synthesis;

pub use orchestrator::Orchestrator;
pub use stage::{PipelineStage, advance};
pub use synthesis::{MODEL_APOLOGY, PIPELINE_APOLOGY, SYSTEM_PREAMBLE};
