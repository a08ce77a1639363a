// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and message persistence for the Adjutant agent.
//!
//! Wraps an async SQLite connection and exposes the conversation lifecycle:
//! create, look up, list with message counts, append messages, and read
//! ordered history.

pub mod store;
pub mod types;

pub use store::ConversationStore;
pub use types::{Conversation, ConversationSummary, Message};
