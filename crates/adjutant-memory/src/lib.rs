// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory system for the Adjutant agent.
//!
//! Provides SQLite-backed fact storage with confidence merging, pattern-based
//! fact extraction from conversation turns and email records, and lexical
//! retrieval scored by token overlap and topic bonuses.
//!
//! ## Architecture
//!
//! - **FactStore**: SQLite persistence with append-or-merge semantics
//! - **MemoryExtractor**: Regex pattern tables over chat and email text
//! - **RetrievalEngine**: Overlap + category-bonus scoring over stored facts
//! - **Types**: MemoryFact, FactCategory, FactSource, FactCandidate

pub mod extractor;
pub mod retriever;
pub mod store;
pub mod types;

pub use extractor::MemoryExtractor;
pub use retriever::RetrievalEngine;
pub use store::FactStore;
pub use types::*;
