// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing for the Adjutant agent.
//!
//! This crate provides:
//! - [`IntentRouter`]: ordered trigger-phrase lookup over user messages
//! - [`RoutingDecision`]: the matched capability, action, and parameters
//!
//! The router inspects a message before any model call and decides whether
//! an external capability (mail, calendar) must be invoked first.

pub mod router;

pub use router::{IntentRouter, RoutingDecision};
