// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Adjutant integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockModel`] - Mock model adapter with scripted replies and call capture
//! - [`ScriptedCapability`] - Mock capability adapter with queued results and
//!   invocation capture

pub mod mock_model;
pub mod scripted_capability;

pub use mock_model::{MockModel, RecordedGenerate};
pub use scripted_capability::{RecordedInvoke, ScriptedCapability};
