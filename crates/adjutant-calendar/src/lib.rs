// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Calendar capability for the Adjutant agent.
//!
//! This crate provides:
//! - [`CalendarClient`]: bearer-authenticated HTTP client for Calendar REST
//! - [`CalendarCapability`]: registry actions (upcoming events, today's
//!   schedule, free-slot availability, next meeting)

pub mod capability;
pub mod client;

pub use capability::CalendarCapability;
pub use client::CalendarClient;
