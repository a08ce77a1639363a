// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gmail-backed mail capability for the Adjutant agent.
//!
//! This crate provides:
//! - [`GmailClient`]: bearer-authenticated HTTP client for Gmail REST
//! - [`MailCapability`]: registry actions (fetch, search, details, send
//!   with reply threading, unread/important digest)

pub mod capability;
pub mod client;

pub use capability::MailCapability;
pub use client::GmailClient;
