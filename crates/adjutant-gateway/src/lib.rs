// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Adjutant agent.
//!
//! Exposes the REST API the web client talks to:
//!
//! - Chat: send a message through the pipeline, read history, list
//!   conversations
//! - Memory: list and delete remembered facts
//! - Passthroughs: fetch emails and calendar events directly, bypassing
//!   the model
//!
//! All routes except the health check sit behind bearer-token auth. The
//! server never exposes internal error details; clients get a stable
//! error string and the rest goes to the log.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::{AuthConfig, auth_middleware};
pub use server::{GatewayState, ServerConfig, start_server};
