// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! MindWell - Authentication Boundary and API Server
//!
//! JWT issuance and validation for the MindWell mood tracker, the edge
//! filter that guards every route, and the HTTP API behind it.
//!
//! ## Modules
//!
//! - `auth` - Token codec, issuer, validator, edge filter and role guard
//! - `accounts` - Registration, login and admin bootstrap
//! - `api` - HTTP API handlers (Axum)
//! - `store` - In-memory user and mood repositories

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
