// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! # In-Memory Storage
//!
//! Account and mood records kept in process memory. Each store is wrapped
//! in a `tokio::sync::RwLock` inside [`crate::state::AppState`].
//!
//! Users are keyed by id with a unique index on the normalized email; the
//! email index is the only lookup path used for authentication.

pub mod moods;
pub mod users;

pub use moods::{Mood, MoodAnalytics, MoodStore};
pub use users::{normalize_email, StoredUser, UserStore, UserUpdate};

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Email already in use")]
    DuplicateEmail,
}

pub type StoreResult<T> = Result<T, StoreError>;
