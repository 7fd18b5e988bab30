// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Mood entry store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{StoreError, StoreResult};

/// A single mood check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mood {
    /// Unique entry identifier (UUID)
    pub id: String,
    /// Subject of the user who recorded it
    pub user_id: String,
    /// Score on a 1-10 scale
    pub score: u8,
    /// Optional free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Average and count over a set of mood entries.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MoodAnalytics {
    /// Mean score, `0.0` when there are no entries
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct MoodStore {
    moods: HashMap<String, Mood>,
}

impl MoodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        user_id: &str,
        score: u8,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Mood {
        let mood = Mood {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            score,
            note,
            created_at: now,
        };
        self.moods.insert(mood.id.clone(), mood.clone());
        mood
    }

    pub fn get(&self, id: &str) -> StoreResult<Mood> {
        self.moods
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Mood {id}")))
    }

    /// Entries recorded by `user_id`, newest first.
    pub fn list_for_user(&self, user_id: &str) -> Vec<Mood> {
        let mut moods: Vec<_> = self
            .moods
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        moods.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        moods
    }

    pub fn update(&mut self, id: &str, score: u8, note: Option<String>) -> StoreResult<Mood> {
        let mood = self
            .moods
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("Mood {id}")))?;
        mood.score = score;
        mood.note = note;
        Ok(mood.clone())
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.moods
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("Mood {id}")))
    }

    /// Drop every entry belonging to `user_id`; returns how many were removed.
    pub fn delete_for_user(&mut self, user_id: &str) -> usize {
        let before = self.moods.len();
        self.moods.retain(|_, m| m.user_id != user_id);
        before - self.moods.len()
    }

    /// Move every entry owned by `from` over to `to`; returns how many moved.
    pub fn reassign_user(&mut self, from: &str, to: &str) -> usize {
        let mut moved = 0;
        for mood in self.moods.values_mut().filter(|m| m.user_id == from) {
            mood.user_id = to.to_string();
            moved += 1;
        }
        moved
    }

    /// Average score for `user_id`, limited to entries at or after `since`.
    pub fn analytics(&self, user_id: &str, since: Option<DateTime<Utc>>) -> MoodAnalytics {
        let scores: Vec<u32> = self
            .moods
            .values()
            .filter(|m| m.user_id == user_id)
            .filter(|m| since.is_none_or(|since| m.created_at >= since))
            .map(|m| u32::from(m.score))
            .collect();

        if scores.is_empty() {
            return MoodAnalytics {
                average: 0.0,
                count: 0,
            };
        }

        let total: u32 = scores.iter().sum();
        MoodAnalytics {
            average: f64::from(total) / scores.len() as f64,
            count: scores.len(),
        }
    }
}
