// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{EdgeFilter, OpenPaths, TokenCodec, TokenIssuer, TokenValidator};
use crate::config::Settings;
use crate::store::{MoodStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub codec: Arc<TokenCodec>,
    pub issuer: TokenIssuer,
    pub edge_filter: Arc<EdgeFilter>,
    pub users: Arc<RwLock<UserStore>>,
    pub moods: Arc<RwLock<MoodStore>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let codec = Arc::new(TokenCodec::new(settings.secret_bytes()));
        let issuer = TokenIssuer::new(codec.clone(), settings.token_ttl);
        let validator = TokenValidator::new(codec.clone(), settings.leeway);
        let edge_filter = EdgeFilter::new(validator, OpenPaths::new(&settings.open_endpoints));

        Self {
            settings: Arc::new(settings),
            codec,
            issuer,
            edge_filter: Arc::new(edge_filter),
            users: Arc::new(RwLock::new(UserStore::new())),
            moods: Arc::new(RwLock::new(MoodStore::new())),
        }
    }
}
