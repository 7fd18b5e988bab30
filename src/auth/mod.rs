// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! # Authentication Module
//!
//! JWT authentication and role-based authorization for the MindWell API.
//!
//! ## Auth Flow
//!
//! 1. Client registers, then logs in with email and password
//! 2. Server verifies the Argon2 hash and issues an HS256 JWT
//!    (`sub` = normalized email, `roles`, `iat`, `exp`)
//! 3. Client sends `Authorization: Bearer <JWT>` on every other call
//! 4. The edge filter:
//!    - lets allowlisted paths through untouched
//!    - validates structure, signature, then expiry
//!    - forwards the identity as `X-Auth-User-ID` / `X-Auth-User-Roles`
//! 5. Handlers that need a role call the guard
//!
//! ## Security
//!
//! - Every validator failure is a single 401 at the boundary
//! - Client-supplied identity headers are always dropped
//! - Unknown email and wrong password produce the same login failure
//! - No role implies another

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod guard;
pub mod issuer;
pub mod password;
pub mod roles;
pub mod validator;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use codec::{CodecError, TokenCodec};
pub use error::{AuthError, TokenError};
pub use extractor::{AdminOnly, Auth, ForwardedUser};
pub use filter::{edge_auth, Admission, EdgeFilter, OpenPaths};
pub use guard::require_role;
pub use issuer::{IssuedToken, TokenIssuer};
pub use roles::Role;
pub use validator::TokenValidator;
