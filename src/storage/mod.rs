// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Storage Module
//!
//! Filesystem-backed storage for the identity service. User records and
//! audit logs are plain JSON documents under `DATA_DIR`; there is no
//! database process to manage.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/
//!     {username}.json      # Credential record (hash, roles, activation)
//!   audit/
//!     {date}/events.jsonl  # Daily auth audit logs
//! ```
//!
//! Token state is deliberately absent from this layout: issued tokens are
//! self-contained and validated purely from their signature and expiry,
//! so there is nothing server-side to persist per session.

pub mod audit;
pub mod fs;
pub mod paths;
pub mod users;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use users::{normalize_username, StoredUser, UserRepository};
