// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::BTreeSet;
use std::env;
use std::net::SocketAddr;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use relational_identity_server::api::router;
use relational_identity_server::auth::roles::{ROLE_ADMIN, ROLE_USER};
use relational_identity_server::auth::{SigningKey, TokenProvider};
use relational_identity_server::config::{
    TokenSettings, DATA_DIR_ENV, SEED_ADMIN_PASSWORD_ENV,
};
use relational_identity_server::state::AppState;
use relational_identity_server::storage::{
    FileStorage, StoragePaths, StoredUser, UserRepository,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Seed the bootstrap admin account when `SEED_ADMIN_PASSWORD` is set.
///
/// The seeded account carries both roles, mirroring the role split the
/// service enforces: signup only ever grants `ROLE_USER`, so the only
/// way to obtain `ROLE_ADMIN` is this startup path.
fn seed_admin(state: &AppState) {
    let Ok(password) = env::var(SEED_ADMIN_PASSWORD_ENV) else {
        return;
    };

    let repo = UserRepository::new(&state.storage);
    if repo.exists("admin") {
        tracing::debug!("admin account already present, skipping seed");
        return;
    }

    let password_hash = state
        .passwords
        .hash(&password)
        .expect("Failed to hash seed admin password");

    let admin = StoredUser {
        username: "admin".to_string(),
        nickname: "Administrator".to_string(),
        password_hash,
        activated: true,
        authorities: BTreeSet::from([ROLE_USER.to_string(), ROLE_ADMIN.to_string()]),
        created_at: Utc::now(),
    };

    repo.create(&admin).expect("Failed to seed admin account");
    tracing::info!("seeded admin account");
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Token configuration is mandatory: refuse to start without a
    // usable signing key or with a degenerate validity
    let settings = TokenSettings::from_env().expect("Invalid token configuration");
    let keys = SigningKey::from_base64_secret(&settings.secret_base64)
        .expect("Invalid signing secret");
    let tokens = TokenProvider::new(keys, settings.validity_seconds);

    // Initialize persistent storage
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string());
    let mut storage = FileStorage::new(StoragePaths::new(&data_dir));
    storage.initialize().expect("Failed to initialize storage");

    let state = AppState::new(storage, tokens);
    seed_admin(&state);

    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(
        %addr,
        validity_seconds = settings.validity_seconds,
        "identity server listening (docs at /docs)"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .expect("HTTP server failed");
}
