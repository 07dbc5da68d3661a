// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User registration and lookup endpoints.

use std::collections::BTreeSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::auth::roles::{ROLE_ADMIN, ROLE_USER};
use crate::auth::{AdminOnly, Auth, AuthError};
use crate::error::ApiError;
use crate::models::{SignupRequest, UserResponse};
use crate::state::AppState;
use crate::storage::{
    normalize_username, AuditEvent, AuditEventType, AuditRepository, StoredUser, UserRepository,
};

/// Register a new account.
///
/// New accounts are created activated, with `ROLE_USER` only. Admin
/// accounts come from startup seeding, never from this endpoint.
#[utoipa::path(
    post,
    path = "/api/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Malformed request body"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    request.validate().map_err(ApiError::bad_request)?;

    let username = normalize_username(&request.username);
    let repo = UserRepository::new(&state.storage);

    if repo.exists(&username) {
        return Err(ApiError::conflict("username is already taken"));
    }

    let password_hash = state.passwords.hash(&request.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::internal("failed to process password")
    })?;

    let user = StoredUser {
        username,
        nickname: request.nickname,
        password_hash,
        activated: true,
        authorities: BTreeSet::from([ROLE_USER.to_string()]),
        created_at: Utc::now(),
    };
    repo.create(&user)?;

    tracing::info!(user = %user.username, "account registered");
    if let Err(e) = AuditRepository::new(&state.storage).log(
        &AuditEvent::new(AuditEventType::UserRegistered).with_username(&user.username),
    ) {
        tracing::warn!(error = %e, "failed to record audit event");
    }

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get the current authenticated user's record.
///
/// Requires `ROLE_USER` or `ROLE_ADMIN`. A validly-signed token with an
/// empty role set authenticates but is rejected here with 403: that is
/// an authorization decision, not an authentication one.
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user's record", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing required role"),
        (status = 404, description = "Record no longer exists"),
    )
)]
pub async fn get_current_user(
    Auth(principal): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, Response> {
    if !principal.has_any_role(&[ROLE_USER, ROLE_ADMIN]) {
        return Err(AuthError::InsufficientPermissions.into_response());
    }

    let user = UserRepository::new(&state.storage)
        .find_by_username(principal.name())
        .map_err(|e| ApiError::from(e).into_response())?
        .ok_or_else(|| ApiError::not_found("user not found").into_response())?;

    Ok(Json(user.into()))
}

/// Get another user's record by username. Admin only.
#[utoipa::path(
    get,
    path = "/api/user/{username}",
    tag = "Users",
    security(("bearer" = [])),
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    responses(
        (status = 200, description = "User record", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let username = normalize_username(&username);
    let user = UserRepository::new(&state.storage)
        .find_by_username(&username)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::auth::{PasswordHasher, Principal, SigningKey, TokenProvider};
    use crate::storage::{FileStorage, StoragePaths};
    use axum::body::Body;
    use axum::http::Request;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state() -> (AppState, TempDir) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();

        let secret = STANDARD.encode([9u8; 64]);
        let keys = SigningKey::from_base64_secret(&secret).unwrap();
        let state = AppState::new(storage, TokenProvider::new(keys, 3600))
            .with_password_hasher(PasswordHasher::with_cost(4));
        (state, temp)
    }

    fn seed_user(state: &AppState, username: &str, roles: &[&str]) {
        let user = StoredUser {
            username: username.to_string(),
            nickname: username.to_string(),
            password_hash: state.passwords.hash("hunter2").unwrap(),
            activated: true,
            authorities: roles.iter().map(|r| r.to_string()).collect(),
            created_at: Utc::now(),
        };
        UserRepository::new(&state.storage).create(&user).unwrap();
    }

    fn token_for(state: &AppState, username: &str, roles: &[&str]) -> String {
        let principal = Principal::new(
            username,
            roles.iter().map(|r| r.to_string()).collect::<BTreeSet<_>>(),
        );
        state.tokens.issue(&principal).unwrap()
    }

    async fn get(state: AppState, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        router(state)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_signup(state: AppState, body: serde_json::Value) -> axum::response::Response {
        router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn signup_creates_a_plain_user() {
        let (state, _temp) = test_state();
        let response = post_signup(
            state.clone(),
            serde_json::json!({
                "username": "carol",
                "password": "hunter2",
                "nickname": "Carol"
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let stored = UserRepository::new(&state.storage)
            .find_by_username("carol")
            .unwrap()
            .unwrap();
        assert!(stored.activated);
        assert_eq!(
            stored.authorities,
            BTreeSet::from([ROLE_USER.to_string()])
        );
        // The password is stored hashed, never in the clear
        assert_ne!(stored.password_hash, "hunter2");
        assert!(state.passwords.verify("hunter2", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let (state, _temp) = test_state();
        let body = serde_json::json!({
            "username": "carol",
            "password": "hunter2",
            "nickname": "Carol"
        });

        let first = post_signup(state.clone(), body.clone()).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = post_signup(state, body).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn path_unsafe_username_is_rejected() {
        let (state, _temp) = test_state();
        let response = post_signup(
            state,
            serde_json::json!({
                "username": "../../etc/passwd",
                "password": "hunter2",
                "nickname": "Mallory"
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn current_user_requires_a_token() {
        let (state, _temp) = test_state();
        let response = get(state, "/api/user", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn current_user_returns_own_record() {
        let (state, _temp) = test_state();
        seed_user(&state, "alice", &[ROLE_USER]);
        let token = token_for(&state, "alice", &[ROLE_USER]);

        let response = get(state, "/api/user", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["username"], "alice");
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated_not_stale() {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
        use serde::Serialize;

        #[derive(Serialize)]
        struct StaleClaims {
            sub: String,
            auth: String,
            iat: i64,
            exp: i64,
        }

        let (state, _temp) = test_state();
        seed_user(&state, "alice", &[ROLE_USER]);

        // Same raw secret test_state encodes into its SigningKey
        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &StaleClaims {
                sub: "alice".to_string(),
                auth: ROLE_USER.to_string(),
                iat: now - 7200,
                exp: now - 3600,
            },
            &EncodingKey::from_secret(&[9u8; 64]),
        )
        .unwrap();

        // 401, not 200-with-stale-identity and not 403
        let response = get(state, "/api/user", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn roleless_token_authenticates_but_is_forbidden() {
        let (state, _temp) = test_state();
        seed_user(&state, "alice", &[ROLE_USER]);
        let token = token_for(&state, "alice", &[]);

        let response = get(state, "/api/user", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_can_read_other_users() {
        let (state, _temp) = test_state();
        seed_user(&state, "alice", &[ROLE_USER]);
        seed_user(&state, "admin", &[ROLE_USER, ROLE_ADMIN]);
        let token = token_for(&state, "admin", &[ROLE_USER, ROLE_ADMIN]);

        let response = get(state, "/api/user/alice", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["username"], "alice");
    }

    #[tokio::test]
    async fn plain_user_cannot_read_other_users() {
        let (state, _temp) = test_state();
        seed_user(&state, "alice", &[ROLE_USER]);
        seed_user(&state, "bob", &[ROLE_USER]);
        let token = token_for(&state, "bob", &[ROLE_USER]);

        let response = get(state, "/api/user/alice", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_lookup_of_missing_user_is_404() {
        let (state, _temp) = test_state();
        seed_user(&state, "admin", &[ROLE_USER, ROLE_ADMIN]);
        let token = token_for(&state, "admin", &[ROLE_USER, ROLE_ADMIN]);

        let response = get(state, "/api/user/ghost", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
