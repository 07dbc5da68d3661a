// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::{AuthError, CredentialAuthenticator, CredentialError};
use crate::error::ApiError;
use crate::models::{LoginRequest, TokenResponse};
use crate::state::AppState;
use crate::storage::{AuditEvent, AuditEventType, AuditRepository};

/// Authenticate with username and password.
///
/// On success the signed token is returned both in the response body
/// and in an `Authorization: Bearer <token>` response header.
///
/// All credential failures produce the same generic 401: responses must
/// not reveal whether a username exists, whether the password was wrong,
/// or whether the account is disabled. The specific kind goes to the
/// log and the audit trail only.
#[utoipa::path(
    post,
    path = "/api/authenticate",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, token issued", body = TokenResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Authentication failed"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    uri: Uri,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, Response> {
    request
        .validate()
        .map_err(|msg| ApiError::bad_request(msg).into_response())?;

    let audit = AuditRepository::new(&state.storage);
    let authenticator = CredentialAuthenticator::new(&state.storage, &state.passwords);

    let principal = match authenticator.authenticate(&request.username, &request.password) {
        Ok(principal) => principal,
        Err(
            err @ (CredentialError::UnknownUser
            | CredentialError::BadCredential
            | CredentialError::AccountDisabled),
        ) => {
            tracing::warn!(kind = err.kind(), uri = %uri, "login rejected");
            if let Err(e) = audit.log(
                &AuditEvent::new(AuditEventType::LoginFailed)
                    .with_username(&request.username)
                    .with_uri(uri.to_string())
                    .failed(err.kind()),
            ) {
                tracing::warn!(error = %e, "failed to record audit event");
            }
            return Err(AuthError::InvalidCredentials.into_response());
        }
        Err(err) => {
            tracing::error!(error = %err, uri = %uri, "credential store failure during login");
            return Err(
                AuthError::InternalError("login unavailable".to_string()).into_response(),
            );
        }
    };

    let token = state.tokens.issue(&principal).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        AuthError::InternalError("token issuance failed".to_string()).into_response()
    })?;

    tracing::info!(user = %principal.name(), "login succeeded");
    if let Err(e) = audit.log(
        &AuditEvent::new(AuditEventType::LoginSucceeded)
            .with_username(principal.name())
            .with_uri(uri.to_string()),
    ) {
        tracing::warn!(error = %e, "failed to record audit event");
    }

    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
        tracing::error!(error = %e, "issued token is not header-safe");
        AuthError::InternalError("token issuance failed".to_string()).into_response()
    })?;
    headers.insert(AUTHORIZATION, bearer);

    Ok((headers, Json(TokenResponse { token })))
}
