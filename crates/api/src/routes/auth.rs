//! Registration, login, and profile endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use common::UserId;
use payment::PaymentProcessor;
use serde::{Deserialize, Serialize};
use store::{NewUser, OrderStore, ProductStore, User, UserStore};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::authenticate;

// -- Request types --

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

// -- Handlers --

/// POST /register — create a user with a hashed credential.
#[tracing::instrument(skip(state, req))]
pub async fn register<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "name, email, and password are required".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = state
        .store
        .insert_user(NewUser {
            id: UserId::new(),
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /login — verify a credential and issue a bearer token.
#[tracing::instrument(skip(state, req))]
pub async fn login<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    // One opaque rejection for unknown email and wrong password alike.
    let invalid = || ApiError::Unauthorized("invalid credentials".to_string());

    let user = state
        .store
        .user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = state.verifier.issue(user.id)?;
    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// GET /profile — the authenticated caller's own record.
#[tracing::instrument(skip(state, headers))]
pub async fn profile<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError>
where
    S: OrderStore + UserStore + ProductStore + Clone + 'static,
    P: PaymentProcessor + 'static,
{
    let user_id = authenticate(&state, &headers)?;

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}
