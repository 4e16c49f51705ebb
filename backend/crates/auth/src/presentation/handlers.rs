//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use kernel::context::Identity;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, ProfileUseCase, RegisterInput, RegisterUseCase, TokenService,
    UpdateProfileInput,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, ProfileResponse, RegisterRequest, TokenResponse, UpdateProfileRequest,
};

#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<TokenResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: output.token,
            message: "Registration successful",
        }),
    ))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: output.token,
        message: "Login successful",
    }))
}

/// GET /api/user/profile
pub async fn get_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.repo.clone())
        .get(identity.user_id)
        .await?;
    Ok(Json(user.into()))
}

/// PUT /api/user/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let user = ProfileUseCase::new(state.repo.clone())
        .update(
            identity.user_id,
            UpdateProfileInput {
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;
    Ok(Json(user.into()))
}
