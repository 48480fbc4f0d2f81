use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::payload::ApiJson;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{LoginRequest, RegisterRequest, UpdateSkillsRequest, VerifyHostRequest, VerifyIdRequest},
    responses::VerifyIdResponse,
};
use crate::domain::models::{
    auth::{AuthResponse, TokenPair},
    user::{NewUserParams, User},
};
use crate::domain::services::auth_service::AuthService;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

pub async fn register(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = AuthService::hash_secret(&payload.password)?;
    let user = User::new(NewUserParams {
        name: payload.name.trim().to_string(),
        email: payload.email,
        password_hash,
        role: payload.role,
        college_id: payload.college_id.trim().to_string(),
    });
    let created = state.user_repo.create(&user).await?;

    let tokens = state.auth_service.login(&created, false).await?;
    set_cookies(&cookies, &tokens);

    info!("User registered: {}", created.id);

    Ok((StatusCode::CREATED, Json(auth_response(tokens, false, created))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&payload.email).await?
        .ok_or(AppError::Unauthorized)?;

    AuthService::verify_secret(&payload.password, &user.password_hash)?;

    let tokens = state.auth_service.login(&user, false).await?;
    set_cookies(&cookies, &tokens);

    info!("User logged in: {}", user.id);

    Ok(Json(auth_response(tokens, false, user)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value().to_string();

    let token_hash = state.auth_service.hash_token(&raw_token);
    let record = state.auth_repo.find_refresh_token(&token_hash).await?
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_repo.find_by_id(&record.user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let (tokens, is_host) = state.auth_service.refresh(&raw_token, &user).await?;
    set_cookies(&cookies, &tokens);

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(auth_response(tokens, is_host, user)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token") {
        let _ = state.auth_service.logout(cookie.value()).await;
    }

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&principal.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user))
}

pub async fn update_skills(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    ApiJson(payload): ApiJson<UpdateSkillsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let skills: Vec<String> = payload.skills.iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    state.user_repo.update_skills(&principal.id, &skills).await?;
    let user = state.user_repo.find_by_id(&principal.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    info!(user_id = %user.id, count = skills.len(), "Skills updated");

    Ok(Json(user))
}

pub async fn verify_id(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<VerifyIdRequest>,
) -> Result<impl IntoResponse, AppError> {
    let college_id = payload.college_id.trim().to_string();
    let registered = state.user_repo.exists_by_college_id(&college_id).await?;

    Ok(Json(VerifyIdResponse { college_id, registered }))
}

pub async fn verify_host(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    principal: AuthUser,
    ApiJson(payload): ApiJson<VerifyHostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let host = state.host_repo.find_by_host_id(payload.host_id.trim()).await?
        .ok_or(AppError::Unauthorized)?;

    AuthService::verify_secret(&payload.access_key, &host.access_key_hash)
        .inspect_err(|_| warn!(user_id = %principal.id, host_id = %host.host_id, "Host verification failed"))?;

    let user = state.user_repo.find_by_id(&principal.id).await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.login(&user, true).await?;
    set_cookies(&cookies, &tokens);

    info!(user_id = %user.id, host_id = %host.host_id, "Host access granted");

    Ok(Json(auth_response(tokens, true, user)))
}

fn auth_response(tokens: TokenPair, is_host: bool, user: User) -> AuthResponse {
    AuthResponse {
        access_token: tokens.access_token,
        csrf_token: tokens.csrf_token,
        is_host,
        user,
    }
}

fn set_cookies(cookies: &Cookies, tokens: &TokenPair) {
    let mut access_c = Cookie::new("access_token", tokens.access_token.clone());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", tokens.refresh_token.clone());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
