use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::domain::services::auth_service::TOKEN_AUDIENCE;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::Span;

/// The verified principal behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: String,
    pub is_host: bool,
}

/// A principal whose token carries the host flag.
#[derive(Debug, Clone)]
pub struct HostUser(pub AuthUser);

enum Credential {
    Bearer(String),
    Cookie(String),
}

fn credential(parts: &Parts) -> Result<Credential, AppError> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return Ok(Credential::Bearer(token.trim().to_string()));
    }

    let cookies = parts.extensions.get::<Cookies>()
        .ok_or(AppError::Internal)?;

    cookies.get("access_token")
        .map(|c| Credential::Cookie(c.value().to_string()))
        .ok_or(AppError::Unauthorized)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let credential = credential(parts)?;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| AppError::InternalWithMsg("Invalid JWT public key PEM".into()))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[app_state.config.auth_issuer.as_str()]);

        let token = match &credential {
            Credential::Bearer(t) | Credential::Cookie(t) => t,
        };
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        // Browsers attach cookies on their own, so cookie sessions must echo the CSRF token.
        let method = &parts.method;
        if matches!(credential, Credential::Cookie(_))
            && *method != Method::GET && *method != Method::HEAD && *method != Method::OPTIONS
        {
            let csrf_header_val = parts.headers.get("X-CSRF-Token")
                .ok_or(AppError::Forbidden("Missing CSRF token".into()))?
                .to_str()
                .map_err(|_| AppError::Forbidden("Invalid CSRF token".into()))?;

            if csrf_header_val != token_data.claims.csrf_token {
                return Err(AppError::Forbidden("Invalid CSRF token".into()));
            }
        }

        let user = AuthUser {
            id: token_data.claims.sub,
            role: token_data.claims.role,
            is_host: token_data.claims.host,
        };

        Span::current().record("user_id", user.id.as_str());

        Ok(user)
    }
}

impl<S> FromRequestParts<S> for HostUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_host {
            return Err(AppError::Forbidden("Host access required".into()));
        }
        Ok(HostUser(user))
    }
}
