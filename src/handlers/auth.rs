//! Authentication HTTP handlers
//!
//! On login and refresh both tokens are set as hardened cookies and returned
//! in the JSON body; logout clears the cookies.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::middleware::auth::{
    first_token_from, AuthenticatedUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
    REFRESH_TOKEN_HEADER,
};
use crate::models::{
    ApiResponse, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenPairResponse,
    UserResponse,
};

/// Shared hardening options for both auth cookies
fn auth_cookie(name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie
}

/// Removal cookie; path must match the one set on [`auth_cookie`]
fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie
}

/// POST /register - Create a user and start their first session
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let user = state
        .auth_service
        .register(&req.full_name, &req.email, &req.password)
        .await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        UserResponse::from(user),
        "User registered successfully",
    ))
}

/// POST /login - Verify credentials and issue a token pair
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let (user, tokens) = state.auth_service.login(&req.email, &req.password).await?;

    let jar = jar
        .add(auth_cookie(ACCESS_TOKEN_COOKIE, tokens.access_token.clone()))
        .add(auth_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
        ));

    Ok((
        jar,
        ApiResponse::new(
            StatusCode::OK,
            LoginResponse {
                user: user.into(),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}

/// POST /logout - End the caller's session and clear both cookies
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    state.auth_service.logout(user.user_id).await?;

    let jar = jar
        .remove(expired_cookie(ACCESS_TOKEN_COOKIE))
        .remove(expired_cookie(REFRESH_TOKEN_COOKIE));

    Ok((
        jar,
        ApiResponse::new(
            StatusCode::OK,
            serde_json::json!({}),
            "User logged out successfully",
        ),
    ))
}

/// POST /refresh-token - Exchange a refresh token for a rotated pair
///
/// The token itself is the credential; it may arrive in the cookie, the
/// body, or the x-refresh-token header, in that priority order.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let incoming = first_token_from([
        jar.get(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string()),
        body.and_then(|Json(req)| req.refresh_token),
        headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    ]);

    let tokens = state.auth_service.refresh(incoming.as_deref()).await?;

    let jar = jar
        .add(auth_cookie(ACCESS_TOKEN_COOKIE, tokens.access_token.clone()))
        .add(auth_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
        ));

    Ok((
        jar,
        ApiResponse::new(
            StatusCode::OK,
            TokenPairResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
            "Token refreshed successfully",
        ),
    ))
}
