// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::Session,
};

/// Cookie HttpOnly com o token de sessão.
pub const SESSION_COOKIE: &str = "argus_session";

/// Token do cabeçalho `Authorization: Bearer`, senão do cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

// Extrator da sessão: valida o token uma vez por requisição e guarda o
// resultado nos extensions para os demais guardiões.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(session.clone());
        }

        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let token = session_token(&parts.headers)
            .ok_or_else(|| AppError::SessionExpired.to_api_error(&locale, &app_state.i18n_store))?;

        let session = app_state
            .auth_service
            .validate_token(&app_state.db_pool, &token)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        parts.extensions.insert(session.clone());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert(header::COOKIE, HeaderValue::from_static("argus_session=cookie-token"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("tema=oscuro; argus_session=cookie-token"));
        assert_eq!(session_token(&headers).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn nothing_means_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(session_token(&headers), None);
    }
}
