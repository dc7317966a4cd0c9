// src/middleware/csrf.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use subtle::ConstantTimeEq;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::Session,
};

pub const CSRF_HEADER: &str = "x-csrf-token";

/// Compara o cabeçalho com o token guardado na sessão, em tempo constante.
pub fn csrf_matches(headers: &HeaderMap, expected: &str) -> bool {
    let Some(sent) = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    !expected.is_empty() && bool::from(sent.trim().as_bytes().ct_eq(expected.as_bytes()))
}

/// Guardião das rotas que alteram dados. Roda antes de qualquer mutação;
/// token ausente ou diferente é tratado como sessão expirada.
pub struct CsrfGuard(pub Session);

impl<S> FromRequestParts<S> for CsrfGuard
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;

        if !csrf_matches(&parts.headers, &session.csrf) {
            let app_state = AppState::from_ref(state);
            let locale = Locale::from_headers(&parts.headers);
            tracing::warn!(usuario_id = session.user_id, "token CSRF ausente ou inválido");
            return Err(AppError::SessionExpired.to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(CsrfGuard(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const TOKEN: &str = "6f1c0a4e-1d9b-4f57-9a57-1c2b3d4e5f60";

    #[test]
    fn matching_token_passes() {
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER, HeaderValue::from_static(TOKEN));
        assert!(csrf_matches(&headers, TOKEN));
    }

    #[test]
    fn missing_or_different_token_fails() {
        let mut headers = HeaderMap::new();
        assert!(!csrf_matches(&headers, TOKEN));
        headers.insert(CSRF_HEADER, HeaderValue::from_static("6f1c0a4e"));
        assert!(!csrf_matches(&headers, TOKEN));
        headers.insert(CSRF_HEADER, HeaderValue::from_static(""));
        assert!(!csrf_matches(&headers, ""));
    }
}
